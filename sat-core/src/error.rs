//! Errors raised when validating polygons.

use thiserror::Error;

/// Reasons a vertex list cannot be used as a polygon.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolygonError {
    /// No vertices were supplied.
    #[error("polygon has no vertices")]
    Empty,

    /// Two vertices coincide, or two non-adjacent edges cross.
    #[error("polygon with {vertices} vertices is not simple")]
    NotSimple {
        /// Number of vertices in the rejected polygon.
        vertices: usize,
    },

    /// Two or more vertices that all lie on one line, enclosing no area.
    #[error("polygon with {vertices} vertices is degenerate (all collinear)")]
    Degenerate {
        /// Number of vertices in the rejected polygon.
        vertices: usize,
    },

    /// The vertices do not all turn in the same direction.
    #[error("polygon is not convex: vertex {vertex} turns against the winding")]
    NotConvex {
        /// Index of the first vertex whose winding differs from vertex 0's.
        vertex: usize,
    },
}
