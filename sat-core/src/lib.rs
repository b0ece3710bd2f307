//! Separating axis collision tests for 2D convex polygons.
//!
//! The two entry points are [`rotate`], which turns a point about a center,
//! and [`intersects`], which checks whether two convex polygons (given as
//! vertex slices) overlap. A single vertex is accepted as a degenerate
//! polygon, which turns [`intersects`] into a point-in-polygon test.

#[macro_use]
pub mod compare;
mod error;
mod interval;
mod line;
mod polygon;
mod rotate;
mod separation;
mod types;

pub use types::P2;
pub use types::V2;

pub use error::PolygonError;
pub use interval::Interval;
pub use line::Line;
pub use polygon::Polygon;
pub use polygon::WindingDirection;
pub use rotate::{rotate, rotate_all};
pub use separation::{intersects, intersects_with, project, separating_axis, Contact};
