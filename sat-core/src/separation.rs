//! Separating axis test for convex polygons.
//!
//! Two convex polygons are disjoint if and only if there is an axis onto
//! which their projections do not overlap. It is enough to try the normals of
//! every edge of both polygons.

use crate::{line::Line, types::dot, Interval, P2, V2};
use cgmath::EuclideanSpace;
use log::trace;

/// Whether polygons that only touch count as intersecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Contact {
    /// Touching counts as intersecting. Projections are separated only when
    /// there is a gap between them.
    #[default]
    Touching,
    /// Only a positive-width overlap counts. Projections that share just an
    /// end point are separated.
    Overlapping,
}
impl Contact {
    /// Tests whether two projections are separated under this policy.
    fn separates(&self, a: &Interval, b: &Interval) -> bool {
        match self {
            Contact::Touching => a.disjoint(b),
            Contact::Overlapping => !a.overlaps_strictly(b),
        }
    }
}

/// Projects every vertex onto `axis` and returns the spanned interval.
///
/// The axis does not need to be unit length. Intervals are only comparable
/// with other intervals projected onto the same axis.
///
/// # Parameters
///
/// - `vertices`: Vertices to project. Must not be empty.
/// - `axis`: Direction to project onto.
///
/// # Returns
///
/// The `[min, max]` interval of `dot(vertex, axis)`.
pub fn project(vertices: &[P2], axis: V2) -> Interval {
    debug_assert!(!vertices.is_empty(), "cannot project an empty polygon");
    vertices.iter().map(|v| dot(v.to_vec(), axis)).collect()
}

/// Tests whether two convex polygons intersect, counting touching as
/// intersecting.
///
/// Both slices must be non-empty, convex and consistently wound; this is not
/// checked. A slice with a single point is a degenerate polygon with no edges,
/// so `intersects(&[p], polygon)` is a point-in-polygon test.
/// Two single points have no axes between them and always intersect;
/// [`crate::Polygon::intersects`] compares them directly instead.
///
/// ```
/// use sat_core::{intersects, P2};
///
/// let square = [
///     P2::new(0.0, 0.0),
///     P2::new(2.0, 0.0),
///     P2::new(2.0, 2.0),
///     P2::new(0.0, 2.0),
/// ];
/// assert!(intersects(&[P2::new(1.0, 1.0)], &square));
/// assert!(!intersects(&[P2::new(3.0, 1.0)], &square));
/// ```
pub fn intersects(a: &[P2], b: &[P2]) -> bool {
    intersects_with(a, b, Contact::Touching)
}

/// Tests whether two convex polygons intersect under a [`Contact`] policy.
///
/// See [`intersects`] for the requirements on `a` and `b`.
pub fn intersects_with(a: &[P2], b: &[P2], contact: Contact) -> bool {
    separating_axis(a, b, contact).is_none()
}

/// Finds the first edge normal, of `a` and then of `b`, that separates the
/// two polygons.
///
/// Returns as soon as one is found. `None` means the polygons intersect.
pub fn separating_axis(a: &[P2], b: &[P2], contact: Contact) -> Option<V2> {
    let axis = edge_normals(a)
        .chain(edge_normals(b))
        .find(|axis| contact.separates(&project(a, *axis), &project(b, *axis)));
    if let Some(axis) = axis {
        trace!("Separating axis found: ({}, {})", axis.x, axis.y);
    }
    axis
}

/// Iterates the normals of every edge of a polygon, with wraparound.
///
/// A single point has no edges and yields nothing.
pub(crate) fn edge_normals(vertices: &[P2]) -> impl Iterator<Item = V2> + '_ {
    edges(vertices).map(|edge| edge.normal())
}

/// Iterates the edges of a polygon, including the closing edge from the last
/// vertex back to the first.
pub(crate) fn edges(vertices: &[P2]) -> impl Iterator<Item = Line> + '_ {
    let n = if vertices.len() > 1 { vertices.len() } else { 0 };
    vertices
        .iter()
        .zip(vertices.iter().cycle().skip(1))
        .take(n)
        .map(|(a, b)| Line::new(*a, *b))
}
