//! 2D polygons.

use crate::{
    error::PolygonError,
    line::{cross_product, Line},
    separation::{self, Contact},
    Interval, P2, V2,
};
use cgmath::InnerSpace;
use kiddo::{KdTree, SquaredEuclidean};

/// Closed polygon.
///
/// A polygon contains an ordered sequence of points, which are connected by
/// straight lines. The last point of the polygon is also connected to the first
/// point by a straight line. A single point is allowed, and behaves as a
/// polygon with no edges.
///
/// To construct a Polygon, use [`Polygon::new`] or, to also check that the
/// polygon is simple and convex, [`Polygon::convex`].
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    /// Vertices of the polygon.
    vertices: Vec<P2>,
}
impl Polygon {
    /// Distance below which two vertices are considered coincident by
    /// [`Polygon::convex`].
    pub const MIN_VERTEX_DISTANCE: f64 = 1e-9;

    /// Creates a new `Polygon` from the given vertices.
    ///
    /// # Errors
    ///
    /// - [`PolygonError::Empty`] if `vertices` is empty.
    pub fn new(vertices: Vec<P2>) -> Result<Self, PolygonError> {
        if vertices.is_empty() {
            Err(PolygonError::Empty)
        } else {
            Ok(Polygon { vertices })
        }
    }

    /// Creates a new `Polygon` that is checked to be usable by the separating
    /// axis test: either a single point, or a simple convex polygon with a
    /// non-zero area.
    ///
    /// # Errors
    ///
    /// - [`PolygonError::Empty`] if `vertices` is empty.
    /// - [`PolygonError::NotSimple`] if two vertices coincide or two
    ///   non-adjacent edges cross.
    /// - [`PolygonError::Degenerate`] if two or more vertices all lie on one
    ///   line.
    /// - [`PolygonError::NotConvex`] if the vertices do not all turn the same
    ///   way.
    pub fn convex(vertices: Vec<P2>) -> Result<Self, PolygonError> {
        let polygon = Polygon::new(vertices)?;
        if !polygon.is_simple(Polygon::MIN_VERTEX_DISTANCE) {
            return Err(PolygonError::NotSimple {
                vertices: polygon.len(),
            });
        }
        if polygon.len() > 1 && polygon.is_collinear() {
            return Err(PolygonError::Degenerate {
                vertices: polygon.len(),
            });
        }
        if let Some(vertex) = polygon.first_concave_vertex() {
            return Err(PolygonError::NotConvex { vertex });
        }
        Ok(polygon)
    }

    /// Returns the vertices of the polygon, in winding order.
    pub fn vertices(&self) -> &[P2] {
        &self.vertices
    }

    /// Returns the number of vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Always `false`: a `Polygon` has at least one vertex.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Construct all edges of the polygon.
    ///
    /// This returns an iterator which will produce all the lines that are the
    /// edges of the polygon, drawn between its pairs of vertices. A single
    /// point has no edges.
    pub fn edges(&self) -> impl Iterator<Item = Line> + '_ {
        separation::edges(&self.vertices)
    }

    /// Candidate separating axes: the normal of every edge.
    pub fn axes(&self) -> impl Iterator<Item = V2> + '_ {
        separation::edge_normals(&self.vertices)
    }

    /// Projects the polygon onto `axis`. See [`crate::project`].
    pub fn project(&self, axis: V2) -> Interval {
        separation::project(&self.vertices, axis)
    }

    /// Checks if this `Polygon` intersects another polygon, counting touching
    /// as intersecting.
    ///
    /// Both polygons are assumed to be convex. Polygons built with
    /// [`Polygon::convex`] always are. A segment or a collinear polygon built
    /// with [`Polygon::new`] has no area, and its edge normals alone cannot
    /// separate it from a shape lying further along its own line.
    pub fn intersects(&self, other: &Polygon) -> bool {
        self.intersects_with(other, Contact::Touching)
    }

    /// Checks if this `Polygon` intersects another polygon under a
    /// [`Contact`] policy.
    ///
    /// Two single points have no edges to test, so they are compared
    /// directly: they touch when they are equal and never overlap.
    pub fn intersects_with(&self, other: &Polygon, contact: Contact) -> bool {
        match (self.vertices.as_slice(), other.vertices.as_slice()) {
            ([p], [q]) => contact == Contact::Touching && p == q,
            (a, b) => separation::intersects_with(a, b, contact),
        }
    }

    /// Checks if a point lies inside or on the boundary of this (convex)
    /// polygon.
    pub fn contains_point(&self, point: P2) -> bool {
        Polygon { vertices: vec![point] }.intersects(self)
    }

    /// Check if this `Polygon` is a simple polygon.
    ///
    /// A simple polygon has no duplicate vertices, and no edges that intersect
    /// one another.
    ///
    /// # Parameters
    ///
    /// - `min_dist` distance below which vertices of the polygon are assumed
    ///   to be coincident.
    ///
    /// # Returns
    ///
    /// - `true` if the `Polygon` is a simple polygon.
    pub fn is_simple(&self, min_dist: f64) -> bool {
        let pt_test = points_coincident(min_dist, self.vertices.iter());
        let edge_test = non_adjacent_edges_intersect(self);
        !(pt_test || edge_test)
    }

    /// Return the winding direction at a vertex.
    ///
    /// See [`WindingDirection`] for how the direction is defined.
    ///
    /// # Parameters
    ///
    /// - `vertex`: index of the vertex for which to compute the winding
    ///   direction.
    ///
    /// # Returns
    ///
    /// - `None`: if the vertices are approximately collinear, and no winding
    ///   direction is defined.
    /// - `Some(direction)`: if the winding direction is defined.
    pub fn winding_direction(&self, vertex: usize) -> Option<WindingDirection> {
        let n = self.vertices.len();
        assert!(vertex < n);

        let i_prev = if vertex == 0 { n - 1 } else { vertex - 1 };
        let i_next = (vertex + 1) % n;

        let a = self.vertices[vertex] - self.vertices[i_prev];
        let b = self.vertices[i_next] - self.vertices[vertex];
        let cross = cross_product(a, b);

        // Ignore nearly-zero values, since they are approximately collinear.
        // The threshold scales with the edges so that the test does not
        // depend on the size of the polygon.
        if cross.abs() <= f64::EPSILON * a.magnitude() * b.magnitude() {
            None
        } else if cross > 0.0 {
            Some(WindingDirection::Anticlockwise)
        } else {
            Some(WindingDirection::Clockwise)
        }
    }

    /// Checks if this `Polygon` is convex.
    ///
    /// A convex polygon has all angles turning in the same direction. The
    /// test only makes sense for a simple polygon. Polygons with fewer than
    /// three vertices are convex.
    pub fn is_convex(&self) -> bool {
        self.first_concave_vertex().is_none()
    }

    /// Checks if every vertex lies on one line, so that the polygon has no
    /// defined winding direction anywhere.
    fn is_collinear(&self) -> bool {
        (0..self.vertices.len()).all(|vertex| self.winding_direction(vertex).is_none())
    }

    /// Index of the first vertex whose winding direction differs from the
    /// first defined one.
    fn first_concave_vertex(&self) -> Option<usize> {
        let mut windings = (0..self.vertices.len())
            .filter_map(|vertex| self.winding_direction(vertex).map(|dir| (vertex, dir)));
        let (_, reference) = windings.next()?;
        windings
            .find(|(_, dir)| *dir != reference)
            .map(|(vertex, _)| vertex)
    }

    /// Computes the centroid of a `Polygon`.
    ///
    /// The polygon must be simple for the area-weighted formula to be correct.
    /// For a polygon with (nearly) zero area, such as a point or a segment,
    /// the mean of the vertices is returned instead.
    pub fn centroid(&self) -> P2 {
        let n = self.vertices.len();
        let mut sa: f64 = 0.0; // signed area
        let mut cx: f64 = 0.0;
        let mut cy: f64 = 0.0;
        for i in 0..n {
            let j = if i == n - 1 { 0 } else { i + 1 };
            let pi = self.vertices[i];
            let pj = self.vertices[j];

            let z = pi.x * pj.y - pj.x * pi.y;
            sa += z;
            cx += (pi.x + pj.x) * z;
            cy += (pi.y + pj.y) * z;
        }

        sa /= 2.0;
        if sa.abs() < f64::EPSILON {
            let inv_n = 1.0 / n as f64;
            let (sx, sy) = self
                .vertices
                .iter()
                .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
            return P2::new(sx * inv_n, sy * inv_n);
        }
        P2::new(cx / (6.0 * sa), cy / (6.0 * sa))
    }
}

impl AsRef<[P2]> for Polygon {
    fn as_ref(&self) -> &[P2] {
        &self.vertices
    }
}

impl TryFrom<Vec<P2>> for Polygon {
    type Error = PolygonError;

    fn try_from(vertices: Vec<P2>) -> Result<Self, Self::Error> {
        Polygon::new(vertices)
    }
}

/// Winding direction.
///
/// Each vertex in the polygon has a winding direction. This is defined as
/// follows:
///
/// 1. Let `i` be the vertex of interest.
/// 2. Define `a` to be the vector from the previous vertex to the current
///    vertex: `a = points[i] - points[i-1]`
/// 3. Define `b` to be the vector from the current vertex to the next
///    vertex: `b = points[i+1] - points[i]`.
///
/// The rotation FROM `a` to get to `b` is either `Clockwise` or
/// `Anticlockwise`, measured with y pointing up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindingDirection {
    /// Clockwise winding at the current vertex.
    Clockwise,
    /// Anticlockwise winding at the current vertex.
    Anticlockwise,
}

/// Checks if any supplied points are coincident up to a supplied minimum
/// distance.
///
/// This places the points inside a [`KdTree`] to speed up checks.
///
/// # Parameters
///
/// - `min_dist`: the minimum allowable distance between points.
/// - `points`: an iterator of points.
///
/// # Returns
///
/// - `true` if at least two points lie within `min_dist` of each other
/// - `false` if there are no coincident points
fn points_coincident<'a>(min_dist: f64, points: impl Iterator<Item = &'a P2>) -> bool {
    let mut kd_tree: KdTree<f64, 2> = KdTree::new();
    let min_dist_sq = min_dist * min_dist;

    for (i, p) in points.enumerate() {
        if kd_tree
            .within_unsorted_iter::<SquaredEuclidean>(&[p.x, p.y], min_dist_sq)
            .next()
            .is_some()
        {
            return true;
        }
        kd_tree.add(&[p.x, p.y], i as u64);
    }

    false
}

/// Checks if any non-adjacent edges of a polygon intersect.
fn non_adjacent_edges_intersect(polygon: &Polygon) -> bool {
    let edges: Vec<Line> = polygon.edges().collect();
    let n = edges.len();
    if n < 4 {
        return false;
    }

    // Compare all pairs of edges, skipping adjacent edges.
    for i in 0..(n - 2) {
        for j in (i + 2)..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            if edges[i].intersection(&edges[j]).is_some() {
                return true;
            }
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::Tol;
    use proptest::prelude::*;

    /// A square polygon.
    fn square() -> Polygon {
        Polygon::new(vec![
            P2::new(0.0, 0.0),
            P2::new(1.0, 0.0),
            P2::new(1.0, 1.0),
            P2::new(0.0, 1.0),
        ])
        .unwrap()
    }

    /// A "bowtie" polygon.
    fn bowtie() -> Vec<P2> {
        vec![
            P2::new(0.0, 0.0),
            P2::new(1.0, 0.0),
            P2::new(0.0, 1.0),
            P2::new(1.0, 1.0),
        ]
    }

    /// A square with one side pushed in.
    fn dented() -> Vec<P2> {
        vec![
            P2::new(0.0, 0.0),
            P2::new(1.0, 0.0),
            P2::new(1.0, 1.0),
            P2::new(0.5, 0.7),
            P2::new(0.0, 1.0),
        ]
    }

    #[test]
    fn test_empty_polygon_is_rejected() {
        assert_eq!(Polygon::new(vec![]), Err(PolygonError::Empty));
        assert_eq!(Polygon::convex(vec![]), Err(PolygonError::Empty));
    }

    #[test]
    fn test_single_point_is_a_polygon() {
        let point = Polygon::convex(vec![P2::new(3.0, 4.0)]).unwrap();
        assert_eq!(point.len(), 1);
        assert_eq!(point.edges().count(), 0);
        assert_eq!(point.centroid(), P2::new(3.0, 4.0));
    }

    /// A square should be a simple polygon.
    #[test]
    fn test_square_is_simple_polygon() {
        assert!(square().is_simple(1e-3))
    }

    /// A "bowtie" should not be a simple polygon.
    #[test]
    fn test_bowtie_is_not_simple_polygon() {
        assert_eq!(
            Polygon::convex(bowtie()),
            Err(PolygonError::NotSimple { vertices: 4 })
        );
    }

    /// A polygon with coincident points should not be a simple polygon.
    #[test]
    fn test_coincident_points_not_simple_polygon() {
        let coincident = Polygon::new(vec![
            P2::new(0.0, 0.0),
            P2::new(1.0, 0.0),
            P2::new(1.0001, 0.0),
            P2::new(0.0001, 0.0),
        ])
        .unwrap();
        assert!(!coincident.is_simple(1e-3))
    }

    /// A square should be convex.
    #[test]
    fn test_square_is_convex() {
        assert!(square().is_convex());
        assert_eq!(
            square().winding_direction(0),
            Some(WindingDirection::Anticlockwise)
        );
    }

    /// A non-convex polygon should be non-convex.
    #[test]
    fn test_non_convex_is_not_convex() {
        assert!(!Polygon::new(dented()).unwrap().is_convex());
        assert_eq!(
            Polygon::convex(dented()),
            Err(PolygonError::NotConvex { vertex: 3 })
        );
    }

    /// The same dent, at a scale where absolute cross products are tiny.
    #[test]
    fn test_small_non_convex_is_not_convex() {
        let small: Vec<P2> = dented()
            .into_iter()
            .map(|p| P2::new(p.x * 1e-8, p.y * 1e-8))
            .collect();
        assert_eq!(
            Polygon::convex(small),
            Err(PolygonError::NotConvex { vertex: 3 })
        );
    }

    /// A small bowtie still crosses itself.
    #[test]
    fn test_small_bowtie_is_not_simple() {
        let small: Vec<P2> = bowtie()
            .into_iter()
            .map(|p| P2::new(p.x * 1e-6, p.y * 1e-6))
            .collect();
        assert!(!Polygon::new(small).unwrap().is_simple(1e-9));
    }

    #[test]
    fn test_segment_is_degenerate() {
        let segment = vec![P2::new(0.0, 0.0), P2::new(1.0, 0.0)];
        assert_eq!(
            Polygon::convex(segment),
            Err(PolygonError::Degenerate { vertices: 2 })
        );
    }

    #[test]
    fn test_collinear_triangle_is_degenerate() {
        let collinear = vec![P2::new(0.0, 0.0), P2::new(1.0, 0.0), P2::new(2.0, 0.0)];
        assert_eq!(
            Polygon::convex(collinear),
            Err(PolygonError::Degenerate { vertices: 3 })
        );
    }

    #[test]
    fn test_single_points_intersect_only_when_equal() {
        let a = Polygon::convex(vec![P2::new(0.0, 0.0)]).unwrap();
        let b = Polygon::convex(vec![P2::new(100.0, 100.0)]).unwrap();
        assert!(!a.intersects(&b));
        assert!(!b.intersects(&a));
        assert!(a.intersects(&a.clone()));
        assert!(!a.intersects_with(&a.clone(), Contact::Overlapping));
        assert!(a.contains_point(P2::new(0.0, 0.0)));
        assert!(!a.contains_point(P2::new(0.0, 1.0)));
    }

    #[test]
    fn test_axes_are_edge_normals() {
        let axes: Vec<V2> = square().axes().collect();
        assert_eq!(
            axes,
            vec![
                V2::new(0.0, 1.0),
                V2::new(-1.0, 0.0),
                V2::new(0.0, -1.0),
                V2::new(1.0, 0.0),
            ]
        );
    }

    #[test]
    fn test_contains_point() {
        let square = square();
        assert!(square.contains_point(P2::new(0.5, 0.5)));
        assert!(square.contains_point(P2::new(1.0, 0.5)));
        assert!(!square.contains_point(P2::new(1.5, 0.5)));
    }

    /// Bounding boxes overlap, but the polygons do not.
    #[test]
    fn test_intersects_convex_example_1() {
        let a = Polygon::convex(vec![
            P2::new(4.0, 0.0),
            P2::new(7.0, 0.0),
            P2::new(7.0, 3.0),
            P2::new(4.0, 3.0),
        ])
        .unwrap();
        let b = Polygon::convex(vec![
            P2::new(1.0, 1.0),
            P2::new(6.0, 6.0),
            P2::new(5.0, 7.0),
            P2::new(0.0, 2.0),
        ])
        .unwrap();

        assert!(!a.intersects(&b));
        assert!(!b.intersects(&a));
    }

    #[test]
    fn test_intersects_convex_example_2() {
        let a = Polygon::convex(vec![
            P2::new(4.0, 0.0),
            P2::new(7.0, 0.0),
            P2::new(7.0, 3.0),
            P2::new(4.0, 3.0),
        ])
        .unwrap();
        let b = Polygon::convex(vec![
            P2::new(3.0, 1.0),
            P2::new(8.0, 6.0),
            P2::new(7.0, 7.0),
            P2::new(2.0, 2.0),
        ])
        .unwrap();

        assert!(a.intersects(&b));
    }

    /// A polygon completely contained within another intersects it.
    #[test]
    fn test_intersects_convex_contained() {
        let a = Polygon::convex(vec![
            P2::new(0.0, 0.0),
            P2::new(3.0, 0.0),
            P2::new(3.0, 3.0),
            P2::new(0.0, 3.0),
        ])
        .unwrap();
        let b = Polygon::convex(vec![
            P2::new(1.0, 1.0),
            P2::new(2.0, 1.0),
            P2::new(2.0, 2.0),
            P2::new(1.0, 2.0),
        ])
        .unwrap();

        assert!(a.intersects(&b));
        assert!(a.intersects_with(&b, Contact::Overlapping));
    }

    proptest! {
        /// The centroid of a right triangle is one-third the distance along
        /// its edges from the right-angled corner.
        #[test]
        fn test_right_triangle_centroid(w in 0.5f64..10.0, h in 0.5f64..10.0) {
            let right_triangle = Polygon::new(vec![
                P2::new(0.0, 0.0),
                P2::new(w, 0.0),
                P2::new(0.0, h)
            ]).unwrap();
            let expected_centroid = P2::new(w/3.0, h/3.0);
            let centroid = right_triangle.centroid();

            let tol = Tol::default().scale(1e1);
            assert_close!(tol, centroid, expected_centroid);
        }

        /// The centroid of a rectangle is half way along its edges.
        #[test]
        fn test_rectangle_centroid(w in 0.5f64..10.0, h in 0.5f64..10.0) {
            let rectangle = Polygon::new(vec![
                P2::new(0.0, 0.0),
                P2::new(w, 0.0),
                P2::new(w, h),
                P2::new(0.0, h)
            ]).unwrap();
            let expected_centroid = P2::new(w/2.0, h/2.0);
            let centroid = rectangle.centroid();

            let tol = Tol::default().scale(1e1);
            assert_close!(tol, centroid, expected_centroid);
        }
    }
}
