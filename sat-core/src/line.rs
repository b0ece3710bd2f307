use crate::{types::v2_rot90_anticlockwise, P2, V2};
use cgmath::InnerSpace;

/// Line segment between two points.
///
/// Polygon edges are handed out as `Line`s. To construct a line, use
/// [`Line::new`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    /// Start point of the line.
    a: P2,
    /// End point of the line.
    b: P2,
}
impl Line {
    /// Create a new line from two points.
    ///
    /// # Parameters
    ///
    /// - `a`: An end-point of the line.
    /// - `b`: The other end-point of the line.
    ///
    /// # Returns
    ///
    /// A new line.
    pub fn new(a: P2, b: P2) -> Line {
        Line { a, b }
    }

    /// Returns the start point of the line.
    pub fn start(&self) -> P2 {
        self.a
    }

    /// Returns the end point of the line.
    pub fn end(&self) -> P2 {
        self.b
    }

    /// Return the vector along the line.
    ///
    /// The returned vector starts from the beginning of the line, and is the
    /// length of the line, in the direction of the end of the line.
    pub fn ab_vec(&self) -> V2 {
        self.b - self.a
    }

    /// Return the (unnormalized) normal of the line: `ab_vec` turned 90
    /// degrees anti-clockwise.
    ///
    /// The normal has the same length as the line. This is the candidate axis
    /// the separating axis test projects onto.
    pub fn normal(&self) -> V2 {
        v2_rot90_anticlockwise(self.ab_vec())
    }

    /// Evaluate the line at parameter value `t`.
    ///
    /// `t = 0` is the start point and `t = 1` is the end point. Values outside
    /// `[0, 1]` give collinear points beyond the ends.
    pub fn eval_param(&self, t: f64) -> P2 {
        self.a + t * self.ab_vec()
    }

    /// Find the intersection point of two line segments.
    ///
    /// Parallel segments, including collinear overlapping ones, report no
    /// intersection.
    ///
    /// # Parameters
    ///
    /// - `line`: A second line to try to intersect this one with.
    ///
    /// # Returns
    ///
    /// An intersection point, if one exists.
    pub fn intersection(&self, line: &Line) -> Option<P2> {
        let r = self.ab_vec();
        let s = line.ab_vec();
        let denom = cross_product(r, s);
        if denom.abs() <= f64::EPSILON * r.magnitude() * s.magnitude() {
            return None;
        }

        let qp = line.a - self.a;
        let t = cross_product(qp, s) / denom;
        let u = cross_product(qp, r) / denom;
        if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
            Some(self.eval_param(t))
        } else {
            None
        }
    }
}

/// Return the 2D cross product: `a x b`.
pub(crate) fn cross_product(a: V2, b: V2) -> f64 {
    a.x * b.y - a.y * b.x
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test intersecting two lines where an intersection is known to exist.
    #[test]
    fn test_line_intersection_exists() {
        let line1 = Line::new(P2::new(0.0, 1.0), P2::new(6.0, 5.0));
        let line2 = Line::new(P2::new(2.0, 6.0), P2::new(4.0, 0.0));

        let intersection = line1.intersection(&line2);
        let expected = P2::new(3.0, 3.0);
        assert_close!(intersection, Some(expected));
    }

    /// Test intersecting two lines where there is no intersection.
    #[test]
    fn test_line_intersection_does_not_exist() {
        let line1 = Line::new(P2::new(2.0, 0.0), P2::new(0.0, 6.0));
        let line2 = Line::new(P2::new(2.0, 6.0), P2::new(4.0, 0.0));

        assert_eq!(line1.intersection(&line2), None);
    }

    /// A vertical segment crossing a horizontal one.
    #[test]
    fn test_vertical_line_intersection() {
        let vertical = Line::new(P2::new(1.0, -1.0), P2::new(1.0, 1.0));
        let horizontal = Line::new(P2::new(0.0, 0.0), P2::new(2.0, 0.0));

        assert_close!(vertical.intersection(&horizontal), Some(P2::new(1.0, 0.0)));
    }

    #[test]
    fn test_parallel_lines_do_not_intersect() {
        let a = Line::new(P2::new(0.0, 0.0), P2::new(1.0, 0.0));
        let b = Line::new(P2::new(0.0, 1.0), P2::new(1.0, 1.0));
        assert_eq!(a.intersection(&b), None);
    }

    #[test]
    fn test_normal_is_anticlockwise_perpendicular() {
        let line = Line::new(P2::new(1.0, 1.0), P2::new(4.0, 1.0));
        assert_eq!(line.normal(), V2::new(0.0, 3.0));
    }
}
