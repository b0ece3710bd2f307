//! Common types for the collision tests.

use cgmath::{InnerSpace, Point2, Vector2};

/// 2D point: [`Point2<f64>`].
pub type P2 = Point2<f64>;

/// 2D vector: a [`Vector2<f64>`].
pub type V2 = Vector2<f64>;

/// Rotate a V2 vector 90 degrees anti-clockwise.
///
/// For an edge vector this produces the edge normal `(-y, x)`. The result is
/// not normalized.
pub fn v2_rot90_anticlockwise(v: V2) -> V2 {
    V2::new(-v.y, v.x)
}

/// Dot product of two vectors: `a.x * b.x + a.y * b.y`.
pub fn dot(a: V2, b: V2) -> f64 {
    a.dot(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rot90_of_x_axis_is_y_axis() {
        assert_eq!(v2_rot90_anticlockwise(V2::new(1.0, 0.0)), V2::new(0.0, 1.0));
    }

    #[test]
    fn test_dot_product() {
        assert_eq!(dot(V2::new(1.0, 2.0), V2::new(3.0, -4.0)), -5.0);
    }

    /// Perpendicular vectors have a zero dot product.
    #[test]
    fn test_rot90_is_perpendicular() {
        let v = V2::new(3.5, -1.25);
        assert_eq!(dot(v, v2_rot90_anticlockwise(v)), 0.0);
    }
}
