//! Rotation of points about an arbitrary center.

use crate::P2;
use cgmath::{Basis2, Deg, Rotation, Rotation2};

/// Rotates `point` about `center` by `angle_degrees`.
///
/// The point is translated so that `center` sits at the origin, rotated with
///
/// ```text
/// x' = x cos θ - y sin θ
/// y' = x sin θ + y cos θ
/// ```
///
/// and translated back. With y pointing up a positive angle is
/// anti-clockwise; in y-down screen coordinates it is clockwise. Any code
/// that draws a rotated shape must use this same function so that what is
/// drawn and what is hit-tested turn the same way.
///
/// # Parameters
///
/// - `point`: The point to rotate.
/// - `center`: Center of the rotation.
/// - `angle_degrees`: Rotation angle in degrees. Any finite value is valid.
///
/// # Returns
///
/// The rotated point.
pub fn rotate(point: P2, center: P2, angle_degrees: f64) -> P2 {
    let rotation: Basis2<f64> = Rotation2::from_angle(Deg(angle_degrees));
    center + rotation.rotate_vector(point - center)
}

/// Rotates every point of `points` in place. See [`rotate`].
pub fn rotate_all(points: &mut [P2], center: P2, angle_degrees: f64) {
    let rotation: Basis2<f64> = Rotation2::from_angle(Deg(angle_degrees));
    for p in points.iter_mut() {
        *p = center + rotation.rotate_vector(*p - center);
    }
}
