//! Basis-vector normal to QLog.
//!
//! A normal `n` is the image of +Z under a rotation about an axis in the XY
//! plane. With `z = cos(theta)`, the half-angle of that rotation is
//! `acos(sqrt((1 + z) / 2)) = theta / 2` and the axis direction is the XY
//! projection of `n`, so the quaternion logarithm is
//!
//! ```text
//! (u, v) = (x, y) / |(x, y)| * halfAngle
//! ```
//!
//! At the pole `|(x, y)|` vanishes; the denominator is then forced to 1,
//! which yields the identity rotation since the half-angle is zero there.

use crate::Bias;
use qlog_core::{Normal, QLog};

/// Packed value of the unused third QLog channel (real part 0).
pub const QLOG_FILL: f32 = 0.5;

/// Computes the quaternion logarithm of the rotation taking +Z to `normal`.
///
/// Never produces NaN or infinity for finite input: the XY length is
/// guarded against zero and the `acos` argument is clamped to [0, 1].
///
/// # Example
///
/// ```rust
/// use qlog_core::{Normal, QLog};
/// use qlog_ops::forward::to_qlog;
///
/// assert_eq!(to_qlog(Normal::UP), QLog::IDENTITY);
/// ```
#[inline]
pub fn to_qlog(normal: Normal) -> QLog {
    let mut denominator = normal.xy_length_squared().sqrt();
    if denominator < f32::EPSILON {
        denominator = 1.0;
    }

    let half_angle = ((1.0 + normal.z) * 0.5).clamp(0.0, 1.0).sqrt().acos();

    QLog::new(
        normal.x * half_angle / denominator,
        normal.y * half_angle / denominator,
    )
}

/// Converts one packed basis-normal pixel into a packed QLog pixel.
///
/// `packed` holds the [0, 1] encoded X, Y, Z channels. When `derive_z` is
/// set, the stored Z is ignored and recomputed from X and Y. The returned
/// third channel is always [`QLOG_FILL`].
#[inline]
pub fn encode_pixel(packed: [f32; 3], derive_z: bool, bias: &Bias) -> [f32; 3] {
    let mut normal = Normal::from_packed(packed);
    if derive_z {
        normal = normal.with_derived_z();
    }

    let qlog = to_qlog(normal);
    [
        bias.apply_then_pack(qlog.u),
        bias.apply_then_pack(qlog.v),
        QLOG_FILL,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use qlog_core::QLOG_RANGE;

    #[test]
    fn test_pole_is_identity_for_any_bias() {
        for &b in &[-2.0f32, -0.5, 0.0, 0.5, 3.0] {
            let out = encode_pixel([0.5, 0.5, 1.0], false, &Bias::new(b));
            assert_eq!(out, [0.5, 0.5, 0.5]);
        }
    }

    #[test]
    fn test_horizon_x_maps_to_edge() {
        // (1, 0, 0): half-angle pi/4 along +u.
        let out = encode_pixel([1.0, 0.5, 0.5], false, &Bias::LINEAR);
        assert_abs_diff_eq!(out[0], 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(out[1], 0.5, epsilon = 1e-6);
        assert_eq!(out[2], QLOG_FILL);
    }

    #[test]
    fn test_horizon_negative_y() {
        let qlog = to_qlog(Normal::new(0.0, -1.0, 0.0));
        assert_abs_diff_eq!(qlog.u, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(qlog.v, -QLOG_RANGE, epsilon = 1e-5);
    }

    #[test]
    fn test_half_angle_matches_tilt() {
        let theta = 0.6f32;
        let normal = Normal::new(theta.sin() * 0.6, theta.sin() * 0.8, theta.cos());
        let qlog = to_qlog(normal);
        assert_abs_diff_eq!(qlog.half_angle(), theta * 0.5, epsilon = 1e-5);
        assert_abs_diff_eq!(qlog.u / qlog.v, 0.75, epsilon = 1e-4);
    }

    #[test]
    fn test_derive_z_ignores_stored_z() {
        let bias = Bias::LINEAR;
        // X = 0.6, Y = 0 -> derived Z = 0.8; stored Z is garbage.
        let derived = encode_pixel([0.8, 0.5, 0.0], true, &bias);
        let explicit = encode_pixel([0.8, 0.5, 0.9], false, &bias);
        assert_abs_diff_eq!(derived[0], explicit[0], epsilon = 1e-5);
        assert_abs_diff_eq!(derived[1], explicit[1], epsilon = 1e-6);
    }

    #[test]
    fn test_degenerate_inputs_are_finite() {
        let bias = Bias::new(1.5);
        let cases = [
            [0.5, 0.5, 0.0],     // antipode
            [0.5, 0.5, 0.5],     // zero vector
            [1.0, 1.0, 1.0],     // too long
            [0.0, 0.0, 0.0],     // too long, negative
            [2.0, -1.0, 3.0],    // outside [0, 1]
        ];
        for packed in cases {
            for derive_z in [false, true] {
                let out = encode_pixel(packed, derive_z, &bias);
                assert!(out.iter().all(|v| v.is_finite()), "{packed:?} -> {out:?}");
            }
        }
    }

    #[test]
    fn test_derive_z_outside_disk() {
        // |xy| > 1 derives z = 0 -> horizon, half-angle pi/4.
        let qlog = to_qlog(Normal::new(1.0, 1.0, 0.0).with_derived_z());
        assert_abs_diff_eq!(qlog.half_angle(), QLOG_RANGE, epsilon = 1e-5);
    }
}
