//! QLog to basis-vector normal.
//!
//! Exponentiating the quaternion logarithm `(u, v)` gives a rotation by
//! `angle = 2 * |(u, v)|` about the axis `(u, v) / |(u, v)|`. Applied to +Z:
//!
//! ```text
//! x = u * sin(angle) / |(u, v)|
//! y = v * sin(angle) / |(u, v)|
//! z = cos(angle)
//! ```

use crate::Bias;
use qlog_core::{Normal, QLog};

/// Rotates +Z by the rotation whose quaternion logarithm is `qlog`.
///
/// A zero-length `qlog` (magnitude below [`f32::EPSILON`]) uses a
/// denominator of 1 and returns [`Normal::UP`].
///
/// # Example
///
/// ```rust
/// use qlog_core::{Normal, QLog};
/// use qlog_ops::inverse::from_qlog;
///
/// assert_eq!(from_qlog(QLog::IDENTITY), Normal::UP);
/// ```
#[inline]
pub fn from_qlog(qlog: QLog) -> Normal {
    let half_angle_sq = qlog.half_angle_squared();

    let mut denominator = half_angle_sq.sqrt();
    if denominator < f32::EPSILON {
        denominator = 1.0;
    }

    let angle = 2.0 * half_angle_sq.sqrt();
    let (sin_angle, cos_angle) = angle.sin_cos();

    Normal::new(
        qlog.u * sin_angle / denominator,
        qlog.v * sin_angle / denominator,
        cos_angle,
    )
}

/// Converts one packed QLog pixel into a packed basis-normal pixel.
///
/// Only the first two channels of a QLog map carry information.
#[inline]
pub fn decode_pixel(packed: [f32; 2], bias: &Bias) -> [f32; 3] {
    let qlog = QLog::new(
        bias.unpack_then_remove(packed[0]),
        bias.unpack_then_remove(packed[1]),
    );
    from_qlog(qlog).to_packed()
}
