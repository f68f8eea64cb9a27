//! Normal and QLog value types.
//!
//! A normal map stores each direction as three channels packed from
//! [-1, 1] into [0, 1]. A QLog map stores the two imaginary components of
//! the quaternion logarithm of the rotation that takes +Z to that direction.
//! The real component is always zero and never stored.
//!
//! ```text
//! Normal (x, y, z)      unit sphere, packed via v' = (v + 1) / 2
//! QLog   (u, v)         disk of radius QLOG_RANGE (= pi/4) for the upper hemisphere
//! ```

use std::f32::consts::FRAC_PI_4;

/// Half-angle that maps to the edge of the packed QLog range.
///
/// A normal lying on the horizon (z = 0) is a 90 degree rotation of +Z,
/// whose quaternion logarithm has magnitude pi/4.
pub const QLOG_RANGE: f32 = FRAC_PI_4;

/// Maps a value from [-1, 1] to [0, 1].
#[inline]
pub fn pack_unit(v: f32) -> f32 {
    (v + 1.0) * 0.5
}

/// Maps a value from [0, 1] to [-1, 1].
#[inline]
pub fn unpack_unit(v: f32) -> f32 {
    v * 2.0 - 1.0
}

/// Reconstructs Z of an upper-hemisphere unit normal from X and Y.
///
/// Returns `sqrt(1 - x^2 - y^2)`, or `0.0` when the radicand is below
/// [`f32::EPSILON`]. The result is never negative.
///
/// # Example
///
/// ```rust
/// use qlog_core::z_from_xy;
///
/// assert_eq!(z_from_xy(0.0, 0.0), 1.0);
/// assert_eq!(z_from_xy(1.0, 1.0), 0.0);
/// ```
#[inline]
pub fn z_from_xy(x: f32, y: f32) -> f32 {
    let z = 1.0 - (x * x + y * y);
    if z < f32::EPSILON { 0.0 } else { z.sqrt() }
}

/// A basis-vector normal in tangent space.
///
/// Components are nominally in [-1, 1] with unit length, but nothing here
/// enforces it; the converters accept slightly denormalized input.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Normal {
    /// Tangent component
    pub x: f32,
    /// Bitangent component
    pub y: f32,
    /// Normal component
    pub z: f32,
}

impl Normal {
    /// The unperturbed normal (0, 0, 1).
    pub const UP: Self = Self::new(0.0, 0.0, 1.0);

    /// Creates a new normal.
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Unpacks a normal from three [0, 1] channel values.
    #[inline]
    pub fn from_packed(packed: [f32; 3]) -> Self {
        Self::new(
            unpack_unit(packed[0]),
            unpack_unit(packed[1]),
            unpack_unit(packed[2]),
        )
    }

    /// Packs the normal into three [0, 1] channel values.
    #[inline]
    pub fn to_packed(self) -> [f32; 3] {
        [pack_unit(self.x), pack_unit(self.y), pack_unit(self.z)]
    }

    /// Squared length of the XY projection.
    #[inline]
    pub fn xy_length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    /// Squared length.
    #[inline]
    pub fn length_squared(self) -> f32 {
        self.xy_length_squared() + self.z * self.z
    }

    /// Returns a copy with Z recomputed from X and Y via [`z_from_xy`].
    #[inline]
    pub fn with_derived_z(self) -> Self {
        Self::new(self.x, self.y, z_from_xy(self.x, self.y))
    }
}

/// Imaginary part of a quaternion logarithm, in radians.
///
/// The magnitude is the half-angle of the encoded rotation and the direction
/// is the rotation axis in the XY plane.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct QLog {
    /// First imaginary component
    pub u: f32,
    /// Second imaginary component
    pub v: f32,
}

impl QLog {
    /// The identity rotation.
    pub const IDENTITY: Self = Self::new(0.0, 0.0);

    /// Creates a new QLog value.
    #[inline]
    pub const fn new(u: f32, v: f32) -> Self {
        Self { u, v }
    }

    /// Squared half-angle.
    #[inline]
    pub fn half_angle_squared(self) -> f32 {
        self.u * self.u + self.v * self.v
    }

    /// Half-angle of the encoded rotation.
    #[inline]
    pub fn half_angle(self) -> f32 {
        self.half_angle_squared().sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_pack_unpack_endpoints() {
        assert_eq!(pack_unit(-1.0), 0.0);
        assert_eq!(pack_unit(0.0), 0.5);
        assert_eq!(pack_unit(1.0), 1.0);
        assert_eq!(unpack_unit(0.0), -1.0);
        assert_eq!(unpack_unit(0.5), 0.0);
        assert_eq!(unpack_unit(1.0), 1.0);
    }

    #[test]
    fn test_z_from_xy_matches_sqrt() {
        for &(x, y) in &[(0.0f32, 0.0f32), (0.3, 0.4), (-0.6, 0.0), (0.1, -0.7)] {
            let expected = (1.0 - x * x - y * y).sqrt();
            assert_abs_diff_eq!(z_from_xy(x, y), expected, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_z_from_xy_never_negative() {
        // Radicand below epsilon (and negative) clamps to zero.
        assert_eq!(z_from_xy(0.8, 0.6), 0.0);
        assert_eq!(z_from_xy(1.0, 0.5), 0.0);
        assert_eq!(z_from_xy(-2.0, 3.0), 0.0);
        for i in 0..=20 {
            let x = -1.0 + i as f32 * 0.1;
            assert!(z_from_xy(x, 0.5) >= 0.0);
        }
    }

    #[test]
    fn test_normal_packing() {
        let n = Normal::from_packed([0.5, 0.5, 1.0]);
        assert_eq!(n, Normal::UP);
        assert_eq!(Normal::UP.to_packed(), [0.5, 0.5, 1.0]);
    }

    #[test]
    fn test_with_derived_z() {
        let n = Normal::new(0.6, 0.0, -0.3).with_derived_z();
        assert_abs_diff_eq!(n.z, 0.8, epsilon = 1e-6);
        assert_abs_diff_eq!(n.length_squared(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_qlog_half_angle() {
        let q = QLog::new(0.3, 0.4);
        assert_abs_diff_eq!(q.half_angle(), 0.5, epsilon = 1e-6);
        assert_eq!(QLog::IDENTITY.half_angle(), 0.0);
    }
}
