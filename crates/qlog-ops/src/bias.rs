//! Precision bias - signed power-law warp of packed QLog values.
//!
//! QLog components are normalized to [-1, 1] by dividing by pi/4 and then
//! warped with `sign(t) * |t|^exp` before packing to [0, 1]. Encoding uses
//! the `apply` exponent and decoding the `remove` exponent; the two are
//! reciprocals, so the curves are exact inverses of each other.
//!
//! | bias | remove        | apply   | packed precision          |
//! |------|---------------|---------|---------------------------|
//! | 0    | 1             | 1       | linear                    |
//! | > 0  | 1 + bias      | < 1     | concentrated near normal  |
//! | < 0  | 1 / (1 - bias)| > 1     | spread toward extremes    |

use qlog_core::{pack_unit, unpack_unit, QLOG_RANGE};

/// Curve exponents derived from a signed bias value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bias {
    apply: f32,
    remove: f32,
}

impl Bias {
    /// Linear precision (bias 0).
    pub const LINEAR: Self = Self {
        apply: 1.0,
        remove: 1.0,
    };

    /// Derives the apply/remove exponents from a bias value.
    ///
    /// For any finite bias both exponents are positive and
    /// `apply * remove == 1` up to rounding.
    ///
    /// # Example
    ///
    /// ```rust
    /// use qlog_ops::Bias;
    ///
    /// let bias = Bias::new(1.0);
    /// assert_eq!(bias.remove(), 2.0);
    /// assert_eq!(bias.apply(), 0.5);
    ///
    /// let bias = Bias::new(-1.0);
    /// assert_eq!(bias.remove(), 0.5);
    /// assert_eq!(bias.apply(), 2.0);
    /// ```
    pub fn new(bias: f32) -> Self {
        let remove = if bias >= 0.0 {
            1.0 + bias
        } else {
            1.0 / (1.0 - bias)
        };

        Self {
            apply: 1.0 / remove,
            remove,
        }
    }

    /// Exponent used when encoding (packing) QLog values.
    #[inline]
    pub fn apply(&self) -> f32 {
        self.apply
    }

    /// Exponent used when decoding (unpacking) QLog values.
    #[inline]
    pub fn remove(&self) -> f32 {
        self.remove
    }

    /// Normalizes a QLog component, applies the bias curve, packs to [0, 1].
    #[inline]
    pub fn apply_then_pack(&self, value: f32) -> f32 {
        pack_unit(pow_mirror(value / QLOG_RANGE, self.apply))
    }

    /// Unpacks a [0, 1] value, removes the bias curve, scales to radians.
    #[inline]
    pub fn unpack_then_remove(&self, packed: f32) -> f32 {
        pow_mirror(unpack_unit(packed), self.remove) * QLOG_RANGE
    }
}

impl Default for Bias {
    fn default() -> Self {
        Self::LINEAR
    }
}

/// Sign-preserving power: `sign(x) * |x|^exp`.
#[inline]
fn pow_mirror(x: f32, exp: f32) -> f32 {
    let magnitude = x.abs().powf(exp);
    if x < 0.0 { -magnitude } else { magnitude }
}
