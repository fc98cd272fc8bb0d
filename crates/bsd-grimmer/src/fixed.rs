//! Fixed-point view of reported decimal values.
//!
//! A value reported to `d` decimals is held as integer units of 10^-d. The
//! GRIM stage is rational (integer sum over n), so with both sides in units
//! the reachability test is exact and never depends on how a tie happens to
//! be stored in binary.

use crate::rounding::{scale, TOLERANCE};

/// 2^53: every integer with magnitude up to this is exactly representable
/// as f64.
pub const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A reported value as integer units of `10^-decimals`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FixedDecimal {
    pub units: i64,
    pub decimals: u32,
}

impl FixedDecimal {
    /// Interpret `value` as a number reported to `decimals` places.
    ///
    /// Returns `None` when `value` is not on the 10^-decimals grid (within
    /// [`TOLERANCE`]), e.g. 3.444 claimed as a 2-decimal value, or when the
    /// scaled value leaves the exact-integer range.
    pub fn from_reported(value: f64, decimals: u32) -> Option<Self> {
        let factor = scale(decimals);
        let scaled = (value * factor).round();
        if !scaled.is_finite() || scaled.abs() > MAX_EXACT_INTEGER {
            return None;
        }
        let units = scaled as i64;
        if (units as f64 / factor - value).abs() < TOLERANCE {
            Some(Self { units, decimals })
        } else {
            None
        }
    }

    pub fn to_f64(self) -> f64 {
        self.units as f64 / scale(self.decimals)
    }
}

/// Round the rational `numerator / denominator` to `decimals` places and
/// return the result in units as `(half_down, half_up)`.
///
/// The two differ only on an exact tie, where half-down takes the floor and
/// half-up the ceiling.
pub fn round_ratio_units(numerator: i64, denominator: i64, decimals: u32) -> (i128, i128) {
    debug_assert!(denominator > 0);
    let scaled = numerator as i128 * 10i128.pow(decimals);
    let d = denominator as i128;
    let q = scaled.div_euclid(d);
    let twice_rem = 2 * scaled.rem_euclid(d);

    if twice_rem < d {
        (q, q)
    } else if twice_rem > d {
        (q + 1, q + 1)
    } else {
        (q, q + 1)
    }
}
