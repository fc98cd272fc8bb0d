use crate::fixed::{round_ratio_units, FixedDecimal, MAX_EXACT_INTEGER};
use crate::rounding::scale;
use crate::{ConsistencyVerdict, GrimmerFailure, InvalidInput, ReportedStatistics};

// ---------------------------------------------------------------------------
// Stage helpers
// ---------------------------------------------------------------------------

/// Stage 0: with more than 10^decimals observations every reported mean is
/// reachable from some integer sum, so GRIM cannot discriminate.
fn grim_applicable(n: i64, decimals_mean: u32) -> bool {
    // decimals_mean <= MAX_DECIMALS, so the power fits in i64.
    n <= 10i64.pow(decimals_mean)
}

/// Stage 1: does `realsum / n`, rounded half-down or half-up, give back the
/// reported mean?
///
/// Both sides are compared in units of 10^-decimals_mean. A mean that is not
/// on that grid cannot be the rounding of anything.
fn mean_reachable(realsum: i64, n: i64, mean: f64, decimals_mean: u32) -> bool {
    let Some(reported) = FixedDecimal::from_reported(mean, decimals_mean) else {
        return false;
    };
    let (down, up) = round_ratio_units(realsum, n, decimals_mean);
    let reported = reported.units as i128;
    reported == down || reported == up
}

/// Stage 2 widens the reported SD by this many units of its last decimal on
/// each side.
const SD_WINDOW_UNITS: i128 = 5;

/// Integer sums of squares `x` whose implied SD lies in
/// `[lower_w / k, upper_w / k]` with `k = sd_scale`, as `(ceil, floor)`.
///
/// With `realsum` = S, the sample variance of integer data is
/// `(n x - S^2) / (n (n - 1))`, so `sigma = w / k` maps to
/// `x = ((n - 1) n w^2 + k^2 S^2) / (n k^2)`. Everything stays in i128;
/// `None` means a bound does not fit.
fn sum_of_squares_interval(
    n: i128,
    realsum: i128,
    sd_scale: i128,
    lower_w: i128,
    upper_w: i128,
) -> Option<(i128, i128)> {
    let dof_n = n.checked_mul(n - 1)?;
    let k2 = sd_scale.checked_mul(sd_scale)?;
    let mean_term = k2.checked_mul(realsum.checked_mul(realsum)?)?;
    let denom = n.checked_mul(k2)?;
    let bound = |w: i128| -> Option<i128> {
        dof_n.checked_mul(w.checked_mul(w)?)?.checked_add(mean_term)
    };

    let lower = bound(lower_w)?;
    let upper = bound(upper_w)?;
    Some((div_ceil(lower, denom), upper.div_euclid(denom)))
}

fn div_ceil(num: i128, denom: i128) -> i128 {
    -((-num).div_euclid(denom))
}

fn too_large() -> InvalidInput {
    InvalidInput::OutOfRange {
        field: "sum_of_squares",
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// A-GRIMMER: could integer data of size `n` produce the reported mean and
/// SD once both are rounded to their reported precision?
///
/// Negative findings come back as a [`ConsistencyVerdict`]; only input the
/// arithmetic cannot handle is an error.
pub fn a_grimmer(input: &ReportedStatistics) -> Result<ConsistencyVerdict, InvalidInput> {
    input.validate()?;

    let n = input.n;

    // 0) Applicability guard. The mean is echoed, not recomputed.
    if !grim_applicable(n, input.decimals_mean) {
        return Ok(ConsistencyVerdict::inapplicable(input.mean));
    }

    // 1) GRIM. Nearest integer sum, ties to even.
    let total = input.mean * n as f64;
    if total.abs() > MAX_EXACT_INTEGER {
        return Err(InvalidInput::OutOfRange { field: "mean" });
    }
    let realsum = total.round_ties_even() as i64;
    let realmean = realsum as f64 / n as f64;

    if !mean_reachable(realsum, n, input.mean, input.decimals_mean) {
        return Ok(ConsistencyVerdict::grim_failed(realmean));
    }

    // 2) Integer range for the sum of squares, in exact arithmetic.
    if (input.sd * scale(input.decimals_sd)).round() > MAX_EXACT_INTEGER {
        return Err(InvalidInput::OutOfRange { field: "sd" });
    }
    let Some(sd) = FixedDecimal::from_reported(input.sd, input.decimals_sd) else {
        // Off its reported grid the SD is not the rounding of any value.
        return Ok(ConsistencyVerdict::grimmer_failed(
            realmean,
            GrimmerFailure::NoSdMatch,
            None,
        ));
    };
    let n_wide = n as i128;
    let sum = realsum as i128;
    let unit = 10i128.pow(input.decimals_sd);
    let sd_units = sd.units as i128;

    let (lo, hi) = sum_of_squares_interval(
        n_wide,
        sum,
        unit,
        (sd_units - SD_WINDOW_UNITS).max(0),
        sd_units + SD_WINDOW_UNITS,
    )
    .ok_or_else(too_large)?;
    if lo > hi {
        return Ok(ConsistencyVerdict::grimmer_failed(
            realmean,
            GrimmerFailure::SumOfSquaresRangeEmpty,
            None,
        ));
    }
    let range = (lo, hi);

    // 3) A candidate reproduces the SD when rounding half-down or half-up
    //    gives it back, i.e. its SD lies in the closed window of half a unit
    //    around the reported value. In half-units that is [2 sd - 1, 2 sd + 1].
    let (match_lo, match_hi) = sum_of_squares_interval(
        n_wide,
        sum,
        2 * unit,
        (2 * sd_units - 1).max(0),
        2 * sd_units + 1,
    )
    .ok_or_else(too_large)?;
    let first = lo.max(match_lo);
    let last = hi.min(match_hi);
    if first > last {
        return Ok(ConsistencyVerdict::grimmer_failed(
            realmean,
            GrimmerFailure::NoSdMatch,
            Some(range),
        ));
    }

    // 4) Parity. Squaring keeps parity, so the sum of squares must be odd
    //    exactly when the sum is. Consecutive candidates alternate.
    let parity = sum.rem_euclid(2);
    if (first..=last).take(2).any(|x| x.rem_euclid(2) == parity) {
        return Ok(ConsistencyVerdict::consistent(realmean, range));
    }
    Ok(ConsistencyVerdict::grimmer_failed(
        realmean,
        GrimmerFailure::ParityMismatch,
        Some(range),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applicability_boundary_is_inclusive() {
        assert!(grim_applicable(100, 2));
        assert!(!grim_applicable(101, 2));
        assert!(grim_applicable(10, 1));
        assert!(!grim_applicable(2, 0));
    }

    #[test]
    fn mean_reachable_handles_ties_both_ways() {
        // 25 / 8 = 3.125 may be reported as 3.12 or 3.13
        assert!(mean_reachable(25, 8, 3.12, 2));
        assert!(mean_reachable(25, 8, 3.13, 2));
        assert!(!mean_reachable(25, 8, 3.11, 2));
        assert!(mean_reachable(-25, 8, -3.13, 2));
    }

    #[test]
    fn off_grid_mean_is_never_reachable() {
        assert!(!mean_reachable(34, 10, 3.45, 1));
    }

    #[test]
    fn stage_two_range_brackets_the_known_sum_of_squares() {
        // n = 10, sum 32, sd 1.48 widened to [1.43, 1.53]: data with
        // sum(x^2) = 122 exists.
        assert_eq!(sum_of_squares_interval(10, 32, 100, 143, 153), Some((121, 123)));
    }

    #[test]
    fn sd_window_isolates_the_matching_sum_of_squares() {
        // 1.48 +/- 0.005 in half-units of 0.005: [295, 297] / 200
        assert_eq!(sum_of_squares_interval(10, 32, 200, 295, 297), Some((122, 122)));
    }

    #[test]
    fn zero_sd_pins_the_sum_of_squares() {
        assert_eq!(sum_of_squares_interval(5, 15, 100, 0, 5), Some((45, 45)));
    }

    #[test]
    fn negative_sums_use_the_same_bounds() {
        assert_eq!(
            sum_of_squares_interval(10, -32, 200, 295, 297),
            sum_of_squares_interval(10, 32, 200, 295, 297)
        );
    }

    #[test]
    fn bounds_that_do_not_fit_i128_are_none() {
        let w = 16_000_000_000_000_001i128;
        assert_eq!(sum_of_squares_interval(1000, 1000, 200, 0, w), None);
    }

    #[test]
    fn div_ceil_rounds_up_for_positive_denominators() {
        assert_eq!(div_ceil(7, 2), 4);
        assert_eq!(div_ceil(8, 2), 4);
        assert_eq!(div_ceil(0, 3), 0);
        assert_eq!(div_ceil(-7, 2), -3);
    }

    proptest::proptest! {
        /// The exact SD window accepts a candidate exactly when the float
        /// rounding rules reproduce the reported SD from its square root.
        #[test]
        fn sd_window_agrees_with_directional_rounding(
            n in 2i64..60,
            sum in -300i64..300,
            extra in 0i64..2_000,
            sd_units in 0i64..400,
        ) {
            let (n_w, s_w) = (n as i128, sum as i128);
            let x = div_ceil(s_w * s_w, n_w) + extra as i128;
            let (lo, hi) = sum_of_squares_interval(
                n_w,
                s_w,
                200,
                (2 * sd_units as i128 - 1).max(0),
                2 * sd_units as i128 + 1,
            )
            .unwrap();

            let var = (n_w * x - s_w * s_w) as f64 / (n_w * (n_w - 1)) as f64;
            let sd = sd_units as f64 / 100.0;
            proptest::prop_assert_eq!(
                lo <= x && x <= hi,
                crate::rounding::reproduces(var.sqrt(), sd, 2),
                "n={} sum={} x={} sd={}", n, sum, x, sd
            );
        }
    }
}
