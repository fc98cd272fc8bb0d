//! Directional rounding at a fixed decimal precision.
//!
//! A reported statistic may have been rounded up or down from the value the
//! authors computed, so reconstructability is tested under both tie-breaking
//! rules. Off a tie, both rules agree with conventional rounding.

/// Absolute tolerance for halfway detection and for every
/// reconstructed-vs-reported equality test.
pub const TOLERANCE: f64 = 1e-9;

/// Largest decimal precision accepted for a reported value.
///
/// 10^15 is the last power of ten below 2^53, so scaled values stay in the
/// range where f64 represents every integer.
pub const MAX_DECIMALS: u32 = 15;

/// `10^decimals` as f64.
pub fn scale(decimals: u32) -> f64 {
    10f64.powi(decimals as i32)
}

/// True when `value` sits on a rounding tie at `decimals` places: the digit
/// right after the target precision is exactly 5 with nothing following it.
///
/// The comparison against 5 uses [`TOLERANCE`] so binary representation
/// error (3.445 is stored as 3.44499999...) does not hide the tie.
pub fn is_halfway(value: f64, decimals: u32) -> bool {
    let scaled = value * scale(decimals);
    let next_digit = scaled * 10.0 - scaled.floor() * 10.0;
    (next_digit - 5.0).abs() < TOLERANCE
}

/// Round to `decimals` places, ties away from zero.
pub fn round_conventional(value: f64, decimals: u32) -> f64 {
    let factor = scale(decimals);
    (value * factor).round() / factor
}

/// Round to `decimals` places; a tie goes toward negative infinity.
pub fn round_half_down(value: f64, decimals: u32) -> f64 {
    if is_halfway(value, decimals) {
        let factor = scale(decimals);
        return (value * factor).floor() / factor;
    }
    round_conventional(value, decimals)
}

/// Round to `decimals` places; a tie goes toward positive infinity.
pub fn round_half_up(value: f64, decimals: u32) -> f64 {
    if is_halfway(value, decimals) {
        let factor = scale(decimals);
        return (value * factor).ceil() / factor;
    }
    round_conventional(value, decimals)
}

/// `|a - b| < TOLERANCE`.
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < TOLERANCE
}

/// True when rounding `candidate` to `decimals` places under either tie rule
/// gives back `reported`.
pub fn reproduces(candidate: f64, reported: f64, decimals: u32) -> bool {
    approx_eq(round_half_down(candidate, decimals), reported)
        || approx_eq(round_half_up(candidate, decimals), reported)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn halfway_survives_binary_representation_error() {
        // 3.445 is stored slightly below the tie.
        assert!(is_halfway(3.445, 2));
        assert!(is_halfway(2.5, 0));
        assert!(is_halfway(-3.445, 2));
        assert!(!is_halfway(3.4451, 2));
        assert!(!is_halfway(3.44, 2));
    }

    #[test]
    fn tie_rules_split_only_at_the_tie() {
        assert!(approx_eq(round_half_down(3.445, 2), 3.44));
        assert!(approx_eq(round_half_up(3.445, 2), 3.45));
        assert!(approx_eq(round_half_down(2.5, 0), 2.0));
        assert!(approx_eq(round_half_up(2.5, 0), 3.0));
    }

    #[test]
    fn negative_ties_follow_the_number_line() {
        // toward -inf / +inf, not toward / away from zero
        assert!(approx_eq(round_half_down(-3.445, 2), -3.45));
        assert!(approx_eq(round_half_up(-3.445, 2), -3.44));
    }

    #[test]
    fn non_ties_use_conventional_rounding() {
        for v in [3.4449, 3.4451, 1.476, 0.004, 12.0] {
            assert_eq!(round_half_down(v, 2), round_conventional(v, 2));
            assert_eq!(round_half_up(v, 2), round_conventional(v, 2));
        }
        assert!(approx_eq(round_half_down(1.476, 2), 1.48));
    }

    #[test]
    fn reproduces_accepts_either_direction() {
        assert!(reproduces(3.125, 3.12, 2));
        assert!(reproduces(3.125, 3.13, 2));
        assert!(!reproduces(3.125, 3.11, 2));
        assert!(reproduces(1.4757, 1.48, 2));
    }
}
