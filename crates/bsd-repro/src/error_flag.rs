use crate::types::{ErrorFlagReport, ReproError};

fn check_finite(field: &'static str, values: &[f64]) -> Result<(), ReproError> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(ReproError::NotFinite { field, index }),
        None => Ok(()),
    }
}

/// Compare `predicted` against `actual` point by point.
///
/// A point is flagged when its absolute error is strictly greater than
/// `threshold`, so a threshold of 0 flags any deviation. A step where either
/// curve stays flat is never a slope mismatch.
pub fn error_flag(
    predicted: &[f64],
    actual: &[f64],
    threshold: f64,
) -> Result<ErrorFlagReport, ReproError> {
    if predicted.len() != actual.len() {
        return Err(ReproError::LengthMismatch {
            predicted: predicted.len(),
            actual: actual.len(),
        });
    }
    let n = predicted.len();
    if n < 2 {
        return Err(ReproError::TooFewPoints(n));
    }
    check_finite("predicted", predicted)?;
    check_finite("actual", actual)?;
    if !threshold.is_finite() {
        return Err(ReproError::NotFinite {
            field: "threshold",
            index: 0,
        });
    }

    let abs_errors: Vec<f64> = predicted
        .iter()
        .zip(actual)
        .map(|(p, a)| (p - a).abs())
        .collect();

    let flagged_points: Vec<usize> = abs_errors
        .iter()
        .enumerate()
        .filter(|(_, e)| **e > threshold)
        .map(|(i, _)| i)
        .collect();

    let slope_sign_mismatches: Vec<usize> = (0..n - 1)
        .filter(|&i| {
            let dp = direction(predicted[i + 1] - predicted[i]);
            let da = direction(actual[i + 1] - actual[i]);
            dp != 0 && da != 0 && dp != da
        })
        .map(|i| i + 1)
        .collect();

    let n_flagged = flagged_points.len();
    Ok(ErrorFlagReport {
        abs_errors,
        flagged_points,
        slope_sign_mismatches,
        n_flagged,
        fraction_flagged: n_flagged as f64 / n as f64,
    })
}

fn direction(delta: f64) -> i8 {
    if delta > 0.0 {
        1
    } else if delta < 0.0 {
        -1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_treats_zero_as_flat() {
        assert_eq!(direction(0.0), 0);
        assert_eq!(direction(-0.0), 0);
        assert_eq!(direction(1e-12), 1);
        assert_eq!(direction(-3.0), -1);
    }

    #[test]
    fn first_non_finite_index_is_reported() {
        let e = error_flag(&[1.0, 2.0, 3.0], &[1.0, f64::NAN, f64::INFINITY], 0.0).unwrap_err();
        assert_eq!(e, ReproError::NotFinite { field: "actual", index: 1 });
    }

    #[test]
    fn flat_step_is_not_a_mismatch() {
        let r = error_flag(&[1.0, 1.0, 2.0], &[1.0, 0.0, 3.0], 0.0).unwrap();
        assert!(r.slope_sign_mismatches.is_empty());
    }
}
