use statrs::distribution::{ChiSquared, ContinuousCDF, FisherSnedecor, Normal, StudentsT};

use crate::{Comparison, PCheckError, PCheckOptions, PCheckVerdict, ReportedP, TestStatistic};

fn finite(field: &'static str, v: f64) -> Result<f64, PCheckError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(PCheckError::NotFinite { field })
    }
}

fn positive_df(field: &'static str, df: f64) -> Result<f64, PCheckError> {
    finite(field, df)?;
    if df > 0.0 {
        Ok(df)
    } else {
        Err(PCheckError::DegreesOfFreedom { field, df })
    }
}

fn non_negative(value: f64) -> Result<f64, PCheckError> {
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(PCheckError::NegativeStatistic(value))
    }
}

fn t_two_sided(t: f64, df: f64) -> Result<f64, PCheckError> {
    let dist =
        StudentsT::new(0.0, 1.0, df).map_err(|_| PCheckError::DegreesOfFreedom { field: "df", df })?;
    Ok(2.0 * dist.sf(t.abs()))
}

fn chi2_upper(x: f64, df: f64) -> Result<f64, PCheckError> {
    let dist = ChiSquared::new(df).map_err(|_| PCheckError::DegreesOfFreedom { field: "df", df })?;
    Ok(dist.sf(x))
}

/// Upper-tail (F, chi2, Q) or two-sided (t, z, r) p for `test`.
fn upper_or_two_sided(test: &TestStatistic) -> Result<f64, PCheckError> {
    let value = finite("statistic", test.value())?;
    match *test {
        TestStatistic::T { df, .. } => t_two_sided(value, positive_df("df", df)?),
        TestStatistic::F { df1, df2, .. } => {
            let df1 = positive_df("df1", df1)?;
            let df2 = positive_df("df2", df2)?;
            let dist = FisherSnedecor::new(df1, df2)
                .map_err(|_| PCheckError::DegreesOfFreedom { field: "df1", df: df1 })?;
            Ok(dist.sf(non_negative(value)?))
        }
        TestStatistic::Chi2 { df, .. } | TestStatistic::Q { df, .. } => {
            chi2_upper(non_negative(value)?, positive_df("df", df)?)
        }
        TestStatistic::Z { .. } => {
            let dist = Normal::new(0.0, 1.0)
                .map_err(|_| PCheckError::NotFinite { field: "statistic" })?;
            Ok(2.0 * dist.sf(value.abs()))
        }
        TestStatistic::R { df, .. } => {
            let df = positive_df("df", df)?;
            let r = value.abs();
            if r > 1.0 {
                return Err(PCheckError::CorrelationOutOfRange(value));
            }
            if r == 1.0 {
                return Ok(0.0);
            }
            t_two_sided(r * df.sqrt() / (1.0 - r * r).sqrt(), df)
        }
    }
}

/// Recompute the p-value of `test`. `one_tailed` halves the two-sided p of
/// t, z and r; F, chi2 and Q are unaffected.
pub fn computed_p(test: &TestStatistic, one_tailed: bool) -> Result<f64, PCheckError> {
    let p = upper_or_two_sided(test)?;
    if one_tailed && test.is_two_sided() {
        Ok(p / 2.0)
    } else {
        Ok(p)
    }
}

/// Does `computed` agree with the printed p?
///
/// `=` accepts anything within half a unit of the last printed place;
/// `<` and `>` are strict.
fn agrees(computed: f64, reported: &ReportedP) -> bool {
    match reported.comparison {
        Comparison::Eq => (computed - reported.value).abs() <= reported.tolerance() + f64::EPSILON,
        Comparison::Lt => computed < reported.value,
        Comparison::Gt => computed > reported.value,
    }
}

/// Which side of alpha the paper put the result on, when the printed form
/// says so. `p < .05` at alpha .05 claims significance.
fn reported_significant(reported: &ReportedP, alpha: f64) -> Option<bool> {
    match reported.comparison {
        Comparison::Eq => Some(reported.value < alpha),
        Comparison::Lt => Some(reported.value <= alpha),
        Comparison::Gt => (reported.value >= alpha).then_some(false),
    }
}

/// Recompute the p-value of `test` and compare it with what was printed.
///
/// Without a reported p only `computed_p` is filled in.
pub fn check_p_value(
    test: &TestStatistic,
    reported: Option<&ReportedP>,
    options: &PCheckOptions,
) -> Result<PCheckVerdict, PCheckError> {
    if !(options.alpha > 0.0 && options.alpha < 1.0) {
        return Err(PCheckError::AlphaOutOfRange(options.alpha));
    }
    if let Some(r) = reported {
        if !(0.0..=1.0).contains(&r.value) {
            return Err(PCheckError::ReportedPOutOfRange(r.value));
        }
    }

    let computed = computed_p(test, options.one_tailed)?;
    let consistent = reported.map(|r| agrees(computed, r));
    let decision_error = reported
        .and_then(|r| reported_significant(r, options.alpha))
        .map(|claimed| claimed != (computed < options.alpha));

    Ok(PCheckVerdict {
        test: *test,
        one_tailed: options.one_tailed,
        computed_p: computed,
        reported: reported.copied(),
        consistent,
        decision_error,
    })
}
