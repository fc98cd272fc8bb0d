use serde::{Deserialize, Serialize};
use std::fmt;

/// A test statistic as printed, with its degrees of freedom.
///
/// Degrees of freedom are `f64` because Welch-corrected tests report
/// fractional values.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "test", rename_all = "snake_case")]
pub enum TestStatistic {
    /// Student's t, two-sided unless the check is one-tailed.
    T { value: f64, df: f64 },
    F { value: f64, df1: f64, df2: f64 },
    Chi2 { value: f64, df: f64 },
    /// Standard normal, two-sided unless the check is one-tailed.
    Z { value: f64 },
    /// Pearson correlation, tested as t = r sqrt(df) / sqrt(1 - r^2).
    R { value: f64, df: f64 },
    /// Cochran's Q from a meta-analysis; chi-squared on `df`.
    Q { value: f64, df: f64 },
}

impl TestStatistic {
    pub fn value(&self) -> f64 {
        match *self {
            TestStatistic::T { value, .. }
            | TestStatistic::F { value, .. }
            | TestStatistic::Chi2 { value, .. }
            | TestStatistic::Z { value }
            | TestStatistic::R { value, .. }
            | TestStatistic::Q { value, .. } => value,
        }
    }

    /// t, z and r have a two-sided p by default; halving gives one tail.
    /// F, chi2 and Q are upper-tail tests already.
    pub fn is_two_sided(&self) -> bool {
        matches!(
            self,
            TestStatistic::T { .. } | TestStatistic::Z { .. } | TestStatistic::R { .. }
        )
    }
}

/// How the p-value was printed relative to its number.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparison {
    #[default]
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">")]
    Gt,
}

impl Comparison {
    pub fn as_str(&self) -> &'static str {
        match self {
            Comparison::Eq => "=",
            Comparison::Lt => "<",
            Comparison::Gt => ">",
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A p-value as printed in a paper: comparison, value and precision.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReportedP {
    pub comparison: Comparison,
    pub value: f64,
    /// Digits printed after the decimal point.
    pub decimals: u32,
}

impl ReportedP {
    pub fn new(comparison: Comparison, value: f64, decimals: u32) -> Self {
        Self {
            comparison,
            value,
            decimals,
        }
    }

    /// `p = value`, with the precision read off the shortest decimal
    /// rendering of `value` (0.031 -> 3 decimals).
    pub fn exact(value: f64) -> Self {
        Self::new(Comparison::Eq, value, shortest_decimals(value))
    }

    /// `p < value`, precision read off as in [`ReportedP::exact`].
    pub fn less_than(value: f64) -> Self {
        Self::new(Comparison::Lt, value, shortest_decimals(value))
    }

    /// `p > value`, precision read off as in [`ReportedP::exact`].
    pub fn greater_than(value: f64) -> Self {
        Self::new(Comparison::Gt, value, shortest_decimals(value))
    }

    /// Parse printed forms such as `p = .031`, `< .05`, `p>0.10` or `0.04`.
    /// A missing comparison means `=`.
    pub fn parse(text: &str) -> Result<Self, PCheckError> {
        let unparsable = || PCheckError::UnparsableP(text.to_string());

        let mut rest = text.trim();
        if let Some(r) = rest.strip_prefix(['p', 'P']) {
            rest = r.trim_start();
        }
        let comparison = match rest.chars().next() {
            Some('=') => Comparison::Eq,
            Some('<') => Comparison::Lt,
            Some('>') => Comparison::Gt,
            _ => {
                return Self::parse_number(Comparison::Eq, rest).ok_or_else(unparsable);
            }
        };
        Self::parse_number(comparison, rest[1..].trim_start()).ok_or_else(unparsable)
    }

    fn parse_number(comparison: Comparison, text: &str) -> Option<Self> {
        let text = text.trim();
        if text.contains(['e', 'E']) {
            return None;
        }
        let value: f64 = text.parse().ok()?;
        let decimals = text.split_once('.').map_or(0, |(_, frac)| frac.len() as u32);
        Some(Self::new(comparison, value, decimals))
    }

    /// Half a unit in the last printed place.
    pub fn tolerance(&self) -> f64 {
        0.5 * 10f64.powi(-(self.decimals as i32))
    }
}

impl fmt::Display for ReportedP {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "p {} {:.*}",
            self.comparison,
            self.decimals as usize,
            self.value
        )
    }
}

fn shortest_decimals(value: f64) -> u32 {
    // f64 Display is the shortest text that reads back to the same value
    // and never uses exponent notation.
    let text = value.to_string();
    text.split_once('.').map_or(0, |(_, frac)| frac.len() as u32)
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PCheckOptions {
    /// Significance level for decision errors.
    pub alpha: f64,
    /// Halve the two-sided p of t, z and r tests.
    pub one_tailed: bool,
}

impl PCheckOptions {
    pub const DEFAULT_ALPHA: f64 = 0.05;

    pub fn one_tailed(mut self) -> Self {
        self.one_tailed = true;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }
}

impl Default for PCheckOptions {
    fn default() -> Self {
        Self {
            alpha: Self::DEFAULT_ALPHA,
            one_tailed: false,
        }
    }
}

/// Outcome of recomputing one p-value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PCheckVerdict {
    pub test: TestStatistic,
    pub one_tailed: bool,
    pub computed_p: f64,
    pub reported: Option<ReportedP>,
    /// `None` without a reported p.
    pub consistent: Option<bool>,
    /// Reported and computed p fall on different sides of alpha. `None`
    /// without a reported p, or when `p > x` with `x < alpha` leaves the
    /// reported side open.
    pub decision_error: Option<bool>,
}

impl PCheckVerdict {
    /// Inconsistent and on the wrong side of alpha.
    pub fn is_gross_error(&self) -> bool {
        self.consistent == Some(false) && self.decision_error == Some(true)
    }
}

/// Input the checker refuses to evaluate.
#[derive(Clone, Debug, PartialEq)]
pub enum PCheckError {
    NotFinite { field: &'static str },
    /// Degrees of freedom must be positive.
    DegreesOfFreedom { field: &'static str, df: f64 },
    /// F, chi2 and Q statistics cannot be negative.
    NegativeStatistic(f64),
    /// |r| above 1.
    CorrelationOutOfRange(f64),
    ReportedPOutOfRange(f64),
    AlphaOutOfRange(f64),
    UnparsableP(String),
}

impl fmt::Display for PCheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PCheckError::NotFinite { field } => {
                write!(f, "invalid test: '{field}' is NaN or infinite")
            }
            PCheckError::DegreesOfFreedom { field, df } => {
                write!(f, "invalid test: '{field}' must be > 0, got {df}")
            }
            PCheckError::NegativeStatistic(v) => {
                write!(f, "invalid test: statistic must be >= 0, got {v}")
            }
            PCheckError::CorrelationOutOfRange(r) => {
                write!(f, "invalid test: |r| must be <= 1, got {r}")
            }
            PCheckError::ReportedPOutOfRange(p) => {
                write!(f, "invalid reported p: must be in [0, 1], got {p}")
            }
            PCheckError::AlphaOutOfRange(a) => {
                write!(f, "invalid alpha: must be in (0, 1), got {a}")
            }
            PCheckError::UnparsableP(text) => {
                write!(f, "cannot read a p-value from '{text}'")
            }
        }
    }
}

impl std::error::Error for PCheckError {}
