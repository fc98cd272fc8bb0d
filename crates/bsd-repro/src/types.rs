use bsd_config::ReproducibilityDefaults;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-point comparison of a predicted curve with the observed one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ErrorFlagReport {
    /// `|predicted[i] - actual[i]|` for every point.
    pub abs_errors: Vec<f64>,
    /// Indices whose absolute error exceeds the threshold.
    pub flagged_points: Vec<usize>,
    /// Index `i + 1` for every step `i -> i + 1` where both curves move and
    /// move in opposite directions.
    pub slope_sign_mismatches: Vec<usize>,
    pub n_flagged: usize,
    pub fraction_flagged: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BootstrapOptions {
    pub n_boot: usize,
    /// Confidence level in (0, 1).
    pub ci: f64,
    /// `None` draws a fresh seed; the seed used is reported either way.
    pub seed: Option<u64>,
}

impl Default for BootstrapOptions {
    fn default() -> Self {
        Self::from(&ReproducibilityDefaults::default())
    }
}

impl From<&ReproducibilityDefaults> for BootstrapOptions {
    fn from(d: &ReproducibilityDefaults) -> Self {
        Self {
            n_boot: d.n_boot,
            ci: d.ci,
            seed: d.seed,
        }
    }
}

impl BootstrapOptions {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BootstrapEstimate {
    /// Observed share of items meeting the condition.
    pub proportion: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    pub n_boot: usize,
    pub seed: u64,
    /// One proportion per resample, in draw order.
    pub bootstrap_proportions: Vec<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ReproError {
    LengthMismatch { predicted: usize, actual: usize },
    TooFewPoints(usize),
    NotFinite { field: &'static str, index: usize },
    EmptyData,
    ZeroResamples,
    ConfidenceOutOfRange(f64),
}

impl fmt::Display for ReproError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReproError::LengthMismatch { predicted, actual } => write!(
                f,
                "predicted and actual must have the same length, got {predicted} and {actual}"
            ),
            ReproError::TooFewPoints(n) => write!(f, "need at least 2 points, got {n}"),
            ReproError::NotFinite { field, index } => {
                write!(f, "'{field}' at index {index} is NaN or infinite")
            }
            ReproError::EmptyData => f.write_str("data must not be empty"),
            ReproError::ZeroResamples => f.write_str("n_boot must be > 0"),
            ReproError::ConfidenceOutOfRange(ci) => write!(f, "ci must be in (0, 1), got {ci}"),
        }
    }
}

impl std::error::Error for ReproError {}
