use serde::{Deserialize, Serialize};
use std::fmt;

use crate::rounding::MAX_DECIMALS;

fn default_decimals() -> u32 {
    ReportedStatistics::DEFAULT_DECIMALS
}

/// Summary statistics as printed in a paper.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReportedStatistics {
    /// Sample size.
    pub n: i64,
    /// Reported arithmetic mean.
    pub mean: f64,
    /// Reported sample standard deviation (n - 1 divisor).
    pub sd: f64,
    /// Decimal places the mean was reported to.
    #[serde(default = "default_decimals")]
    pub decimals_mean: u32,
    /// Decimal places the SD was reported to.
    #[serde(default = "default_decimals")]
    pub decimals_sd: u32,
}

impl ReportedStatistics {
    pub const DEFAULT_DECIMALS: u32 = 2;

    /// Statistics reported to the conventional two decimals.
    pub fn new(n: i64, mean: f64, sd: f64) -> Self {
        Self {
            n,
            mean,
            sd,
            decimals_mean: Self::DEFAULT_DECIMALS,
            decimals_sd: Self::DEFAULT_DECIMALS,
        }
    }

    pub fn with_decimals(mut self, decimals_mean: u32, decimals_sd: u32) -> Self {
        self.decimals_mean = decimals_mean;
        self.decimals_sd = decimals_sd;
        self
    }

    /// Reject inputs the arithmetic cannot give a meaningful answer for.
    pub fn validate(&self) -> Result<(), InvalidInput> {
        if self.n < 2 {
            return Err(InvalidInput::SampleSizeTooSmall(self.n));
        }
        if !self.mean.is_finite() {
            return Err(InvalidInput::NotFinite { field: "mean" });
        }
        if !self.sd.is_finite() {
            return Err(InvalidInput::NotFinite { field: "sd" });
        }
        if self.sd < 0.0 {
            return Err(InvalidInput::NegativeSd(self.sd));
        }
        if self.decimals_mean > MAX_DECIMALS {
            return Err(InvalidInput::DecimalsTooLarge {
                field: "decimals_mean",
                decimals: self.decimals_mean,
            });
        }
        if self.decimals_sd > MAX_DECIMALS {
            return Err(InvalidInput::DecimalsTooLarge {
                field: "decimals_sd",
                decimals: self.decimals_sd,
            });
        }
        Ok(())
    }

    /// Run the A-GRIMMER test on these statistics.
    pub fn check(&self) -> Result<ConsistencyVerdict, InvalidInput> {
        crate::a_grimmer(self)
    }
}

/// The four mutually exclusive outcomes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConsistencyResult {
    #[serde(rename = "consistent")]
    Consistent,
    #[serde(rename = "GRIM inconsistent")]
    GrimInconsistent,
    #[serde(rename = "GRIMMER inconsistent")]
    GrimmerInconsistent,
    #[serde(rename = "GRIM inapplicable")]
    GrimInapplicable,
}

impl ConsistencyResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsistencyResult::Consistent => "consistent",
            ConsistencyResult::GrimInconsistent => "GRIM inconsistent",
            ConsistencyResult::GrimmerInconsistent => "GRIMMER inconsistent",
            ConsistencyResult::GrimInapplicable => "GRIM inapplicable",
        }
    }
}

impl fmt::Display for ConsistencyResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which gate rejected the statistics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrimmerFailure {
    /// No integer sum over n rounds back to the reported mean.
    MeanNotReachable,
    /// No integer lies between the sum-of-squares bounds.
    SumOfSquaresRangeEmpty,
    /// No candidate sum of squares rounds back to the reported SD.
    NoSdMatch,
    /// SD-matching candidates exist, but none has the parity of the sum.
    ParityMismatch,
}

/// Outcome of one A-GRIMMER evaluation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyVerdict {
    pub result: ConsistencyResult,
    /// `None` when GRIM is inapplicable.
    pub grim_passed: Option<bool>,
    /// `None` unless GRIM passed.
    pub grimmer_passed: Option<bool>,
    /// `realsum / n`, or the reported mean when GRIM is inapplicable.
    pub reconstructed_mean: f64,
    pub failure: Option<GrimmerFailure>,
    /// Inclusive candidate range for the sum of squares, when one was built.
    pub sum_of_squares_range: Option<(i128, i128)>,
}

impl ConsistencyVerdict {
    pub(crate) fn inapplicable(mean: f64) -> Self {
        Self {
            result: ConsistencyResult::GrimInapplicable,
            grim_passed: None,
            grimmer_passed: None,
            reconstructed_mean: mean,
            failure: None,
            sum_of_squares_range: None,
        }
    }

    pub(crate) fn grim_failed(realmean: f64) -> Self {
        Self {
            result: ConsistencyResult::GrimInconsistent,
            grim_passed: Some(false),
            grimmer_passed: None,
            reconstructed_mean: realmean,
            failure: Some(GrimmerFailure::MeanNotReachable),
            sum_of_squares_range: None,
        }
    }

    pub(crate) fn grimmer_failed(
        realmean: f64,
        failure: GrimmerFailure,
        sum_of_squares_range: Option<(i128, i128)>,
    ) -> Self {
        Self {
            result: ConsistencyResult::GrimmerInconsistent,
            grim_passed: Some(true),
            grimmer_passed: Some(false),
            reconstructed_mean: realmean,
            failure: Some(failure),
            sum_of_squares_range,
        }
    }

    pub(crate) fn consistent(realmean: f64, sum_of_squares_range: (i128, i128)) -> Self {
        Self {
            result: ConsistencyResult::Consistent,
            grim_passed: Some(true),
            grimmer_passed: Some(true),
            reconstructed_mean: realmean,
            failure: None,
            sum_of_squares_range: Some(sum_of_squares_range),
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.result == ConsistencyResult::Consistent
    }
}

/// Input the engine refuses to evaluate.
#[derive(Clone, Debug, PartialEq)]
pub enum InvalidInput {
    /// n below 2 (the SD uses an n - 1 divisor).
    SampleSizeTooSmall(i64),
    /// A reported value is NaN or infinite.
    NotFinite { field: &'static str },
    /// SD below zero.
    NegativeSd(f64),
    /// Decimal precision above [`MAX_DECIMALS`].
    DecimalsTooLarge { field: &'static str, decimals: u32 },
    /// A quantity derived from `field` is too large to evaluate exactly.
    OutOfRange { field: &'static str },
}

impl fmt::Display for InvalidInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidInput::SampleSizeTooSmall(n) => {
                write!(f, "invalid input: n must be >= 2, got {n}")
            }
            InvalidInput::NotFinite { field } => {
                write!(f, "invalid input: '{field}' is NaN or infinite")
            }
            InvalidInput::NegativeSd(sd) => {
                write!(f, "invalid input: sd must be >= 0, got {sd}")
            }
            InvalidInput::DecimalsTooLarge { field, decimals } => {
                write!(
                    f,
                    "invalid input: '{field}' = {decimals} exceeds the maximum of {MAX_DECIMALS}"
                )
            }
            InvalidInput::OutOfRange { field } => {
                write!(f, "invalid input: '{field}' is too large to evaluate exactly")
            }
        }
    }
}

impl std::error::Error for InvalidInput {}
