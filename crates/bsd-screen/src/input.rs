//! Row shapes accepted by the batch screener.
//!
//! ## CSV column contract (order-independent, matched by name)
//!
//! | Column          | Example | Notes                                          |
//! |-----------------|---------|------------------------------------------------|
//! | `n`             | `18`    | required, integer                              |
//! | `mean`          | `3.44`  | required, plain decimal text                   |
//! | `sd`            | `2.47`  | required, plain decimal text                   |
//! | `label`         | `T2 c3` | optional free text                             |
//! | `decimals_mean` | `2`     | optional; inferred from `mean` text when blank |
//! | `decimals_sd`   | `2`     | optional; inferred from `sd` text when blank   |

use std::fmt;

use bsd_config::GrimmerDefaults;
use bsd_grimmer::ReportedStatistics;
use serde::{Deserialize, Serialize};

pub(crate) const REQUIRED_COLUMNS: [&str; 3] = ["n", "mean", "sd"];

/// One set of statistics built in memory. Unset decimals fall back to the
/// configured defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsRow {
    #[serde(default)]
    pub label: Option<String>,
    pub n: i64,
    pub mean: f64,
    pub sd: f64,
    #[serde(default)]
    pub decimals_mean: Option<u32>,
    #[serde(default)]
    pub decimals_sd: Option<u32>,
}

impl StatsRow {
    pub fn new(n: i64, mean: f64, sd: f64) -> Self {
        Self {
            label: None,
            n,
            mean,
            sd,
            decimals_mean: None,
            decimals_sd: None,
        }
    }

    pub fn labelled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_decimals(mut self, decimals_mean: u32, decimals_sd: u32) -> Self {
        self.decimals_mean = Some(decimals_mean);
        self.decimals_sd = Some(decimals_sd);
        self
    }

    pub fn to_reported(&self, defaults: &GrimmerDefaults) -> ReportedStatistics {
        ReportedStatistics::new(self.n, self.mean, self.sd).with_decimals(
            self.decimals_mean.unwrap_or(defaults.decimals_mean),
            self.decimals_sd.unwrap_or(defaults.decimals_sd),
        )
    }
}

/// A CSV record before any parsing. Numbers stay text so the printed
/// precision survives.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CsvStatsRow {
    pub n: String,
    pub mean: String,
    pub sd: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub decimals_mean: Option<String>,
    #[serde(default)]
    pub decimals_sd: Option<String>,
}

impl CsvStatsRow {
    pub fn label(&self) -> Option<String> {
        self.label
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    pub fn to_reported(&self) -> Result<ReportedStatistics, RowError> {
        let n_raw = self.n.trim();
        let n: i64 = n_raw.parse().map_err(|_| RowError::ParseField {
            field: "n",
            raw: n_raw.to_string(),
        })?;
        let (mean, dm) = parse_reported("mean", &self.mean, self.decimals_mean.as_deref())?;
        let (sd, ds) = parse_reported("sd", &self.sd, self.decimals_sd.as_deref())?;
        Ok(ReportedStatistics::new(n, mean, sd).with_decimals(dm, ds))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    ParseField { field: &'static str, raw: String },
    /// Exponent notation does not say how many decimals were printed.
    UnknownPrecision { field: &'static str, raw: String },
    Decode(String),
    Rejected(String),
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowError::ParseField { field, raw } => {
                write!(f, "cannot parse field '{field}' from value '{raw}'")
            }
            RowError::UnknownPrecision { field, raw } => write!(
                f,
                "cannot infer decimals for '{field}' from '{raw}'; add a decimals_{field} column"
            ),
            RowError::Decode(msg) => write!(f, "csv decode error: {msg}"),
            RowError::Rejected(msg) => write!(f, "rejected by engine: {msg}"),
        }
    }
}

impl std::error::Error for RowError {}

/// Digits after the decimal point as printed: "3.40" -> 2, "3" -> 0.
pub fn fractional_digits(text: &str) -> Option<u32> {
    let t = text.trim();
    if t.contains(['e', 'E']) {
        return None;
    }
    match t.split_once('.') {
        Some((_, frac)) => Some(frac.len() as u32),
        None => Some(0),
    }
}

fn parse_reported(
    field: &'static str,
    raw: &str,
    explicit_decimals: Option<&str>,
) -> Result<(f64, u32), RowError> {
    let text = raw.trim();
    let value: f64 = text.parse().map_err(|_| RowError::ParseField {
        field,
        raw: text.to_string(),
    })?;

    let decimals = match explicit_decimals.map(str::trim).filter(|s| !s.is_empty()) {
        Some(d) => d.parse().map_err(|_| RowError::ParseField {
            field: if field == "mean" { "decimals_mean" } else { "decimals_sd" },
            raw: d.to_string(),
        })?,
        None => fractional_digits(text).ok_or_else(|| RowError::UnknownPrecision {
            field,
            raw: text.to_string(),
        })?,
    };
    Ok((value, decimals))
}
