use anyhow::{bail, Result};
use bsd_grimmer::{ReportedStatistics, MAX_DECIMALS};
use serde::{Deserialize, Serialize};

/// Typed view of the merged screening config. Every key is optional; a
/// missing key takes its default.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreeningConfig {
    pub grimmer: GrimmerDefaults,
    pub batch: BatchDefaults,
    pub reproducibility: ReproducibilityDefaults,
}

/// Precision assumed for reported values that do not state their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrimmerDefaults {
    pub decimals_mean: u32,
    pub decimals_sd: u32,
}

impl Default for GrimmerDefaults {
    fn default() -> Self {
        Self {
            decimals_mean: ReportedStatistics::DEFAULT_DECIMALS,
            decimals_sd: ReportedStatistics::DEFAULT_DECIMALS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchDefaults {
    /// Abort the batch on the first row that cannot be evaluated instead of
    /// recording it as rejected.
    pub fail_on_invalid_row: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReproducibilityDefaults {
    pub n_boot: usize,
    /// Confidence level in (0, 1).
    pub ci: f64,
    /// Fixed seed for resampling; `None` draws a fresh one.
    pub seed: Option<u64>,
    /// Absolute error above which a point is flagged.
    pub error_threshold: f64,
}

impl Default for ReproducibilityDefaults {
    fn default() -> Self {
        Self {
            n_boot: 10_000,
            ci: 0.95,
            seed: None,
            error_threshold: 0.0,
        }
    }
}

impl ScreeningConfig {
    pub fn validate(&self) -> Result<()> {
        for (key, decimals) in [
            ("grimmer.decimals_mean", self.grimmer.decimals_mean),
            ("grimmer.decimals_sd", self.grimmer.decimals_sd),
        ] {
            if decimals > MAX_DECIMALS {
                bail!("CONFIG_INVALID {key}={decimals}: maximum is {MAX_DECIMALS}");
            }
        }

        let r = &self.reproducibility;
        if r.n_boot == 0 {
            bail!("CONFIG_INVALID reproducibility.n_boot must be > 0");
        }
        if !(r.ci > 0.0 && r.ci < 1.0) {
            bail!("CONFIG_INVALID reproducibility.ci={} must be in (0, 1)", r.ci);
        }
        if !r.error_threshold.is_finite() || r.error_threshold < 0.0 {
            bail!(
                "CONFIG_INVALID reproducibility.error_threshold={} must be finite and >= 0",
                r.error_threshold
            );
        }
        Ok(())
    }
}
