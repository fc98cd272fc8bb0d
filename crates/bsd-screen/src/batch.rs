use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use bsd_config::ScreeningConfig;
use bsd_grimmer::{a_grimmer, ConsistencyResult, ConsistencyVerdict, ReportedStatistics};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::input::{CsvStatsRow, RowError, StatsRow, REQUIRED_COLUMNS};

/// What happened to one input row. Exactly one of `verdict` / `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowOutcome {
    /// 1-based position among the data rows.
    pub row: usize,
    pub label: Option<String>,
    /// The statistics as the engine saw them, when the row parsed.
    pub input: Option<ReportedStatistics>,
    pub verdict: Option<ConsistencyVerdict>,
    pub error: Option<String>,
}

impl RowOutcome {
    pub fn is_rejected(&self) -> bool {
        self.error.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub rows_read: u64,
    pub rows_rejected: u64,
    pub consistent: u64,
    pub grim_inconsistent: u64,
    pub grimmer_inconsistent: u64,
    pub grim_inapplicable: u64,
}

impl BatchSummary {
    fn record(&mut self, outcome: &RowOutcome) {
        self.rows_read += 1;
        match outcome.verdict.as_ref().map(|v| v.result) {
            None => self.rows_rejected += 1,
            Some(ConsistencyResult::Consistent) => self.consistent += 1,
            Some(ConsistencyResult::GrimInconsistent) => self.grim_inconsistent += 1,
            Some(ConsistencyResult::GrimmerInconsistent) => self.grimmer_inconsistent += 1,
            Some(ConsistencyResult::GrimInapplicable) => self.grim_inapplicable += 1,
        }
    }

    /// Rows flagged by either test.
    pub fn inconsistent(&self) -> u64 {
        self.grim_inconsistent + self.grimmer_inconsistent
    }

    /// Every row was evaluated and found consistent.
    pub fn is_clean(&self) -> bool {
        self.consistent == self.rows_read
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub rows: Vec<RowOutcome>,
    pub summary: BatchSummary,
}

impl BatchReport {
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("serialize batch report failed")
    }

    /// Rows the engine flagged, in input order.
    pub fn flagged(&self) -> impl Iterator<Item = &RowOutcome> {
        self.rows.iter().filter(|r| {
            matches!(
                r.verdict.as_ref().map(|v| v.result),
                Some(ConsistencyResult::GrimInconsistent | ConsistencyResult::GrimmerInconsistent)
            )
        })
    }
}

/// Accumulates outcomes in input order and applies the invalid-row policy.
struct Screener<'a> {
    cfg: &'a ScreeningConfig,
    report: BatchReport,
}

impl<'a> Screener<'a> {
    fn new(cfg: &'a ScreeningConfig) -> Self {
        Self {
            cfg,
            report: BatchReport {
                rows: Vec::new(),
                summary: BatchSummary::default(),
            },
        }
    }

    fn push(
        &mut self,
        label: Option<String>,
        parsed: Result<ReportedStatistics, RowError>,
    ) -> Result<()> {
        let row = self.report.rows.len() + 1;
        let (input, outcome) = match parsed {
            Ok(input) => (
                Some(input),
                a_grimmer(&input).map_err(|e| RowError::Rejected(e.to_string())),
            ),
            Err(e) => (None, Err(e)),
        };

        let outcome = match outcome {
            Ok(verdict) => {
                debug!(row, result = verdict.result.as_str(), "row screened");
                RowOutcome {
                    row,
                    label,
                    input,
                    verdict: Some(verdict),
                    error: None,
                }
            }
            Err(e) => {
                if self.cfg.batch.fail_on_invalid_row {
                    bail!("SCREEN_INVALID_ROW row {row}: {e}");
                }
                warn!(row, error = %e, "row rejected");
                RowOutcome {
                    row,
                    label,
                    input,
                    verdict: None,
                    error: Some(e.to_string()),
                }
            }
        };

        self.report.summary.record(&outcome);
        self.report.rows.push(outcome);
        Ok(())
    }

    fn finish(self) -> BatchReport {
        let s = &self.report.summary;
        info!(
            rows_read = s.rows_read,
            rows_rejected = s.rows_rejected,
            consistent = s.consistent,
            inconsistent = s.inconsistent(),
            inapplicable = s.grim_inapplicable,
            "batch screening complete"
        );
        self.report
    }
}

/// Screen rows built in memory. Rows without their own decimals use
/// `cfg.grimmer`.
pub fn screen_rows(rows: &[StatsRow], cfg: &ScreeningConfig) -> Result<BatchReport> {
    let mut screener = Screener::new(cfg);
    for r in rows {
        screener.push(r.label.clone(), Ok(r.to_reported(&cfg.grimmer)))?;
    }
    Ok(screener.finish())
}

/// Screen CSV from any reader. Header problems are errors; bad data rows
/// follow `cfg.batch.fail_on_invalid_row`.
pub fn screen_csv_reader<R: Read>(reader: R, cfg: &ScreeningConfig) -> Result<BatchReport> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers().context("read csv header failed")?.clone();
    for col in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == col) {
            bail!("SCREEN_MISSING_COLUMN: csv header lacks required column '{col}'");
        }
    }

    let mut screener = Screener::new(cfg);
    for rec in rdr.deserialize::<CsvStatsRow>() {
        match rec {
            Ok(raw) => screener.push(raw.label(), raw.to_reported())?,
            Err(e) => screener.push(None, Err(RowError::Decode(e.to_string())))?,
        }
    }
    Ok(screener.finish())
}

pub fn screen_csv_str(src: &str, cfg: &ScreeningConfig) -> Result<BatchReport> {
    screen_csv_reader(src.as_bytes(), cfg)
}

pub fn screen_csv_file(path: &Path, cfg: &ScreeningConfig) -> Result<BatchReport> {
    let file = File::open(path)
        .with_context(|| format!("open csv path failed: {}", path.display()))?;
    screen_csv_reader(file, cfg)
}
