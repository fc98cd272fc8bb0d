//! bsd-screen
//!
//! Batch A-GRIMMER screening of reported statistics.
//!
//! Rows come from CSV (numbers kept as text so the printed precision can be
//! read off) or from memory. Each row is screened on its own; one bad row
//! never hides the verdicts of the others unless the config says to stop.

mod batch;
mod input;

pub use batch::{
    screen_csv_file, screen_csv_reader, screen_csv_str, screen_rows, BatchReport, BatchSummary,
    RowOutcome,
};
pub use input::{fractional_digits, RowError, StatsRow};
