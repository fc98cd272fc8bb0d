//! bsd-repro
//!
//! Quantitative checks for qualitative claims, given the underlying data
//! (or values digitized from a figure):
//! - `error_flag`: point-by-point comparison of a predicted curve against
//!   the observed one, by absolute error and by direction of change
//! - `bootstrap_proportion`: share of observations meeting a condition,
//!   with a percentile bootstrap interval
//!
//! Pure computation. The only state is the resampling RNG, seeded per call.

mod bootstrap;
mod error_flag;
mod types;

pub use bootstrap::{bootstrap_proportion, percentile_linear};
pub use error_flag::error_flag;
pub use types::*;
