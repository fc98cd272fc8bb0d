//! bsd-grimmer
//!
//! Analytic GRIMMER (A-GRIMMER) consistency test for reported
//! (n, mean, SD) triples from integer-scale data.
//!
//! Gates, in order, each able to short-circuit:
//! - applicability (n must not exceed 10^decimals_mean)
//! - GRIM: n x mean must come from an integer sum
//! - sum-of-squares bounds from the SD rounding window
//! - SD reconstruction for each candidate sum of squares
//! - parity between the sum and the sum of squares
//!
//! Deterministic, pure arithmetic. No IO, no shared state.

mod engine;
pub mod fixed;
pub mod rounding;
mod types;

pub use engine::a_grimmer;
pub use rounding::{
    is_halfway, reproduces, round_conventional, round_half_down, round_half_up, MAX_DECIMALS,
    TOLERANCE,
};
pub use types::*;
