//! bsd-pcheck
//!
//! Recompute a p-value from a printed test statistic and its degrees of
//! freedom, then compare it with the p the paper printed.
//!
//! - t, F, chi2, z, r (via t) and Cochran's Q
//! - `p = x` agrees within half a unit of the last printed place of x;
//!   `p < x` and `p > x` are taken literally
//! - a decision error is a reported p and a recomputed p on opposite
//!   sides of alpha
//!
//! Pure computation on top of statrs survival functions.

mod engine;
mod types;

pub use engine::{check_p_value, computed_p};
pub use types::*;
