use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::{BootstrapEstimate, BootstrapOptions, ReproError};

/// Share of `data` meeting `condition`, with a percentile bootstrap interval.
///
/// Each of `n_boot` resamples draws `data.len()` items with replacement. The
/// interval bounds are the `100 * alpha / 2` and `100 * (1 - alpha / 2)`
/// percentiles of the resampled proportions, `alpha = 1 - ci`.
pub fn bootstrap_proportion<T, F>(
    data: &[T],
    condition: F,
    options: &BootstrapOptions,
) -> Result<BootstrapEstimate, ReproError>
where
    F: Fn(&T) -> bool,
{
    if data.is_empty() {
        return Err(ReproError::EmptyData);
    }
    if options.n_boot == 0 {
        return Err(ReproError::ZeroResamples);
    }
    if !(options.ci > 0.0 && options.ci < 1.0) {
        return Err(ReproError::ConfidenceOutOfRange(options.ci));
    }

    let flags: Vec<bool> = data.iter().map(condition).collect();
    let n = flags.len();
    let proportion = count_true(&flags) as f64 / n as f64;

    let seed = options.seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);

    let bootstrap_proportions: Vec<f64> = (0..options.n_boot)
        .map(|_| {
            let hits = (0..n).filter(|_| flags[rng.gen_range(0..n)]).count();
            hits as f64 / n as f64
        })
        .collect();

    let mut sorted = bootstrap_proportions.clone();
    sorted.sort_by(f64::total_cmp);

    let alpha = 1.0 - options.ci;
    let ci_lower = percentile_linear(&sorted, 100.0 * alpha / 2.0);
    let ci_upper = percentile_linear(&sorted, 100.0 * (1.0 - alpha / 2.0));

    Ok(BootstrapEstimate {
        proportion,
        ci_lower,
        ci_upper,
        n_boot: options.n_boot,
        seed,
        bootstrap_proportions,
    })
}

fn count_true(flags: &[bool]) -> usize {
    flags.iter().filter(|f| **f).count()
}

/// Percentile `q` (0..=100) of ascending `sorted`, interpolating linearly
/// between the two nearest ranks. Empty input gives NaN.
pub fn percentile_linear(sorted: &[f64], q: f64) -> f64 {
    match sorted {
        [] => f64::NAN,
        [only] => *only,
        _ => {
            let rank = (q / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
            let lo = rank.floor() as usize;
            let hi = rank.ceil() as usize;
            let frac = rank - lo as f64;
            sorted[lo] + (sorted[hi] - sorted[lo]) * frac
        }
    }
}
