//! NaN-aware reductions over the time axis of a single grid cell.
//!
//! Both reductions skip NaN samples and return NaN when nothing is left, so
//! an empty bucket shows up as a missing value instead of an error.
//!
//! Percentiles use linear interpolation between the closest ranks: for `n`
//! sorted samples the rank of percentile `p` is `p / 100 * (n - 1)`, and a
//! fractional rank interpolates between its two neighbours. A single sample
//! is every percentile of itself.

use wind_common::Statistic;

/// Mean of the non-NaN values, or NaN if there are none.
pub fn nan_mean(values: &[f64]) -> f64 {
    let mut sum = 0.0f64;
    let mut count = 0usize;

    for &v in values {
        if !v.is_nan() {
            sum += v;
            count += 1;
        }
    }

    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

/// Percentile `p` (0-100) of the non-NaN values, or NaN if there are none.
///
/// `p` is assumed valid; callers check it through [`Statistic::validate`].
pub fn nan_percentile(values: &[f64], p: f64) -> f64 {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    sorted.sort_unstable_by(|a, b| a.total_cmp(b));
    percentile_of_sorted(&sorted, p)
}

/// Percentile of samples that are already sorted and NaN-free.
pub fn percentile_of_sorted(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return f64::NAN;
    }

    let rank = (p / 100.0) * (n - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = (rank.ceil() as usize).min(n - 1);
    let below = sorted[lo];
    let above = sorted[hi];

    if lo == hi || below == above {
        return below;
    }

    // Interpolate from whichever neighbour is closer
    let frac = rank - lo as f64;
    let diff = above - below;
    if frac >= 0.5 {
        above - diff * (1.0 - frac)
    } else {
        below + diff * frac
    }
}

/// Reduce a bucket of samples with the requested statistic.
#[inline]
pub fn reduce(statistic: Statistic, values: &[f64]) -> f64 {
    match statistic {
        Statistic::Mean => nan_mean(values),
        Statistic::Percentile(p) => nan_percentile(values, p),
    }
}
