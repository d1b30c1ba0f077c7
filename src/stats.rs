//! Small descriptive-statistics helpers shared by the metric engines.

pub(crate) fn mean(data: &[f64]) -> f64 {
    data.iter().sum::<f64>() / data.len() as f64
}

/// Sample standard deviation (Bessel-corrected, denominator n-1).
/// Callers guarantee at least two samples.
pub(crate) fn sample_std(data: &[f64]) -> f64 {
    let m = mean(data);
    (data.iter().map(|&x| (x - m) * (x - m)).sum::<f64>() / (data.len() - 1) as f64).sqrt()
}

/// Population standard deviation (denominator n).
pub(crate) fn population_std(data: &[f64]) -> f64 {
    let m = mean(data);
    (data.iter().map(|&x| (x - m) * (x - m)).sum::<f64>() / data.len() as f64).sqrt()
}

/// First differences of a series: `out[i] = data[i+1] - data[i]`.
pub(crate) fn successive_diffs(data: &[f64]) -> Vec<f64> {
    data.windows(2).map(|w| w[1] - w[0]).collect()
}
