//! Descriptive statistics over the SpO₂ sample sequence. Raw statistics
//! only: no smoothing, no outlier rejection.

use serde::Serialize;

use crate::error::MetricsError;
use crate::stats;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Spo2Summary {
    /// Arithmetic mean (%).
    pub mean: f64,
    /// Population standard deviation (%).
    pub std_dev: f64,
    /// Coefficient of variation: population std over mean, ×100 (%).
    pub cv: f64,
    pub min: f64,
    pub max: f64,
}

/// Summarizes a non-empty SpO₂ sample sequence.
pub fn summarize(samples: &[f64]) -> Result<Spo2Summary, MetricsError> {
    if samples.is_empty() {
        return Err(MetricsError::InsufficientData {
            metric: "SpO₂ summary",
            needed: 1,
            got: 0,
        });
    }

    let mean = stats::mean(samples);
    let std_dev = stats::population_std(samples);
    // A constant series has zero spread, so its relative variation is zero
    // regardless of the mean.
    let cv = if std_dev == 0.0 {
        0.0
    } else {
        std_dev / mean * 100.0
    };
    let min = samples.iter().fold(f64::INFINITY, |a, &b| a.min(b));
    let max = samples.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));

    Ok(Spo2Summary {
        mean,
        std_dev,
        cv,
        min,
        max,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_values() {
        let s = summarize(&[96.0, 96.0, 97.0, 98.0]).unwrap();
        assert_eq!(s.mean, 96.75);
        assert_eq!(s.min, 96.0);
        assert_eq!(s.max, 98.0);
        assert!((s.std_dev - 0.6875f64.sqrt()).abs() < 1e-9);
        assert!((s.cv - 0.6875f64.sqrt() / 96.75 * 100.0).abs() < 1e-9);
        assert!((s.cv - 0.857).abs() < 1e-3);
    }

    #[test]
    fn test_cv_zero_iff_constant() {
        let s = summarize(&[97.0, 97.0, 97.0]).unwrap();
        assert_eq!(s.std_dev, 0.0);
        assert_eq!(s.cv, 0.0);

        let s = summarize(&[96.0, 98.0]).unwrap();
        assert!(s.cv > 0.0);
    }

    #[test]
    fn test_single_sample() {
        let s = summarize(&[95.0]).unwrap();
        assert_eq!(s.mean, 95.0);
        assert_eq!(s.min, 95.0);
        assert_eq!(s.max, 95.0);
        assert_eq!(s.cv, 0.0);
    }

    #[test]
    fn test_empty_sequence() {
        assert!(matches!(
            summarize(&[]),
            Err(MetricsError::InsufficientData { .. })
        ));
    }
}
