//! Fixed-size, non-overlapping per-window recomputation of time-domain
//! metrics across the RR series.

use log::debug;
use serde::Serialize;

use crate::config::{AnalysisConfig, PartialWindowPolicy};
use crate::stats;

/// Time-domain metrics for one slice of the RR series.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct WindowMetrics {
    /// 1-based sequential window index.
    pub index: usize,
    /// Mean RR interval in the window (ms).
    pub mean_rr: f64,
    /// Window SDNN, Bessel-corrected (ms).
    pub sdnn: f64,
    /// Window RMSSD (ms).
    pub rmssd: f64,
}

/// Slices the RR series into non-overlapping windows of `cfg.window_len`
/// intervals, left to right, and computes metrics per complete window.
///
/// The trailing remainder is handled per `cfg.partial_window`: dropped by
/// default, or emitted as a final under-sized window when it still holds at
/// least two intervals. Window lengths below 2 yield no windows.
pub fn aggregate_windows(rr: &[f64], cfg: &AnalysisConfig) -> Vec<WindowMetrics> {
    if cfg.window_len < 2 {
        return Vec::new();
    }

    let chunks = rr.chunks_exact(cfg.window_len);
    let remainder = chunks.remainder();
    let mut windows: Vec<WindowMetrics> = chunks
        .enumerate()
        .map(|(i, window)| window_metrics(i + 1, window))
        .collect();

    if cfg.partial_window == PartialWindowPolicy::Emit && remainder.len() >= 2 {
        windows.push(window_metrics(windows.len() + 1, remainder));
    }

    debug!(
        "windowing: {} windows of {} intervals ({} intervals in remainder)",
        windows.len(),
        cfg.window_len,
        remainder.len()
    );
    windows
}

fn window_metrics(index: usize, window: &[f64]) -> WindowMetrics {
    let diffs = stats::successive_diffs(window);
    WindowMetrics {
        index,
        mean_rr: stats::mean(window),
        sdnn: stats::sample_std(window),
        rmssd: (diffs.iter().map(|d| d * d).sum::<f64>() / diffs.len() as f64).sqrt(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;

    fn rr_series(n: usize) -> Vec<f64> {
        (0..n).map(|i| 800.0 + ((i * 13) % 40) as f64).collect()
    }

    #[test]
    fn test_window_count_is_floor_of_len_over_window_len() {
        let cfg = AnalysisConfig::default();
        for n in [0, 5, 9, 10, 19, 20, 25, 37] {
            let windows = aggregate_windows(&rr_series(n), &cfg);
            assert_eq!(windows.len(), n / cfg.window_len, "n={}", n);
        }
    }

    #[test]
    fn test_windows_are_sequential_and_1_based() {
        let cfg = AnalysisConfig::default();
        let windows = aggregate_windows(&rr_series(35), &cfg);
        let indices: Vec<usize> = windows.iter().map(|w| w.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
    }

    #[test]
    fn test_window_metrics_match_whole_series_formulas() {
        let cfg = AnalysisConfig::default();
        let rr = rr_series(10);
        let windows = aggregate_windows(&rr, &cfg);
        assert_eq!(windows.len(), 1);
        let w = &windows[0];
        assert!((w.mean_rr - stats::mean(&rr)).abs() < 1e-12);
        assert!((w.sdnn - stats::sample_std(&rr)).abs() < 1e-12);
    }

    #[test]
    fn test_partial_window_dropped_by_default() {
        let cfg = AnalysisConfig::default();
        let windows = aggregate_windows(&rr_series(17), &cfg);
        assert_eq!(windows.len(), 1);
    }

    #[test]
    fn test_partial_window_emitted_on_request() {
        let cfg = AnalysisConfig {
            partial_window: PartialWindowPolicy::Emit,
            ..AnalysisConfig::default()
        };
        let windows = aggregate_windows(&rr_series(17), &cfg);
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[1].index, 2);

        // A one-interval remainder has no defined statistics and is dropped
        // even under the emit policy.
        let windows = aggregate_windows(&rr_series(11), &cfg);
        assert_eq!(windows.len(), 1);
    }
}
