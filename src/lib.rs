//! HRV and SpO₂ session metrics.
//!
//! Turns one session's beat-onset timestamps, SpO₂ samples, and BPM samples
//! into a validated [`MetricsReport`]: time-domain, frequency-domain, and
//! nonlinear HRV metrics, fixed-window aggregates, and SpO₂ descriptive
//! statistics. The pipeline is pure and single-threaded; independent
//! sessions can be processed concurrently by calling [`compute_metrics`]
//! from separate threads.

pub mod config;
pub mod data_loading;
pub mod error;
pub mod hrv_analysis;
pub mod report;
pub mod rr;
pub mod spo2_analysis;
mod stats;
pub mod windowing;

use log::debug;
use serde::Serialize;

use config::AnalysisConfig;
use error::MetricsError;
use hrv_analysis::{FrequencyDomainMetrics, NonlinearMetrics, TimeDomainMetrics};
use rr::RrIntervals;
use spo2_analysis::Spo2Summary;
use windowing::WindowMetrics;

/// All computed scalars for one session. Immutable once built; a failure in
/// any metric aborts the whole report rather than emitting partial values.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub time: TimeDomainMetrics,
    pub frequency: FrequencyDomainMetrics,
    pub nonlinear: NonlinearMetrics,
    pub windows: Vec<WindowMetrics>,
    pub spo2: Spo2Summary,
    /// Mean of the raw BPM samples, for the report header.
    pub mean_bpm: f64,
}

/// Runs the full metrics pipeline over one session's data.
///
/// The BPM series carries no derived statistics beyond its mean but is
/// required to be non-empty, since downstream collaborators chart it
/// alongside the SpO₂ series.
pub fn compute_metrics(
    beat_timings: &[i64],
    spo2_samples: &[f64],
    bpm_samples: &[f64],
    cfg: &AnalysisConfig,
) -> Result<MetricsReport, MetricsError> {
    if bpm_samples.is_empty() {
        return Err(MetricsError::InsufficientData {
            metric: "BPM series",
            needed: 1,
            got: 0,
        });
    }

    let rr = RrIntervals::from_beat_timings(beat_timings)?;
    debug!("built {} RR intervals", rr.len());

    let time = hrv_analysis::time_domain(rr.as_slice())?;
    let frequency = hrv_analysis::frequency_domain(rr.as_slice(), &cfg.welch)?;
    let nonlinear = hrv_analysis::nonlinear(rr.as_slice(), time.sdnn, cfg)?;
    let windows = windowing::aggregate_windows(rr.as_slice(), cfg);
    let spo2 = spo2_analysis::summarize(spo2_samples)?;

    Ok(MetricsReport {
        time,
        frequency,
        nonlinear,
        windows,
        spo2,
        mean_bpm: bpm_samples.iter().sum::<f64>() / bpm_samples.len() as f64,
    })
}
