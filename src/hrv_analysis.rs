//! Time-domain, frequency-domain, and nonlinear HRV metric engines.
//!
//! All functions operate on an RR-interval series in milliseconds and are
//! pure: no I/O, no shared state, deterministic for a given input and
//! configuration.

use log::debug;
use rustfft::{num_complex::Complex, FftPlanner};
use serde::Serialize;
use std::f64::consts::PI;

use crate::config::{AnalysisConfig, SampleEntropyConfig, Sd2DomainPolicy, WelchConfig};
use crate::error::MetricsError;
use crate::stats;

/// Low-frequency band in Hz, bounds inclusive.
pub const LF_BAND: (f64, f64) = (0.04, 0.15);
/// High-frequency band in Hz, bounds inclusive.
pub const HF_BAND: (f64, f64) = (0.15, 0.4);
/// Successive-difference threshold for pNN50, in milliseconds.
pub const NN50_THRESHOLD_MS: f64 = 50.0;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct TimeDomainMetrics {
    /// Sample standard deviation of the RR intervals (ms).
    pub sdnn: f64,
    /// Root-mean-square of successive RR differences (ms).
    pub rmssd: f64,
    /// Percentage of successive differences exceeding 50 ms.
    pub pnn50: f64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct FrequencyDomainMetrics {
    /// Power integrated over the LF band (ms²).
    pub lf_power: f64,
    /// Power integrated over the HF band (ms²).
    pub hf_power: f64,
    /// LF/HF ratio; positive infinity when HF power is exactly zero.
    pub lf_hf_ratio: f64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct NonlinearMetrics {
    /// Short-term Poincaré dispersion (ms).
    pub sd1: f64,
    /// Long-term Poincaré dispersion (ms).
    pub sd2: f64,
    /// Sample entropy of the RR series (dimensionless).
    pub sample_entropy: f64,
}

/// Computes SDNN, RMSSD, and pNN50 over the RR series.
///
/// Requires at least two intervals so that both the Bessel-corrected
/// standard deviation and the successive differences are defined.
pub fn time_domain(rr: &[f64]) -> Result<TimeDomainMetrics, MetricsError> {
    if rr.len() < 2 {
        return Err(MetricsError::InsufficientData {
            metric: "time-domain metrics",
            needed: 2,
            got: rr.len(),
        });
    }

    let sdnn = stats::sample_std(rr);
    let diffs = stats::successive_diffs(rr);
    let rmssd = (diffs.iter().map(|d| d * d).sum::<f64>() / diffs.len() as f64).sqrt();
    let nn50 = diffs.iter().filter(|d| d.abs() > NN50_THRESHOLD_MS).count();
    let pnn50 = nn50 as f64 / diffs.len() as f64 * 100.0;

    debug!(
        "time domain: sdnn={:.2}ms rmssd={:.2}ms pnn50={:.2}%",
        sdnn, rmssd, pnn50
    );

    Ok(TimeDomainMetrics { sdnn, rmssd, pnn50 })
}

/// Computes LF power, HF power, and their ratio from a Welch PSD estimate
/// of the RR series.
///
/// A zero HF power yields an LF/HF ratio of positive infinity, which is a
/// reportable value, not an error.
pub fn frequency_domain(
    rr: &[f64],
    cfg: &WelchConfig,
) -> Result<FrequencyDomainMetrics, MetricsError> {
    if rr.is_empty() {
        return Err(MetricsError::InsufficientData {
            metric: "frequency-domain metrics",
            needed: 1,
            got: 0,
        });
    }

    let (freqs, psd) = welch_psd(rr, cfg);
    let lf_power = band_power(&freqs, &psd, LF_BAND);
    let hf_power = band_power(&freqs, &psd, HF_BAND);
    let lf_hf_ratio = if hf_power == 0.0 {
        f64::INFINITY
    } else {
        lf_power / hf_power
    };

    debug!(
        "frequency domain: lf={:.6} hf={:.6} ratio={:.2}",
        lf_power, hf_power, lf_hf_ratio
    );

    Ok(FrequencyDomainMetrics {
        lf_power,
        hf_power,
        lf_hf_ratio,
    })
}

/// Computes Poincaré SD1/SD2 and sample entropy.
///
/// SD1 needs at least two successive differences, hence three intervals.
/// A negative SD2 radicand is handled per `cfg.sd2_domain`.
pub fn nonlinear(
    rr: &[f64],
    sdnn: f64,
    cfg: &AnalysisConfig,
) -> Result<NonlinearMetrics, MetricsError> {
    if rr.len() < 3 {
        return Err(MetricsError::InsufficientData {
            metric: "Poincaré metrics",
            needed: 3,
            got: rr.len(),
        });
    }

    let diffs = stats::successive_diffs(rr);
    let sd1 = 0.5f64.sqrt() * stats::sample_std(&diffs);
    let sd2 = sd2_from(sdnn, sd1, cfg.sd2_domain)?;
    let sample_entropy = sample_entropy(rr, &cfg.entropy)?;

    debug!(
        "nonlinear: sd1={:.2}ms sd2={:.2}ms sampen={:.4}",
        sd1, sd2, sample_entropy
    );

    Ok(NonlinearMetrics {
        sd1,
        sd2,
        sample_entropy,
    })
}

/// `SD2 = sqrt(2*SDNN^2 - 0.5*SD1^2)`, with the negative-radicand case
/// resolved by policy.
fn sd2_from(sdnn: f64, sd1: f64, policy: Sd2DomainPolicy) -> Result<f64, MetricsError> {
    let radicand = 2.0 * sdnn * sdnn - 0.5 * sd1 * sd1;
    if radicand >= 0.0 {
        return Ok(radicand.sqrt());
    }
    match policy {
        Sd2DomainPolicy::ClampToZero => Ok(0.0),
        Sd2DomainPolicy::Error => Err(MetricsError::NumericDomain {
            metric: "SD2",
            detail: format!("negative radicand {:.6}", radicand),
        }),
    }
}

/// Sample entropy with template matching over vectors of length m and m+1
/// (Chebyshev distance, strict tolerance comparison, `-ln(A/B)`).
///
/// When no m+1 templates match, the entropy is positive infinity. When no
/// m-length templates match at all (constant series, or a series too short
/// to form two templates) the statistic is degenerate and
/// `InsufficientData` is returned.
pub fn sample_entropy(data: &[f64], cfg: &SampleEntropyConfig) -> Result<f64, MetricsError> {
    let m = cfg.embedding_dim;
    let n = data.len();
    if n < m + 2 {
        return Err(MetricsError::InsufficientData {
            metric: "sample entropy",
            needed: m + 2,
            got: n,
        });
    }

    let tolerance = cfg
        .tolerance_override
        .unwrap_or_else(|| cfg.tolerance_fraction * stats::population_std(data));

    // Templates of length m+1; the m-length counts use the first m
    // components of the same template set.
    let num_templates = n - m;
    let mut count_m = 0u64;
    let mut count_m1 = 0u64;

    for i in 0..num_templates {
        for j in (i + 1)..num_templates {
            let mut dist_m = 0.0f64;
            for k in 0..m {
                dist_m = dist_m.max((data[i + k] - data[j + k]).abs());
            }
            if dist_m < tolerance {
                count_m += 1;
                if dist_m.max((data[i + m] - data[j + m]).abs()) < tolerance {
                    count_m1 += 1;
                }
            }
        }
    }

    if count_m == 0 {
        return Err(MetricsError::InsufficientData {
            metric: "sample entropy",
            needed: m + 2,
            got: n,
        });
    }
    if count_m1 == 0 {
        return Ok(f64::INFINITY);
    }
    Ok(-((count_m1 as f64 / count_m as f64).ln()))
}

/// Periodic Hann window of the given size.
fn hann_window(size: usize) -> Vec<f64> {
    if size == 1 {
        return vec![1.0];
    }
    (0..size)
        .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f64 / size as f64).cos()))
        .collect()
}

/// Welch PSD estimate: Hann-windowed segments with 50% overlap, constant
/// detrend per segment, one-sided density scaling. Returns (frequencies in
/// Hz, power densities in ms²/Hz). The segment length is clipped to the
/// series length when the series is short.
pub fn welch_psd(data: &[f64], cfg: &WelchConfig) -> (Vec<f64>, Vec<f64>) {
    let nperseg = cfg.segment_len.min(data.len()).max(1);
    let noverlap = nperseg / 2;
    let step = nperseg - noverlap;
    let window = hann_window(nperseg);
    let win_power: f64 = window.iter().map(|w| w * w).sum();

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(nperseg);

    let n_bins = nperseg / 2 + 1;
    let mut psd = vec![0.0f64; n_bins];
    let mut segments = 0usize;
    let mut start = 0usize;

    while start + nperseg <= data.len() {
        let segment = &data[start..start + nperseg];
        let seg_mean = stats::mean(segment);

        let mut buffer: Vec<Complex<f64>> = segment
            .iter()
            .zip(window.iter())
            .map(|(&x, &w)| Complex::new((x - seg_mean) * w, 0.0))
            .collect();
        fft.process(&mut buffer);

        for (k, bin) in buffer[..n_bins].iter().enumerate() {
            let mut power = bin.norm_sqr() / (cfg.sample_rate_hz * win_power);
            // One-sided spectrum: double everything except DC and, for even
            // segment lengths, the Nyquist bin.
            if k != 0 && !(nperseg % 2 == 0 && k == n_bins - 1) {
                power *= 2.0;
            }
            psd[k] += power;
        }

        segments += 1;
        start += step;
    }

    if segments > 0 {
        for p in &mut psd {
            *p /= segments as f64;
        }
    }
    debug!(
        "welch: nperseg={} segments={} bins={}",
        nperseg, segments, n_bins
    );

    let freqs = (0..n_bins)
        .map(|k| k as f64 * cfg.sample_rate_hz / nperseg as f64)
        .collect();
    (freqs, psd)
}

/// Trapezoidal integral of the PSD over the frequency points falling inside
/// the band, bounds inclusive. Empty or single-point bands integrate to
/// zero.
pub fn band_power(freqs: &[f64], psd: &[f64], band: (f64, f64)) -> f64 {
    let points: Vec<(f64, f64)> = freqs
        .iter()
        .zip(psd.iter())
        .filter(|(&f, _)| f >= band.0 && f <= band.1)
        .map(|(&f, &p)| (f, p))
        .collect();

    points
        .windows(2)
        .map(|w| (w[1].0 - w[0].0) * (w[0].1 + w[1].1) / 2.0)
        .sum()
}
