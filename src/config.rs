use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;

/// What to do with the RR intervals left over after slicing complete
/// aggregation windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartialWindowPolicy {
    /// Silently discard the trailing remainder (default).
    Drop,
    /// Emit a final under-sized window, provided it still holds at least
    /// two intervals so its statistics are defined.
    Emit,
}

impl FromStr for PartialWindowPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "drop" => Ok(PartialWindowPolicy::Drop),
            "emit" => Ok(PartialWindowPolicy::Emit),
            _ => Err(format!(
                "Invalid partial-window policy: {}. Use \"drop\" (default) or \"emit\"",
                s
            )),
        }
    }
}

/// What to do when the SD2 radicand `2*SDNN^2 - 0.5*SD1^2` is negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sd2DomainPolicy {
    /// Surface a numeric-domain error to the caller (default).
    Error,
    /// Clamp SD2 to zero.
    ClampToZero,
}

impl FromStr for Sd2DomainPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "error" => Ok(Sd2DomainPolicy::Error),
            "clamp" => Ok(Sd2DomainPolicy::ClampToZero),
            _ => Err(format!(
                "Invalid SD2 domain policy: {}. Use \"error\" (default) or \"clamp\"",
                s
            )),
        }
    }
}

/// Welch PSD estimator parameters.
#[derive(Debug, Clone, Copy)]
pub struct WelchConfig {
    /// Assumed sampling rate of the RR series in Hz.
    pub sample_rate_hz: f64,
    /// Segment length in samples; clipped to the series length when the
    /// series is shorter.
    pub segment_len: usize,
}

impl Default for WelchConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 4.0,
            segment_len: 64,
        }
    }
}

/// Sample-entropy template-matching parameters.
#[derive(Debug, Clone, Copy)]
pub struct SampleEntropyConfig {
    /// Embedding dimension m.
    pub embedding_dim: usize,
    /// Tolerance as a fraction of the population standard deviation of the
    /// series; ignored when `tolerance_override` is set.
    pub tolerance_fraction: f64,
    /// Absolute tolerance in milliseconds, overriding the fraction.
    pub tolerance_override: Option<f64>,
}

impl Default for SampleEntropyConfig {
    fn default() -> Self {
        Self {
            embedding_dim: 2,
            tolerance_fraction: 0.2,
            tolerance_override: None,
        }
    }
}

/// All tunable parameters of the metrics pipeline, with the defaults
/// spelled out so behavior does not depend on any numeric library's
/// implicit settings.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisConfig {
    pub welch: WelchConfig,
    pub entropy: SampleEntropyConfig,
    /// Number of RR intervals per aggregation window.
    pub window_len: usize,
    pub partial_window: PartialWindowPolicy,
    pub sd2_domain: Sd2DomainPolicy,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            welch: WelchConfig::default(),
            entropy: SampleEntropyConfig::default(),
            window_len: 10,
            partial_window: PartialWindowPolicy::Drop,
            sd2_domain: Sd2DomainPolicy::Error,
        }
    }
}

/// Compute HRV and SpO₂ session metrics from a JSON session store
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the JSON session store
    #[arg(help = "Path to the JSON session store")]
    pub input_path: PathBuf,

    /// Index of the session record to analyse
    #[arg(long, default_value = "0")]
    pub session: usize,

    /// CSV output file prefix for per-window metrics (e.g. /path/to/output/prefix)
    #[arg(long)]
    pub csv_output: Option<String>,

    /// Number of RR intervals per aggregation window
    #[arg(long, default_value = "10")]
    pub window_len: usize,

    /// Trailing partial window handling ("drop" or "emit")
    #[arg(long, default_value = "drop")]
    pub partial_window: PartialWindowPolicy,

    /// SD2 handling when the radicand is negative ("error" or "clamp")
    #[arg(long, default_value = "error")]
    pub sd2_domain: Sd2DomainPolicy,

    /// Welch segment length in samples
    #[arg(long, default_value = "64")]
    pub welch_segment_len: usize,

    /// Sample-entropy embedding dimension
    #[arg(long, default_value = "2")]
    pub embedding_dim: usize,

    /// Sample-entropy tolerance as a fraction of the series standard deviation
    #[arg(long, default_value = "0.2")]
    pub tolerance_fraction: f64,
}

impl Args {
    pub fn analysis_config(&self) -> AnalysisConfig {
        AnalysisConfig {
            welch: WelchConfig {
                segment_len: self.welch_segment_len,
                ..WelchConfig::default()
            },
            entropy: SampleEntropyConfig {
                embedding_dim: self.embedding_dim,
                tolerance_fraction: self.tolerance_fraction,
                tolerance_override: None,
            },
            window_len: self.window_len,
            partial_window: self.partial_window,
            sd2_domain: self.sd2_domain,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_parsing() {
        assert_eq!(
            "emit".parse::<PartialWindowPolicy>().unwrap(),
            PartialWindowPolicy::Emit
        );
        assert_eq!(
            "clamp".parse::<Sd2DomainPolicy>().unwrap(),
            Sd2DomainPolicy::ClampToZero
        );
        assert!("keep".parse::<PartialWindowPolicy>().is_err());
    }

    #[test]
    fn test_defaults_match_reference_parameters() {
        let cfg = AnalysisConfig::default();
        assert_eq!(cfg.welch.sample_rate_hz, 4.0);
        assert_eq!(cfg.welch.segment_len, 64);
        assert_eq!(cfg.entropy.embedding_dim, 2);
        assert_eq!(cfg.entropy.tolerance_fraction, 0.2);
        assert_eq!(cfg.window_len, 10);
        assert_eq!(cfg.partial_window, PartialWindowPolicy::Drop);
        assert_eq!(cfg.sd2_domain, Sd2DomainPolicy::Error);
    }
}
