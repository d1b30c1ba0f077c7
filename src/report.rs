//! Rendering of a [`MetricsReport`] for external collaborators: a sectioned
//! text summary for the narrative generator, a flat key → (value, unit)
//! mapping, and a per-window CSV.

use anyhow::Result;
use std::fmt::Write as _;
use std::path::Path;

use crate::windowing::WindowMetrics;
use crate::MetricsReport;

impl MetricsReport {
    /// Renders the sectioned human-readable summary. An infinite LF/HF
    /// ratio formats as "inf" rather than failing.
    pub fn render_text(&self) -> String {
        let mut out = String::new();

        out.push_str("--- Time-Domain Metrics ---\n");
        let _ = writeln!(out, "SDNN: {:.2} ms", self.time.sdnn);
        let _ = writeln!(out, "RMSSD: {:.2} ms", self.time.rmssd);
        let _ = writeln!(out, "pNN50: {:.2} %", self.time.pnn50);

        out.push_str("\n--- Frequency-Domain Metrics ---\n");
        let _ = writeln!(out, "LF Power: {:.6} ms²", self.frequency.lf_power);
        let _ = writeln!(out, "HF Power: {:.6} ms²", self.frequency.hf_power);
        let _ = writeln!(out, "LF/HF Ratio: {:.2}", self.frequency.lf_hf_ratio);

        out.push_str("\n--- Nonlinear Metrics ---\n");
        let _ = writeln!(out, "SD1: {:.2} ms", self.nonlinear.sd1);
        let _ = writeln!(out, "SD2: {:.2} ms", self.nonlinear.sd2);
        let _ = writeln!(out, "Sample Entropy: {:.4}", self.nonlinear.sample_entropy);

        out.push_str("\n--- Per-Window HRV Metrics ---\n");
        for w in &self.windows {
            let _ = writeln!(
                out,
                "Window {}: Mean RR {:.2} ms, SDNN {:.2} ms, RMSSD {:.2} ms",
                w.index, w.mean_rr, w.sdnn, w.rmssd
            );
        }

        out.push_str("\n--- SpO₂ Summary ---\n");
        let _ = writeln!(out, "Mean SpO₂: {:.2} %", self.spo2.mean);
        let _ = writeln!(out, "Std Dev SpO₂: {:.2} %", self.spo2.std_dev);
        let _ = writeln!(out, "Coefficient of Variation: {:.2} %", self.spo2.cv);
        let _ = writeln!(out, "Min SpO₂: {:.2} %", self.spo2.min);
        let _ = writeln!(out, "Max SpO₂: {:.2} %", self.spo2.max);

        out
    }

    /// Flat metric name → (value, unit) mapping for external collaborators.
    /// Windowed metrics are tabular and exported separately.
    pub fn key_values(&self) -> Vec<(&'static str, f64, &'static str)> {
        vec![
            ("sdnn", self.time.sdnn, "ms"),
            ("rmssd", self.time.rmssd, "ms"),
            ("pnn50", self.time.pnn50, "%"),
            ("lf_power", self.frequency.lf_power, "ms²"),
            ("hf_power", self.frequency.hf_power, "ms²"),
            ("lf_hf_ratio", self.frequency.lf_hf_ratio, ""),
            ("sd1", self.nonlinear.sd1, "ms"),
            ("sd2", self.nonlinear.sd2, "ms"),
            ("sample_entropy", self.nonlinear.sample_entropy, ""),
            ("mean_bpm", self.mean_bpm, "bpm"),
            ("spo2_mean", self.spo2.mean, "%"),
            ("spo2_std", self.spo2.std_dev, "%"),
            ("spo2_cv", self.spo2.cv, "%"),
            ("spo2_min", self.spo2.min, "%"),
            ("spo2_max", self.spo2.max, "%"),
        ]
    }
}

/// Writes the per-window metrics next to `base_path`, named
/// `<stem>_session_<n>_windows.<ext>`.
pub fn write_windows_csv(
    base_path: &str,
    session: usize,
    windows: &[WindowMetrics],
) -> Result<()> {
    let path = Path::new(base_path);
    let dir = path.parent().unwrap_or(Path::new("."));
    std::fs::create_dir_all(dir)?;

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("results");
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("csv");

    let filename = format!("{}_session_{}_windows.{}", stem, session, ext);
    let full_path = dir.join(filename);

    println!("Writing window metrics to {}", full_path.display());
    let file = std::fs::File::create(full_path)?;
    let mut writer = csv::Writer::from_writer(file);

    writer.write_record(["window", "mean_rr_ms", "sdnn_ms", "rmssd_ms"])?;
    for w in windows {
        writer.write_record(&[
            w.index.to_string(),
            w.mean_rr.to_string(),
            w.sdnn.to_string(),
            w.rmssd.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::compute_metrics;
    use crate::config::AnalysisConfig;

    fn sample_report() -> crate::MetricsReport {
        let timings: Vec<i64> = (0..40).map(|i| i * 900 + (i % 3) * 60).collect();
        compute_metrics(
            &timings,
            &[96.0, 96.0, 97.0, 98.0],
            &[60.0, 62.0, 61.0],
            &AnalysisConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_render_text_sections() {
        let text = sample_report().render_text();
        for section in [
            "--- Time-Domain Metrics ---",
            "--- Frequency-Domain Metrics ---",
            "--- Nonlinear Metrics ---",
            "--- Per-Window HRV Metrics ---",
            "--- SpO₂ Summary ---",
        ] {
            assert!(text.contains(section), "missing section {}", section);
        }
        assert!(text.contains("Mean SpO₂: 96.75 %"));
        assert!(text.contains("Window 1:"));
    }

    #[test]
    fn test_infinite_ratio_formats_without_failing() {
        let mut report = sample_report();
        report.frequency.lf_hf_ratio = f64::INFINITY;
        let text = report.render_text();
        assert!(text.contains("LF/HF Ratio: inf"));

        let kv = report.key_values();
        let (_, ratio, _) = kv.iter().find(|(k, _, _)| *k == "lf_hf_ratio").unwrap();
        assert!(ratio.is_infinite());
    }

    #[test]
    fn test_key_values_units() {
        let kv = sample_report().key_values();
        assert_eq!(kv.len(), 15);
        let (_, sdnn, unit) = kv.iter().find(|(k, _, _)| *k == "sdnn").unwrap();
        assert_eq!(*unit, "ms");
        assert!(*sdnn >= 0.0);
    }
}
