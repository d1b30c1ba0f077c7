use anyhow::{bail, Context, Result};
use clap::Parser;
use log::debug;

use hrv_report::config::Args;
use hrv_report::data_loading::{DataError, SessionStore};
use hrv_report::{compute_metrics, report};

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.window_len < 2 {
        bail!("--window-len must be at least 2");
    }
    if args.embedding_dim < 1 {
        bail!("--embedding-dim must be at least 1");
    }
    let cfg = args.analysis_config();

    let store = SessionStore::load(&args.input_path)?;
    debug!("session store holds {} records", store.len());

    let session = match store.session(args.session) {
        Ok(session) => session,
        Err(err @ DataError::SessionNotFound(_)) => bail!("no data: {}", err),
        Err(err) => bail!("malformed data: {}", err),
    };

    let metrics = compute_metrics(
        &session.beat_timings,
        &session.spo2,
        &session.heart_bpm,
        &cfg,
    )
    .with_context(|| format!("computing metrics for session {}", args.session))?;

    let date = chrono::Utc::now().format("%Y-%m-%d");
    println!("Physiological assessment for {} ({})", session.name, date);
    println!("Mean BPM: {:.1}\n", metrics.mean_bpm);
    println!("{}", metrics.render_text());

    if let Some(prefix) = &args.csv_output {
        report::write_windows_csv(prefix, args.session, &metrics.windows)?;
    }

    Ok(())
}
