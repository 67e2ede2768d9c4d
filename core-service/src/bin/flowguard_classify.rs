//! flowguard-classify - evaluate flows offline
//!
//! Usage: `flowguard-classify [model_dir] [threshold] < flows.jsonl`
//!
//! Reads one JSON object per line from stdin and prints one JSON result per
//! line to stdout: the verdict, or `{"error": ...}` for a rejected line.
//! Defaults come from `MODEL_DIR` / `DETECTION_THRESHOLD`.

use std::io::{self, BufWriter};
use std::process::ExitCode;

use flowguard_core::constants::{get_model_dir, get_threshold_var, APP_NAME, APP_VERSION};
use flowguard_core::logic::pipeline::{classify_stream, BatchSummary};
use flowguard_core::{ModelBundle, ThresholdConfig};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting {} classifier v{}", APP_NAME, APP_VERSION);

    let mut args = std::env::args().skip(1);
    let model_dir = args.next().unwrap_or_else(get_model_dir);
    let threshold_arg = args.next().or_else(get_threshold_var);

    let threshold = match threshold_arg.as_deref().map(ThresholdConfig::parse) {
        Some(Ok(threshold)) => threshold,
        Some(Err(e)) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
        None => ThresholdConfig::default(),
    };

    let pipeline = match ModelBundle::load(&model_dir) {
        Ok(bundle) => bundle.into_pipeline(threshold),
        Err(e) => {
            log::error!("Failed to load models from {}: {}", model_dir, e);
            return ExitCode::FAILURE;
        }
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    match classify_stream(&pipeline, stdin.lock(), BufWriter::new(stdout.lock())) {
        Ok(BatchSummary { total, rejected }) => {
            log::info!("Processed {} flows ({} rejected)", total, rejected);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("I/O error: {}", e);
            ExitCode::FAILURE
        }
    }
}
