//! Centralised tracing initialisation for the NARC binary.
//!
//! Records go to stdout and, when configured, to an append-only log file.
//! Verbosity is decided once here and does not change during the run.

use std::fs::OpenOptions;
use std::sync::Arc;

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LogConfig;

/// Initialise the global tracing subscriber.
///
/// Respects `RUST_LOG` when set; otherwise logs at `debug` with
/// `config.debug` and at `info` without. A log file that cannot be opened
/// is reported and skipped; stdout logging is unaffected.
///
/// Safe to call multiple times; only the first call takes effect.
pub fn init_tracing(config: &LogConfig) {
    let level = if config.debug {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let mut file_error = None;
    let file = config.log_file.as_ref().and_then(|path| {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Some(Arc::new(file)),
            Err(err) => {
                file_error = Some((path.clone(), err));
                None
            }
        }
    });

    let stdout_text = (!config.json).then(|| fmt::layer().with_target(false));
    let stdout_json = config.json.then(|| fmt::layer().with_target(false).json());
    let file_text = file
        .clone()
        .filter(|_| !config.json)
        .map(|file| fmt::layer().with_target(false).with_ansi(false).with_writer(file));
    let file_json = file.filter(|_| config.json).map(|file| {
        fmt::layer()
            .with_target(false)
            .with_ansi(false)
            .json()
            .with_writer(file)
    });

    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_text)
        .with(stdout_json)
        .with(file_text)
        .with(file_json)
        .try_init()
        .is_ok();

    if let (true, Some((path, err))) = (installed, file_error) {
        tracing::warn!(
            path = %path.display(),
            error = %err,
            "cannot open log file, logging to stdout only"
        );
    }
}
