//! Tracing setup.
//!
//! CLI commands log to stderr. The TUI owns the terminal, so it only logs when
//! `METER_LOG_FILE` points somewhere. The filter comes from `METER_LOG`
//! (standard `EnvFilter` directives), defaulting to `warn`.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::error::AppError;

pub const ENV_LOG: &str = "METER_LOG";
pub const ENV_LOG_FILE: &str = "METER_LOG_FILE";
const DEFAULT_FILTER: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
    Off,
}

impl LogTarget {
    /// Target for the full-screen UI: a file if configured, otherwise nothing.
    pub fn for_tui() -> Self {
        match std::env::var_os(ENV_LOG_FILE) {
            Some(path) if !path.is_empty() => LogTarget::File(PathBuf::from(path)),
            _ => LogTarget::Off,
        }
    }
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. Calling it twice keeps the first one.
pub fn init(target: LogTarget) -> Result<(), AppError> {
    let result = match target {
        LogTarget::Off => return Ok(()),
        LogTarget::Stderr => tracing_subscriber::registry()
            .with(filter())
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init(),
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|e| AppError::config(format!("Failed to open log file '{}': {e}", path.display())))?;
            tracing_subscriber::registry()
                .with(filter())
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .try_init()
        }
    };

    if let Err(e) = result {
        tracing::debug!(error = %e, "tracing subscriber already installed");
    }
    Ok(())
}
