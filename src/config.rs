//! Runtime configuration: which source to read, which zone to label in.
//!
//! Values come from CLI flags, which fall back to environment variables
//! (loaded from `.env` by `app::run` before parsing):
//!
//! - `SENTIMENT_API_URL`: base URL of the sentiment API
//! - `METER_TZ`: zone for timestamp labels (`local`, `UTC`, `+05:30`, IANA name)
//! - `METER_HTTP_TIMEOUT_SECS`: HTTP request timeout
//! - `METER_LOG` / `METER_LOG_FILE`: see `logging`

use std::path::PathBuf;
use std::time::Duration;

use crate::cli::SourceArgs;
use crate::data::{FileSource, HttpSource, SentimentSource};
use crate::error::AppError;
use crate::transform::Zone;

pub const ENV_API_URL: &str = "SENTIMENT_API_URL";
pub const ENV_TZ: &str = "METER_TZ";
pub const ENV_HTTP_TIMEOUT: &str = "METER_HTTP_TIMEOUT_SECS";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone, PartialEq)]
pub enum SourceConfig {
    Http { base_url: String },
    Files { history: Option<PathBuf>, current: Option<PathBuf> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeterConfig {
    pub source: SourceConfig,
    pub zone: Zone,
    pub timeout: Duration,
}

impl MeterConfig {
    /// Resolve the source from parsed flags.
    ///
    /// Local files win over the API URL so offline runs never touch the network.
    pub fn from_args(args: &SourceArgs) -> Result<Self, AppError> {
        let source = if args.history_file.is_some() || args.current_file.is_some() {
            SourceConfig::Files {
                history: args.history_file.clone(),
                current: args.current_file.clone(),
            }
        } else {
            let base_url = args
                .api_url
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .ok_or_else(|| {
                    AppError::config(format!(
                        "Missing {ENV_API_URL} in environment (.env); pass --api-url or --history-file."
                    ))
                })?;
            SourceConfig::Http {
                base_url: base_url.to_string(),
            }
        };

        if args.timeout_secs == 0 {
            return Err(AppError::config("HTTP timeout must be at least 1 second."));
        }

        Ok(Self {
            source,
            zone: args.zone,
            timeout: Duration::from_secs(args.timeout_secs),
        })
    }

    pub fn open_source(&self) -> Result<Box<dyn SentimentSource>, AppError> {
        match &self.source {
            SourceConfig::Http { base_url } => Ok(Box::new(HttpSource::new(base_url, self.timeout)?)),
            SourceConfig::Files { history, current } => {
                Ok(Box::new(FileSource::new(history.clone(), current.clone())))
            }
        }
    }
}
