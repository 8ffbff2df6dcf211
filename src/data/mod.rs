//! Sentiment data sources.
//!
//! The dashboard only needs two calls: the current snapshot and the weekly
//! history. Both sources (HTTP API, saved JSON files) hand back the raw
//! payloads; shaping them is the pipeline's job.

use crate::domain::{CurrentSentiment, RawRecord};
use crate::error::AppError;

pub mod file;
pub mod http;

pub use file::FileSource;
pub use http::HttpSource;

/// Where sentiment payloads come from.
pub trait SentimentSource {
    /// Latest per-channel scores, update time, and top contributing posts.
    fn fetch_current(&self) -> Result<CurrentSentiment, AppError>;

    /// Chronological per-interval snapshots.
    fn fetch_history(&self) -> Result<Vec<RawRecord>, AppError>;

    /// Short human-readable description for status lines.
    fn describe(&self) -> String;
}
