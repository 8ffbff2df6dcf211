//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the fixed channel set (`SentimentChannel`) and per-channel storage (`Channels`)
//! - raw API payloads (`RawRecord`, `CurrentSentiment`, `Post`)
//! - chart-ready outputs (`FormattedRecord`, `NormalizedRecord`, `ChannelStatistics`)

pub mod types;

pub use types::*;
