//! Shared "load pipeline" logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! fetch -> format records -> normalize -> presentation-ready outputs
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use serde::Serialize;
use tracing::info;

use crate::data::SentimentSource;
use crate::domain::{ChannelStatistics, Channels, ChartRecord, CurrentSentiment, FormattedRecord, NormalizedRecord, RawRecord};
use crate::error::AppError;
use crate::math::{normalize_with, series_statistics};
use crate::report::{Slice, breakdown, updated_label};
use crate::transform::{Zone, format_records, missing_counts};

/// All computed outputs of one history load.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryOutput {
    pub formatted: Vec<FormattedRecord>,
    pub normalized: Vec<NormalizedRecord>,
    pub stats: Channels<ChannelStatistics>,
    pub missing: Channels<usize>,
}

impl HistoryOutput {
    /// The series to display: z-scores or rounded raw scores.
    pub fn series(&self, normalized: bool) -> &[ChartRecord] {
        if normalized { &self.normalized } else { &self.formatted }
    }
}

/// All computed outputs of one current-snapshot load.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentOutput {
    pub updated: String,
    pub slices: Vec<Slice>,
    pub snapshot: CurrentSentiment,
}

/// Format and normalize an already-fetched history.
pub fn shape_history(records: &[RawRecord], zone: &Zone) -> HistoryOutput {
    let formatted = format_records(records, zone);
    let stats = series_statistics(&formatted);
    let normalized = normalize_with(&formatted, &stats);
    let missing = missing_counts(&formatted);

    HistoryOutput {
        formatted,
        normalized,
        stats,
        missing,
    }
}

/// Derive the breakdown and update label from an already-fetched snapshot.
pub fn shape_current(snapshot: CurrentSentiment, zone: &Zone) -> CurrentOutput {
    CurrentOutput {
        updated: updated_label(&snapshot.updated_at, zone),
        slices: breakdown(&snapshot.scores),
        snapshot,
    }
}

/// Fetch the weekly history and shape it.
pub fn load_history(source: &dyn SentimentSource, zone: &Zone) -> Result<HistoryOutput, AppError> {
    let records = source.fetch_history()?;
    let out = shape_history(&records, zone);
    info!(records = out.formatted.len(), %zone, "history ready");
    Ok(out)
}

/// Fetch the current snapshot and shape it.
pub fn load_current(source: &dyn SentimentSource, zone: &Zone) -> Result<CurrentOutput, AppError> {
    let snapshot = source.fetch_current()?;
    let out = shape_current(snapshot, zone);
    info!(slices = out.slices.len(), updated = %out.updated, "current sentiment ready");
    Ok(out)
}
