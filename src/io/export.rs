//! Export chart-ready series to CSV or JSON.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.
//! Missing values are empty cells in CSV and `null` in JSON.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::domain::{ChartRecord, SentimentChannel};
use crate::error::AppError;

/// Write `records` to `path`, choosing CSV for a `.csv` extension and JSON otherwise.
pub fn write_series(path: &Path, records: &[ChartRecord]) -> Result<(), AppError> {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if is_csv {
        write_series_csv(path, records)?;
    } else {
        write_series_json(path, records)?;
    }
    info!(path = %path.display(), records = records.len(), "exported series");
    Ok(())
}

/// Write a series to a CSV file.
pub fn write_series_csv(path: &Path, records: &[ChartRecord]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::config(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    let mut out = BufWriter::new(file);

    // Header
    let header: Vec<&str> = std::iter::once("timestamp")
        .chain(SentimentChannel::ALL.iter().map(|c| c.name()))
        .collect();
    writeln!(out, "{}", header.join(","))
        .map_err(|e| AppError::config(format!("Failed to write export CSV header: {e}")))?;

    for record in records {
        writeln!(out, "{}", csv_row(record))
            .map_err(|e| AppError::config(format!("Failed to write export CSV row: {e}")))?;
    }

    out.flush()
        .map_err(|e| AppError::config(format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

/// Write a series to a pretty-printed JSON array.
pub fn write_series_json(path: &Path, records: &[ChartRecord]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::config(format!("Failed to create export JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(BufWriter::new(file), records)
        .map_err(|e| AppError::config(format!("Failed to write export JSON: {e}")))?;
    Ok(())
}

fn csv_row(record: &ChartRecord) -> String {
    let mut fields = vec![csv_field(&record.timestamp)];
    for (_, value) in record.scores.iter() {
        fields.push(value.map(|v| v.to_string()).unwrap_or_default());
    }
    fields.join(",")
}

/// Quote a field when it contains a delimiter, quote, or newline.
fn csv_field(raw: &str) -> String {
    if raw.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}
