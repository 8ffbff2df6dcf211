//! Offline source: sentiment payloads saved as JSON files.
//!
//! The files hold exactly what the API would return: an array of records for
//! history, an object for the current snapshot.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::info;

use crate::data::SentimentSource;
use crate::domain::{CurrentSentiment, RawRecord};
use crate::error::AppError;

#[derive(Debug, Clone, Default)]
pub struct FileSource {
    pub history: Option<PathBuf>,
    pub current: Option<PathBuf>,
}

impl FileSource {
    pub fn new(history: Option<PathBuf>, current: Option<PathBuf>) -> Self {
        Self { history, current }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::config(format!("Failed to open '{}': {e}", path.display())))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AppError::config(format!("Invalid sentiment JSON in '{}': {e}", path.display())))
}

impl SentimentSource for FileSource {
    fn fetch_current(&self) -> Result<CurrentSentiment, AppError> {
        let path = self
            .current
            .as_deref()
            .ok_or_else(|| AppError::config("No current-sentiment file given (--current-file)."))?;
        let current = read_json(path)?;
        info!(path = %path.display(), "loaded current sentiment");
        Ok(current)
    }

    fn fetch_history(&self) -> Result<Vec<RawRecord>, AppError> {
        let path = self
            .history
            .as_deref()
            .ok_or_else(|| AppError::config("No history file given (--history-file)."))?;
        let records: Option<Vec<RawRecord>> = read_json(path)?;
        let records = records.unwrap_or_default();
        info!(path = %path.display(), records = records.len(), "loaded sentiment history");
        Ok(records)
    }

    fn describe(&self) -> String {
        let show = |p: &Option<PathBuf>| p.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| "-".to_string());
        format!("files (history: {}, current: {})", show(&self.history), show(&self.current))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_json(name: &str, body: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("meter_{}_{name}.json", std::process::id()));
        let mut file = File::create(&path).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn reads_history_and_current() {
        let history = temp_json(
            "history",
            r#"[{"timestamp": 1709182800000, "joy": "0.5"}, {"timestamp": 1704085199000, "joy": 0.4}]"#,
        );
        let current = temp_json("current", r#"{"joy": 0.4, "fear": 0.5, "updatedAt": 1709182800000}"#);
        let source = FileSource::new(Some(history.clone()), Some(current.clone()));

        let records = source.fetch_history().unwrap();
        assert_eq!(records.len(), 2);
        let snapshot = source.fetch_current().unwrap();
        assert_eq!(snapshot.scores.fear, serde_json::json!(0.5));

        let _ = std::fs::remove_file(history);
        let _ = std::fs::remove_file(current);
    }

    #[test]
    fn null_history_is_empty() {
        let history = temp_json("null_history", "null");
        let source = FileSource::new(Some(history.clone()), None);
        assert!(source.fetch_history().unwrap().is_empty());
        let _ = std::fs::remove_file(history);
    }

    #[test]
    fn missing_paths_are_config_errors() {
        let source = FileSource::default();
        assert_eq!(source.fetch_history().unwrap_err().exit_code(), crate::error::EXIT_CONFIG);
        assert_eq!(source.fetch_current().unwrap_err().exit_code(), crate::error::EXIT_CONFIG);
    }
}
