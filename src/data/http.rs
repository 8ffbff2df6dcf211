//! Sentiment API integration over blocking HTTP.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::data::SentimentSource;
use crate::domain::{CurrentSentiment, RawRecord};
use crate::error::AppError;

const CURRENT_PATH: &str = "/sentiment/current";
const HISTORY_PATH: &str = "/sentiment/week";

pub struct HttpSource {
    client: Client,
    base_url: String,
}

impl HttpSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(AppError::config("Sentiment API URL is empty."));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str, failure: &str) -> Result<T, AppError> {
        let url = format!("{}{path}", self.base_url);
        debug!(%url, "requesting");

        let resp = self.client.get(&url).send().map_err(|e| {
            warn!(%url, error = %e, "request failed");
            AppError::upstream(format!("{failure}: {e}"))
        })?;

        if !resp.status().is_success() {
            warn!(%url, status = %resp.status(), "non-success status");
            return Err(AppError::upstream(format!("{failure} (status {}).", resp.status())));
        }

        resp.json()
            .map_err(|e| AppError::upstream(format!("{failure}: invalid JSON body: {e}")))
    }
}

impl SentimentSource for HttpSource {
    fn fetch_current(&self) -> Result<CurrentSentiment, AppError> {
        let current: CurrentSentiment = self.get_json(CURRENT_PATH, "Failed to fetch sentiment data")?;
        info!(updated_at = %current.updated_at, "fetched current sentiment");
        Ok(current)
    }

    fn fetch_history(&self) -> Result<Vec<RawRecord>, AppError> {
        // A `null` body is treated as "no history yet".
        let records: Option<Vec<RawRecord>> =
            self.get_json(HISTORY_PATH, "Failed to fetch sentiment history")?;
        let records = records.unwrap_or_default();
        info!(records = records.len(), "fetched sentiment history");
        Ok(records)
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}
