use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};
use url::Url;

use super::{with_retry, ReportSource};
use crate::domain::error::{AppError, Result};
use crate::infrastructure::csv::decode_utf8;

/// Fetches the report with a single whole-file `GET`
pub struct HttpReportSource {
    client: reqwest::Client,
    url: Url,
    max_retries: u32,
    backoff: Duration,
}

impl HttpReportSource {
    pub fn new(url: Url, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url,
            max_retries: 0,
            backoff: Duration::from_millis(500),
        })
    }

    pub fn with_retries(mut self, max_retries: u32, backoff: Duration) -> Self {
        self.max_retries = max_retries;
        self.backoff = backoff;
        self
    }

    async fn fetch_once(&self, attempt: u32) -> Result<String> {
        debug!(url = %self.url, attempt, "Requesting report");

        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| AppError::FetchError(format!("GET {} failed: {}", self.url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::FetchError(format!(
                "GET {} returned {}",
                self.url, status
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::FetchError(format!("Reading body of {} failed: {}", self.url, e)))?;

        info!(url = %self.url, bytes = bytes.len(), "Fetched report");
        Ok(decode_utf8(&bytes))
    }
}

#[async_trait]
impl ReportSource for HttpReportSource {
    async fn fetch_text(&self) -> Result<String> {
        with_retry(self.max_retries, self.backoff, |attempt| self.fetch_once(attempt)).await
    }

    fn describe(&self) -> String {
        self.url.to_string()
    }
}
