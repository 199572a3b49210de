pub mod file;
pub mod http;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::error::{AppError, Result};
use crate::infrastructure::config::SourceConfig;
pub use file::FileReportSource;
pub use http::HttpReportSource;

/// Supplies the raw report text for one load
#[async_trait]
pub trait ReportSource: Send + Sync {
    async fn fetch_text(&self) -> Result<String>;

    /// Where the report comes from, for logs
    fn describe(&self) -> String;
}

/// Pick the source described by the configuration. A local path wins over the URL.
pub fn from_config(config: &SourceConfig) -> Result<Box<dyn ReportSource>> {
    if let Some(path) = &config.path {
        return Ok(Box::new(FileReportSource::new(path.clone())));
    }

    let url = url::Url::parse(config.url.trim())
        .map_err(|e| AppError::ConfigError(format!("Invalid report URL '{}': {}", config.url, e)))?;

    Ok(Box::new(
        HttpReportSource::new(url, Duration::from_secs(config.timeout_secs))?
            .with_retries(config.max_retries, Duration::from_millis(config.retry_backoff_ms)),
    ))
}

/// Run `op` up to `max_retries + 1` times, sleeping `backoff` between attempts.
/// Only fetch errors are retried.
pub(crate) async fn with_retry<T, F, Fut>(max_retries: u32, backoff: Duration, mut op: F) -> Result<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(AppError::FetchError(msg)) if attempt < max_retries => {
                attempt += 1;
                warn!(attempt, max_retries, error = %msg, "Report fetch failed, retrying");
                tokio::time::sleep(backoff).await;
            }
            Err(err) => return Err(err),
        }
    }
}
