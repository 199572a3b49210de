use std::path::PathBuf;

use async_trait::async_trait;
use tracing::info;

use super::ReportSource;
use crate::domain::error::{AppError, Result};
use crate::infrastructure::csv::decode_utf8;

/// Reads the report from a local file
pub struct FileReportSource {
    path: PathBuf,
}

impl FileReportSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ReportSource for FileReportSource {
    async fn fetch_text(&self) -> Result<String> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            AppError::FetchError(format!("Failed to read {}: {}", self.path.display(), e))
        })?;

        info!(path = %self.path.display(), bytes = bytes.len(), "Read report file");
        Ok(decode_utf8(&bytes))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
