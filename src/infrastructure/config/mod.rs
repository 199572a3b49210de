// ============================================================
// APPLICATION CONFIGURATION
// ============================================================
// Layered settings: defaults, then report.toml, then REPORT_* env vars

use std::path::PathBuf;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::domain::error::{AppError, Result};
use crate::infrastructure::csv::ReportParser;

/// Where the report is fetched from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Report URL (default: `/report.csv` on a local dev server)
    pub url: String,

    /// Local file to read instead of the URL
    pub path: Option<PathBuf>,

    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,

    /// Extra attempts after a failed fetch (default: 0, a single attempt)
    pub max_retries: u32,

    /// Pause between attempts in milliseconds (default: 500)
    pub retry_backoff_ms: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:3000/report.csv".to_string(),
            path: None,
            timeout_secs: 30,
            max_retries: 0,
            retry_backoff_ms: 500,
        }
    }
}

/// How the report text is split into records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Fixed delimiter; detected from the content when unset
    pub delimiter: Option<char>,

    /// Trim whitespace around headers and values (default: false)
    pub trim: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            trim: false,
        }
    }
}

impl ParserConfig {
    pub fn build_parser(&self) -> ReportParser {
        let parser = ReportParser::new().with_trim(self.trim);
        match self.delimiter {
            Some(delimiter) if delimiter.is_ascii() => parser.with_delimiter(delimiter as u8),
            _ => parser,
        }
    }
}

/// Headings shown above the table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub title: String,
    pub subtitle: String,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            title: "GDGoC-AEC Google Cloud Study Jams 2025".to_string(),
            subtitle: "Daily Progress Report".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub source: SourceConfig,
    pub parser: ParserConfig,
    pub view: ViewConfig,

    /// `tracing` env-filter directive (default: "info")
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            parser: ParserConfig::default(),
            view: ViewConfig::default(),
            log_filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub const FILE_NAME: &'static str = "report.toml";
    pub const ENV_PREFIX: &'static str = "REPORT_";

    /// Defaults, then `report.toml`, then `REPORT_*` variables (`__` separates nesting)
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(Self::FILE_NAME))
            .merge(Env::prefixed(Self::ENV_PREFIX).split("__"))
    }

    /// Load `.env` if present, then extract and validate the layered config
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_figment(Self::figment())
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: AppConfig = figment.extract()?;
        config
            .validate()
            .map_err(|e| AppError::ConfigError(format!("Invalid configuration: {}", e)))?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.source.path.is_none() && self.source.url.trim().is_empty() {
            return Err("source.url must be set when source.path is not".to_string());
        }
        if self.source.timeout_secs == 0 {
            return Err("source.timeout_secs must be > 0".to_string());
        }
        if self.source.max_retries > 10 {
            return Err("source.max_retries must be <= 10".to_string());
        }
        if let Some(delimiter) = self.parser.delimiter {
            if !delimiter.is_ascii() || delimiter == '"' || delimiter == '\n' {
                return Err(format!("parser.delimiter '{}' is not usable", delimiter));
            }
        }
        Ok(())
    }
}
