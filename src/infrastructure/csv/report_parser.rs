// ============================================================
// REPORT PARSER
// ============================================================
// Parse delimited report text into a Dataset, best effort per row

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, warn};

use crate::domain::error::{AppError, Result};
use crate::domain::report::{
    Dataset, FieldCoercionWarning, Record, RecordField, COUNT_COLUMNS, REPORT_COLUMNS,
};

/// Delimited-text parser for the progress report
#[derive(Debug, Clone)]
pub struct ReportParser {
    /// Delimiter byte; `None` detects it from the content
    delimiter: Option<u8>,

    /// Whether to trim whitespace from headers and values. Off by default
    /// so status values are matched exactly as stored.
    trim: bool,
}

impl Default for ReportParser {
    fn default() -> Self {
        Self {
            delimiter: None,
            trim: false,
        }
    }
}

impl ReportParser {
    /// Create a new parser with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a fixed delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Set whether to trim whitespace
    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// Parse report text. Fails only when the payload or its header is missing.
    pub fn parse(&self, content: &str) -> Result<Dataset> {
        if content.trim().is_empty() {
            return Err(AppError::ParseError("empty payload".to_string()));
        }

        let delimiter = self
            .delimiter
            .unwrap_or_else(|| Self::detect_delimiter(content));

        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .trim(if self.trim { Trim::All } else { Trim::None })
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| AppError::ParseError(format!("Failed to read header line: {}", e)))?
            .clone();

        if headers.iter().all(|h| h.trim().is_empty()) {
            return Err(AppError::ParseError("missing header".to_string()));
        }

        let header_names: Vec<String> = headers.iter().map(str::to_string).collect();
        let missing: Vec<&str> = REPORT_COLUMNS
            .into_iter()
            .filter(|column| !header_names.iter().any(|h| h.as_str() == *column))
            .collect();
        if !missing.is_empty() {
            warn!(?missing, "Report header lacks expected columns");
        }

        let mut records = Vec::new();
        let mut skipped_blank = 0usize;
        let mut skipped_broken = 0usize;

        for (line, result) in reader.records().enumerate() {
            let raw = match result {
                Ok(raw) => raw,
                Err(e) => {
                    warn!(line = line + 2, error = %e, "Skipping undecodable report row");
                    skipped_broken += 1;
                    continue;
                }
            };

            let record = Self::decode_row(records.len(), &headers, &raw);
            if record.is_blank() {
                skipped_blank += 1;
                continue;
            }
            records.push(record);
        }

        let warnings = Self::coercion_warnings(&records);
        for w in &warnings {
            debug!(row = w.row, field = %w.field, raw = ?w.raw, "Count field is not a number");
        }
        if !warnings.is_empty() {
            warn!(
                count = warnings.len(),
                "Report has count fields that are absent or not numeric; shown as-is"
            );
        }

        debug!(
            rows = records.len(),
            columns = header_names.len(),
            skipped_blank,
            skipped_broken,
            delimiter = %(delimiter as char),
            "Parsed report"
        );

        Ok(Dataset::new(header_names, records)?.with_warnings(warnings))
    }

    /// Decode one row against the header. Missing trailing values become
    /// empty strings and surplus values are dropped.
    fn decode_row(index: usize, headers: &StringRecord, raw: &StringRecord) -> Record {
        let fields = headers
            .iter()
            .enumerate()
            .map(|(idx, header)| RecordField::new(header, raw.get(idx).unwrap_or("")))
            .collect();

        Record::new(index, fields)
    }

    fn coercion_warnings(records: &[Record]) -> Vec<FieldCoercionWarning> {
        let mut warnings = Vec::new();
        for record in records {
            for column in COUNT_COLUMNS {
                if record.count(column).is_none() {
                    warnings.push(FieldCoercionWarning {
                        row: record.index(),
                        field: column.to_string(),
                        raw: record.get(column).map(str::to_string),
                    });
                }
            }
        }
        warnings
    }

    /// Detect delimiter from content (comma, semicolon, tab, pipe)
    pub fn detect_delimiter(content: &str) -> u8 {
        let candidates = [b',', b';', b'\t', b'|'];
        let sample_lines: Vec<_> = content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .take(10)
            .collect();

        let mut best_delimiter = b',';
        let mut best_score = 0.0f32;

        if sample_lines.is_empty() {
            return best_delimiter;
        }

        for &delimiter in &candidates {
            let field_counts: Vec<usize> = sample_lines
                .iter()
                .map(|line| line.bytes().filter(|&b| b == delimiter).count())
                .collect();

            // Score by consistency (low standard deviation) and frequency
            let avg = field_counts.iter().sum::<usize>() as f32 / field_counts.len() as f32;
            let variance = field_counts
                .iter()
                .map(|&x| (x as f32 - avg).powi(2))
                .sum::<f32>()
                / field_counts.len() as f32;

            let score = avg / (1.0 + variance.sqrt());

            if score > best_score {
                best_score = score;
                best_delimiter = delimiter;
            }
        }

        best_delimiter
    }
}

/// Decode a fetched byte stream as UTF-8, dropping a BOM and replacing
/// invalid sequences
pub fn decode_utf8(bytes: &[u8]) -> String {
    let (text, had_errors) = encoding_rs::UTF_8.decode_with_bom_removal(bytes);
    if had_errors {
        warn!("Report contained invalid UTF-8 sequences; replaced");
    }
    text.into_owned()
}
