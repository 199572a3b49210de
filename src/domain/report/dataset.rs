// ============================================================
// DATASET
// ============================================================
// The full, immutable set of records produced by one load

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::record::Record;
use crate::domain::error::{AppError, Result};

/// A count column that could not be read as a number.
/// Not an error: the raw value is kept for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldCoercionWarning {
    /// Record index within the dataset
    pub row: usize,

    /// Column header
    pub field: String,

    /// Raw value, `None` when the column is missing from the schema
    pub raw: Option<String>,
}

/// Records loaded from one fetch + parse cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    id: Uuid,
    loaded_at: DateTime<Utc>,
    headers: Vec<String>,
    records: Vec<Record>,
    warnings: Vec<FieldCoercionWarning>,
}

impl Dataset {
    /// Build a dataset, checking that every record shares the header schema.
    /// Records are re-keyed by their position.
    pub fn new(headers: Vec<String>, records: Vec<Record>) -> Result<Self> {
        for record in &records {
            if !record.field_names().eq(headers.iter().map(String::as_str)) {
                return Err(AppError::ValidationError(format!(
                    "Record {} does not match the dataset schema ({} columns expected, {} found)",
                    record.index(),
                    headers.len(),
                    record.fields().len()
                )));
            }
        }

        let records = records
            .into_iter()
            .enumerate()
            .map(|(position, record)| record.with_index(position))
            .collect();

        Ok(Self {
            id: Uuid::new_v4(),
            loaded_at: Utc::now(),
            headers,
            records,
            warnings: Vec::new(),
        })
    }

    /// Build a dataset whose schema is taken from the first record
    pub fn from_records(records: Vec<Record>) -> Result<Self> {
        let headers = records
            .first()
            .map(|r| r.field_names().map(str::to_string).collect())
            .unwrap_or_default();
        Self::new(headers, records)
    }

    pub fn empty() -> Self {
        Self {
            id: Uuid::nil(),
            loaded_at: Utc::now(),
            headers: Vec::new(),
            records: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<FieldCoercionWarning>) -> Self {
        self.warnings = warnings;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn warnings(&self) -> &[FieldCoercionWarning] {
        &self.warnings
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for Dataset {
    fn default() -> Self {
        Self::empty()
    }
}
