// ============================================================
// PARTICIPANT RECORD
// ============================================================
// One parsed row of the progress report

use serde::{Deserialize, Serialize};

use super::schema::{columns, ProfileStatus};

/// A single named value in a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordField {
    /// Header text of the column
    pub name: String,

    /// Field value, possibly empty
    pub value: String,
}

impl RecordField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A single participant row. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Position in the dataset, used only as a render key
    index: usize,

    /// Fields in header order
    fields: Vec<RecordField>,
}

impl Record {
    pub fn new(index: usize, fields: Vec<RecordField>) -> Self {
        Self { index, fields }
    }

    /// Build a record from `(header, value)` pairs
    pub fn from_pairs(index: usize, pairs: &[(&str, &str)]) -> Self {
        let fields = pairs
            .iter()
            .map(|(name, value)| RecordField::new(*name, *value))
            .collect();
        Self::new(index, fields)
    }

    pub(crate) fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn fields(&self) -> &[RecordField] {
        &self.fields
    }

    /// Field names in order, i.e. this record's schema
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Value of a column; `None` when the column is not part of the schema
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }

    pub fn user_name(&self) -> Option<&str> {
        self.get(columns::USER_NAME)
    }

    pub fn profile_url(&self) -> Option<&str> {
        self.get(columns::PROFILE_URL)
    }

    pub fn profile_url_status(&self) -> Option<&str> {
        self.get(columns::PROFILE_URL_STATUS)
    }

    /// Profile status mapped through the known enumeration
    pub fn profile_status(&self) -> Option<ProfileStatus> {
        self.profile_url_status().and_then(ProfileStatus::from_raw)
    }

    pub fn redemption_status(&self) -> Option<&str> {
        self.get(columns::REDEMPTION_STATUS)
    }

    pub fn all_badges_and_games_completed(&self) -> Option<&str> {
        self.get(columns::ALL_COMPLETED)
    }

    pub fn skill_badge_names(&self) -> Option<&str> {
        self.get(columns::SKILL_BADGE_NAMES)
    }

    pub fn arcade_game_names(&self) -> Option<&str> {
        self.get(columns::ARCADE_GAME_NAMES)
    }

    /// Parsed skill badge count; `None` when absent or not a number
    pub fn skill_badge_count(&self) -> Option<u32> {
        self.count(columns::SKILL_BADGE_COUNT)
    }

    /// Parsed arcade game count; `None` when absent or not a number
    pub fn arcade_game_count(&self) -> Option<u32> {
        self.count(columns::ARCADE_GAME_COUNT)
    }

    pub fn count(&self, name: &str) -> Option<u32> {
        self.get(name).and_then(parse_count)
    }

    /// True when every field is empty after trimming
    pub fn is_blank(&self) -> bool {
        self.fields.iter().all(|f| f.value.trim().is_empty())
    }
}

/// Parse a count column value
pub(crate) fn parse_count(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Record {
        Record::from_pairs(
            3,
            &[
                (columns::USER_NAME, "Ann Lee"),
                (columns::PROFILE_URL_STATUS, "All Good"),
                (columns::SKILL_BADGE_COUNT, "12"),
                (columns::ARCADE_GAME_COUNT, "n/a"),
            ],
        )
    }

    #[test]
    fn test_accessors() {
        let record = sample();
        assert_eq!(record.index(), 3);
        assert_eq!(record.user_name(), Some("Ann Lee"));
        assert_eq!(record.profile_status(), Some(ProfileStatus::AllGood));
        assert_eq!(record.redemption_status(), None);
    }

    #[test]
    fn test_counts_pass_through_malformed_values() {
        let record = sample();
        assert_eq!(record.skill_badge_count(), Some(12));
        assert_eq!(record.arcade_game_count(), None);
        assert_eq!(record.get(columns::ARCADE_GAME_COUNT), Some("n/a"));
    }

    #[test]
    fn test_is_blank() {
        let blank = Record::from_pairs(0, &[("a", " "), ("b", "")]);
        assert!(blank.is_blank());
        assert!(!sample().is_blank());
    }
}
