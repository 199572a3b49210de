// ============================================================
// REPORT SCHEMA
// ============================================================
// Header names of the progress report and the profile status labels

use serde::{Deserialize, Serialize};

/// Header text of every column the report knows about
pub mod columns {
    pub const USER_NAME: &str = "User Name";
    pub const PROFILE_URL: &str = "Google Cloud Skills Boost Profile URL";
    pub const PROFILE_URL_STATUS: &str = "Profile URL Status";
    pub const REDEMPTION_STATUS: &str = "Access Code Redemption Status";
    pub const ALL_COMPLETED: &str = "All Skill Badges & Games Completed";
    pub const SKILL_BADGE_COUNT: &str = "# of Skill Badges Completed";
    pub const SKILL_BADGE_NAMES: &str = "Names of Completed Skill Badges";
    pub const ARCADE_GAME_COUNT: &str = "# of Arcade Games Completed";
    pub const ARCADE_GAME_NAMES: &str = "Names of Completed Arcade Games";
}

/// Columns in the order the source report publishes them
pub const REPORT_COLUMNS: [&str; 9] = [
    columns::USER_NAME,
    columns::PROFILE_URL,
    columns::PROFILE_URL_STATUS,
    columns::REDEMPTION_STATUS,
    columns::ALL_COMPLETED,
    columns::SKILL_BADGE_COUNT,
    columns::SKILL_BADGE_NAMES,
    columns::ARCADE_GAME_COUNT,
    columns::ARCADE_GAME_NAMES,
];

/// Columns expected to hold a non-negative integer
pub const COUNT_COLUMNS: [&str; 2] = [columns::SKILL_BADGE_COUNT, columns::ARCADE_GAME_COUNT];

/// Known values of the profile URL status column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProfileStatus {
    AllGood,
    WrongProfileUrl,
}

impl ProfileStatus {
    pub const ALL: [ProfileStatus; 2] = [ProfileStatus::AllGood, ProfileStatus::WrongProfileUrl];

    /// Identifier used by the filter surface
    pub fn identifier(self) -> &'static str {
        match self {
            ProfileStatus::AllGood => "AllGood",
            ProfileStatus::WrongProfileUrl => "WrongProfileUrl",
        }
    }

    /// Label as written in the source report
    pub fn raw_label(self) -> &'static str {
        match self {
            ProfileStatus::AllGood => "All Good",
            ProfileStatus::WrongProfileUrl => "Wrong Google Cloud Skills Boost Public Profile URL",
        }
    }

    /// Classify a stored status string. Either the raw label or the
    /// identifier is accepted; anything else is an unknown status.
    pub fn from_raw(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|status| raw == status.raw_label() || raw == status.identifier())
    }

    /// Text shown in the status column for a stored value
    pub fn display_label(raw: &str) -> &str {
        match Self::from_raw(raw) {
            Some(ProfileStatus::WrongProfileUrl) => "Wrong",
            _ => raw,
        }
    }
}
