// ============================================================
// FILTER CRITERIA
// ============================================================
// Search text plus categorical selections chosen by the user

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::record::Record;
use super::schema::ProfileStatus;
use crate::domain::error::AppError;

/// Selection for the profile status filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProfileStatusFilter {
    #[default]
    All,
    AllGood,
    WrongProfileUrl,
}

impl ProfileStatusFilter {
    pub const OPTIONS: [ProfileStatusFilter; 3] = [
        ProfileStatusFilter::All,
        ProfileStatusFilter::AllGood,
        ProfileStatusFilter::WrongProfileUrl,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProfileStatusFilter::All => "All",
            ProfileStatusFilter::AllGood => ProfileStatus::AllGood.identifier(),
            ProfileStatusFilter::WrongProfileUrl => ProfileStatus::WrongProfileUrl.identifier(),
        }
    }

    fn status(self) -> Option<ProfileStatus> {
        match self {
            ProfileStatusFilter::All => None,
            ProfileStatusFilter::AllGood => Some(ProfileStatus::AllGood),
            ProfileStatusFilter::WrongProfileUrl => Some(ProfileStatus::WrongProfileUrl),
        }
    }

    pub fn is_all(self) -> bool {
        self == ProfileStatusFilter::All
    }

    pub fn matches(self, record: &Record) -> bool {
        match self.status() {
            None => true,
            Some(wanted) => record.profile_status() == Some(wanted),
        }
    }
}

impl FromStr for ProfileStatusFilter {
    type Err = AppError;

    /// Accepts the filter identifiers and, for convenience, the raw labels
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "All" {
            return Ok(ProfileStatusFilter::All);
        }
        match ProfileStatus::from_raw(s) {
            Some(ProfileStatus::AllGood) => Ok(ProfileStatusFilter::AllGood),
            Some(ProfileStatus::WrongProfileUrl) => Ok(ProfileStatusFilter::WrongProfileUrl),
            None => Err(AppError::ValidationError(format!(
                "Unknown profile status '{}', expected one of All, AllGood, WrongProfileUrl",
                s
            ))),
        }
    }
}

impl fmt::Display for ProfileStatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Selection for the Yes/No columns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum YesNoFilter {
    #[default]
    All,
    Yes,
    No,
}

impl YesNoFilter {
    pub const OPTIONS: [YesNoFilter; 3] = [YesNoFilter::All, YesNoFilter::Yes, YesNoFilter::No];

    pub fn as_str(self) -> &'static str {
        match self {
            YesNoFilter::All => "All",
            YesNoFilter::Yes => "Yes",
            YesNoFilter::No => "No",
        }
    }

    pub fn is_all(self) -> bool {
        self == YesNoFilter::All
    }

    /// Exact comparison against the stored value; an absent column never matches
    pub fn matches(self, value: Option<&str>) -> bool {
        match self {
            YesNoFilter::All => true,
            _ => value == Some(self.as_str()),
        }
    }
}

impl FromStr for YesNoFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "All" => Ok(YesNoFilter::All),
            "Yes" => Ok(YesNoFilter::Yes),
            "No" => Ok(YesNoFilter::No),
            other => Err(AppError::ValidationError(format!(
                "Unknown value '{}', expected one of All, Yes, No",
                other
            ))),
        }
    }
}

impl fmt::Display for YesNoFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Categorical filters addressable by name from the control surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterField {
    ProfileStatus,
    RedemptionStatus,
    BadgesCompleted,
}

impl FilterField {
    pub const ALL: [FilterField; 3] = [
        FilterField::ProfileStatus,
        FilterField::RedemptionStatus,
        FilterField::BadgesCompleted,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FilterField::ProfileStatus => "profileStatus",
            FilterField::RedemptionStatus => "redemptionStatus",
            FilterField::BadgesCompleted => "badgesCompleted",
        }
    }

    /// Options offered for this field, `All` first
    pub fn options(self) -> Vec<&'static str> {
        match self {
            FilterField::ProfileStatus => ProfileStatusFilter::OPTIONS
                .iter()
                .map(|o| o.as_str())
                .collect(),
            FilterField::RedemptionStatus | FilterField::BadgesCompleted => {
                YesNoFilter::OPTIONS.iter().map(|o| o.as_str()).collect()
            }
        }
    }
}

impl FromStr for FilterField {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterField::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| {
                AppError::ValidationError(format!(
                    "Unknown filter '{}', expected one of profileStatus, redemptionStatus, badgesCompleted",
                    s
                ))
            })
    }
}

/// The complete search and filter configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    pub search_term: String,
    pub profile_status: ProfileStatusFilter,
    pub redemption_status: YesNoFilter,
    pub badges_completed: YesNoFilter,
}

impl FilterCriteria {
    /// True when no predicate narrows the dataset
    pub fn is_match_all(&self) -> bool {
        self.search_term.is_empty()
            && self.profile_status.is_all()
            && self.redemption_status.is_all()
            && self.badges_completed.is_all()
    }

    /// Current value of a categorical filter as its option text
    pub fn value_of(&self, field: FilterField) -> &'static str {
        match field {
            FilterField::ProfileStatus => self.profile_status.as_str(),
            FilterField::RedemptionStatus => self.redemption_status.as_str(),
            FilterField::BadgesCompleted => self.badges_completed.as_str(),
        }
    }

    /// Copy of these criteria with one categorical filter replaced.
    /// The value is validated before anything changes.
    pub fn with_filter(&self, field: FilterField, value: &str) -> Result<Self, AppError> {
        let mut next = self.clone();
        match field {
            FilterField::ProfileStatus => next.profile_status = value.parse()?,
            FilterField::RedemptionStatus => next.redemption_status = value.parse()?,
            FilterField::BadgesCompleted => next.badges_completed = value.parse()?,
        }
        Ok(next)
    }
}
