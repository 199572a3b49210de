// ============================================================
// QUERY ENGINE
// ============================================================
// Recompute the active subset of a dataset under the current criteria

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::domain::report::{Dataset, FilterCriteria, Record};

/// Records of one dataset that match one set of criteria, in dataset order.
/// Replaced wholesale on every recomputation.
#[derive(Debug, Clone)]
pub struct ActiveSubset {
    dataset: Arc<Dataset>,
    positions: Vec<usize>,
}

impl ActiveSubset {
    pub fn empty() -> Self {
        Self {
            dataset: Arc::new(Dataset::empty()),
            positions: Vec::new(),
        }
    }

    /// Every record of `dataset`, unfiltered
    pub fn all(dataset: Arc<Dataset>) -> Self {
        let positions = (0..dataset.len()).collect();
        Self { dataset, positions }
    }

    pub fn dataset_id(&self) -> Uuid {
        self.dataset.id()
    }

    /// Dataset positions of the matching records, ascending
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    pub fn records(&self) -> impl Iterator<Item = &Record> + '_ {
        self.positions
            .iter()
            .filter_map(move |&position| self.dataset.get(position))
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl PartialEq for ActiveSubset {
    fn eq(&self, other: &Self) -> bool {
        self.dataset_id() == other.dataset_id() && self.positions == other.positions
    }
}

impl Eq for ActiveSubset {}

impl Serialize for ActiveSubset {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.records())
    }
}

/// Search term prepared once per recomputation
struct SearchNeedle(Option<String>);

impl SearchNeedle {
    fn new(term: &str) -> Self {
        if term.is_empty() {
            Self(None)
        } else {
            Self(Some(term.to_ascii_lowercase()))
        }
    }

    /// Case-insensitive substring test against the user name.
    /// A record without a user name never matches a non-empty term.
    fn matches(&self, record: &Record) -> bool {
        match &self.0 {
            None => true,
            Some(needle) => record
                .user_name()
                .map(|name| name.to_ascii_lowercase().contains(needle.as_str()))
                .unwrap_or(false),
        }
    }
}

/// Whether one record satisfies all four predicates
#[cfg(test)]
fn record_matches(record: &Record, criteria: &FilterCriteria) -> bool {
    SearchNeedle::new(&criteria.search_term).matches(record) && categorical_matches(record, criteria)
}

fn categorical_matches(record: &Record, criteria: &FilterCriteria) -> bool {
    criteria.profile_status.matches(record)
        && criteria
            .redemption_status
            .matches(record.redemption_status())
        && criteria
            .badges_completed
            .matches(record.all_badges_and_games_completed())
}

/// Single stable pass over the dataset. Predicates are applied as a
/// conjunction: search term, profile status, redemption, completion.
pub fn compute_active_subset(dataset: &Arc<Dataset>, criteria: &FilterCriteria) -> ActiveSubset {
    if criteria.is_match_all() {
        return ActiveSubset::all(Arc::clone(dataset));
    }

    let needle = SearchNeedle::new(&criteria.search_term);
    let positions = dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, record)| needle.matches(record) && categorical_matches(record, criteria))
        .map(|(position, _)| position)
        .collect();

    ActiveSubset {
        dataset: Arc::clone(dataset),
        positions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::report::{columns, FilterField, ProfileStatusFilter, YesNoFilter};

    fn participant(name: &str, status: &str, redeemed: &str, completed: &str) -> Record {
        Record::from_pairs(
            0,
            &[
                (columns::USER_NAME, name),
                (columns::PROFILE_URL_STATUS, status),
                (columns::REDEMPTION_STATUS, redeemed),
                (columns::ALL_COMPLETED, completed),
            ],
        )
    }

    fn scenario() -> Arc<Dataset> {
        Arc::new(
            Dataset::from_records(vec![
                participant("Ann", "AllGood", "Yes", "Yes"),
                participant("Bob", "WrongProfileUrl", "No", "No"),
            ])
            .unwrap(),
        )
    }

    fn larger() -> Arc<Dataset> {
        let wrong = "Wrong Google Cloud Skills Boost Public Profile URL";
        Arc::new(
            Dataset::from_records(vec![
                participant("Ann Lee", "All Good", "Yes", "Yes"),
                participant("bob ray", wrong, "No", "No"),
                participant("Annika", "All Good", "No", "Yes"),
                participant("Carl", "Pending", "Yes", "No"),
                participant("JOANNA", wrong, "Yes", "Yes"),
                participant("Dee", "All Good", "", ""),
            ])
            .unwrap(),
        )
    }

    fn names(subset: &ActiveSubset) -> Vec<&str> {
        subset.records().filter_map(|r| r.user_name()).collect()
    }

    #[test]
    fn test_match_all_keeps_everything_in_order() {
        let dataset = scenario();
        let subset = compute_active_subset(&dataset, &FilterCriteria::default());
        assert_eq!(names(&subset), ["Ann", "Bob"]);
    }

    #[test]
    fn test_profile_status_filter() {
        let dataset = scenario();
        let criteria = FilterCriteria {
            profile_status: ProfileStatusFilter::AllGood,
            ..FilterCriteria::default()
        };
        assert_eq!(names(&compute_active_subset(&dataset, &criteria)), ["Ann"]);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let dataset = scenario();
        let criteria = FilterCriteria {
            search_term: "bo".to_string(),
            ..FilterCriteria::default()
        };
        assert_eq!(names(&compute_active_subset(&dataset, &criteria)), ["Bob"]);

        let criteria = FilterCriteria {
            search_term: "ANN".to_string(),
            ..FilterCriteria::default()
        };
        assert_eq!(names(&compute_active_subset(&dataset, &criteria)), ["Ann"]);
    }

    #[test]
    fn test_missing_user_name_never_matches_search() {
        let dataset = Arc::new(
            Dataset::from_records(vec![Record::from_pairs(
                0,
                &[(columns::PROFILE_URL_STATUS, "All Good")],
            )])
            .unwrap(),
        );

        let criteria = FilterCriteria {
            search_term: "x".to_string(),
            ..FilterCriteria::default()
        };
        assert!(compute_active_subset(&dataset, &criteria).is_empty());
        assert_eq!(compute_active_subset(&dataset, &FilterCriteria::default()).len(), 1);
    }

    #[test]
    fn test_empty_dataset_yields_empty_subset() {
        let dataset = Arc::new(Dataset::empty());
        let criteria = FilterCriteria {
            search_term: "ann".to_string(),
            redemption_status: YesNoFilter::Yes,
            ..FilterCriteria::default()
        };
        assert!(compute_active_subset(&dataset, &criteria).is_empty());
        assert!(compute_active_subset(&dataset, &FilterCriteria::default()).is_empty());
    }

    #[test]
    fn test_recomputation_is_idempotent() {
        let dataset = larger();
        let criteria = FilterCriteria {
            search_term: "ann".to_string(),
            badges_completed: YesNoFilter::Yes,
            ..FilterCriteria::default()
        };

        let first = compute_active_subset(&dataset, &criteria);
        let second = compute_active_subset(&dataset, &criteria);
        assert_eq!(first, second);
        assert_eq!(names(&first), ["Ann Lee", "Annika", "JOANNA"]);
    }

    #[test]
    fn test_result_is_exact_conjunction_in_dataset_order() {
        let dataset = larger();
        let profile_options = ProfileStatusFilter::OPTIONS;
        let yes_no = YesNoFilter::OPTIONS;

        for term in ["", "an", "BOB", "zzz"] {
            for profile in profile_options {
                for redeemed in yes_no {
                    for completed in yes_no {
                        let criteria = FilterCriteria {
                            search_term: term.to_string(),
                            profile_status: profile,
                            redemption_status: redeemed,
                            badges_completed: completed,
                        };
                        let subset = compute_active_subset(&dataset, &criteria);

                        let expected: Vec<usize> = dataset
                            .records()
                            .iter()
                            .filter(|r| record_matches(r, &criteria))
                            .map(|r| r.index())
                            .collect();
                        assert_eq!(subset.positions(), expected.as_slice());
                        assert!(subset.positions().windows(2).all(|w| w[0] < w[1]));
                    }
                }
            }
        }
    }

    #[test]
    fn test_combined_filters() {
        let dataset = larger();
        let criteria = FilterCriteria::default()
            .with_filter(FilterField::ProfileStatus, "WrongProfileUrl")
            .unwrap()
            .with_filter(FilterField::RedemptionStatus, "Yes")
            .unwrap();
        assert_eq!(names(&compute_active_subset(&dataset, &criteria)), ["JOANNA"]);
    }

    #[test]
    fn test_subsets_from_different_loads_differ() {
        let a = compute_active_subset(&scenario(), &FilterCriteria::default());
        let b = compute_active_subset(&scenario(), &FilterCriteria::default());
        assert_ne!(a, b);
    }

    #[test]
    fn test_subset_serializes_as_record_list() {
        let dataset = scenario();
        let criteria = FilterCriteria {
            search_term: "bob".to_string(),
            ..FilterCriteria::default()
        };
        let json = serde_json::to_value(compute_active_subset(&dataset, &criteria)).unwrap();
        assert_eq!(json.as_array().map(|a| a.len()), Some(1));
    }
}
