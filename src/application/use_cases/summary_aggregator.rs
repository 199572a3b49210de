use crate::domain::report::{Dataset, ProfileStatus, SummaryStats};

/// Counts over the full dataset. `total_correct_participants` counts
/// records whose profile URL status is `AllGood`.
pub fn compute_summary(dataset: &Dataset) -> SummaryStats {
    let total_correct_participants = dataset
        .records()
        .iter()
        .filter(|record| record.profile_status() == Some(ProfileStatus::AllGood))
        .count();

    SummaryStats {
        total_participants: dataset.len(),
        total_correct_participants,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::report::{columns, Record};

    fn with_statuses(statuses: &[&str]) -> Dataset {
        Dataset::from_records(
            statuses
                .iter()
                .map(|status| Record::from_pairs(0, &[(columns::PROFILE_URL_STATUS, *status)]))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_empty_dataset() {
        assert_eq!(compute_summary(&Dataset::empty()), SummaryStats::default());
    }

    #[test]
    fn test_counts_all_good_only() {
        let dataset = with_statuses(&[
            "All Good",
            "Wrong Google Cloud Skills Boost Public Profile URL",
            "AllGood",
            "",
            "all good",
        ]);

        assert_eq!(
            compute_summary(&dataset),
            SummaryStats {
                total_participants: 5,
                total_correct_participants: 2,
            }
        );
    }
}
