use serde::{Deserialize, Serialize};

/// Aggregate counts over the full dataset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    pub total_participants: usize,
    pub total_correct_participants: usize,
}
