// ============================================================
// FILTER PREDICATE SET
// ============================================================
// Owns the current criteria; every accepted change asks for one recomputation

use tracing::debug;

use crate::domain::error::Result;
use crate::domain::report::{FilterCriteria, FilterField};

/// Issued once per accepted criteria change
#[must_use = "a criteria change must be followed by a recomputation"]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecomputeRequest {
    pub generation: u64,
}

#[derive(Debug, Default)]
pub struct FilterPredicateSet {
    criteria: FilterCriteria,
    generation: u64,
}

impl FilterPredicateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Number of accepted changes so far
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) -> RecomputeRequest {
        let next = FilterCriteria {
            search_term: term.into(),
            ..self.criteria.clone()
        };
        self.replace(next)
    }

    /// Set a categorical filter by its surface name (`profileStatus`,
    /// `redemptionStatus`, `badgesCompleted`). Unknown names or values
    /// leave the criteria untouched.
    pub fn set_filter(&mut self, field_name: &str, value: &str) -> Result<RecomputeRequest> {
        let field: FilterField = field_name.parse()?;
        let next = self.criteria.with_filter(field, value)?;
        Ok(self.replace(next))
    }

    pub fn reset(&mut self) -> RecomputeRequest {
        self.replace(FilterCriteria::default())
    }

    fn replace(&mut self, next: FilterCriteria) -> RecomputeRequest {
        self.criteria = next;
        self.generation += 1;
        debug!(generation = self.generation, criteria = ?self.criteria, "Filter criteria changed");
        RecomputeRequest {
            generation: self.generation,
        }
    }
}
