//! Voter filter
//!
//! Keeps respondents classified as voters (voted, or presumed voter) and drops
//! the transient `voter` classification from the kept rows.

use log::{info, warn};

use crate::filter::FilterCriteria;
use crate::models::derived::{DerivedRespondent, VoterRecord};

/// Keeps rows where `voter` is true
#[derive(Debug, Clone, Copy, Default)]
pub struct VoterFilter;

impl FilterCriteria<DerivedRespondent> for VoterFilter {
    fn meets_criteria(&self, entity: &DerivedRespondent) -> bool {
        entity.voter
    }
}

/// Result of running the voter filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOutcome {
    /// Kept rows, in input order
    pub retained: Vec<VoterRecord>,
    /// Number of rows removed
    pub excluded: usize,
    /// Kept rows whose voter difficulty level is missing
    pub missing_voter_difficulty: usize,
}

impl FilterOutcome {
    /// Whether no row survived
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.retained.is_empty()
    }
}

impl VoterFilter {
    /// Create the filter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Split derived respondents into kept voter records and a count of removed rows
    ///
    /// An empty result and kept voters without a difficulty level are logged as
    /// data-integrity warnings; neither stops the run.
    pub fn apply(&self, derived: Vec<DerivedRespondent>) -> FilterOutcome {
        let total = derived.len();
        let retained: Vec<VoterRecord> = derived
            .into_iter()
            .filter(|record| self.meets_criteria(record))
            .map(VoterRecord::from)
            .collect();
        let excluded = total - retained.len();
        let missing_voter_difficulty = retained
            .iter()
            .filter(|record| record.voter_difficulty_level.is_none())
            .count();

        info!(
            "Voter filter kept {} of {} respondents ({} excluded)",
            retained.len(),
            total,
            excluded
        );
        if retained.is_empty() {
            warn!("No respondents classified as voters out of {total} rows");
        }
        if missing_voter_difficulty > 0 {
            warn!(
                "{missing_voter_difficulty} retained voters have no voter difficulty level (difficulty question not answered)"
            );
        }

        FilterOutcome {
            retained,
            excluded,
            missing_voter_difficulty,
        }
    }
}
