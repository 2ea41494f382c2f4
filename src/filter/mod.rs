//! Row filtering
//!
//! Filters decide per record whether it is kept. The voter filter is the only
//! inclusion gate of the analytic table.

pub mod voter;

pub use voter::{FilterOutcome, VoterFilter};

/// Defines a criterion for keeping a record
pub trait FilterCriteria<T> {
    /// Determine if an entity meets the filter criteria
    fn meets_criteria(&self, entity: &T) -> bool;
}
