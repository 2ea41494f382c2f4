//! Respondent models
//!
//! Raw records as loaded from the survey, derived records produced by the
//! derivation engine, and the categorical value types they use.

pub mod case_id;
pub mod categories;
pub mod derived;
pub mod respondent;

pub use case_id::CaseId;
pub use categories::{DifficultyLevel, NonVoteReason, Party, PresumedBasis};
pub use derived::{DerivedRespondent, VoterRecord};
pub use respondent::{ProblemFlags, RawRespondent};
