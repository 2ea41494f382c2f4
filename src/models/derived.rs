//! Derived respondent records
//!
//! [`DerivedRespondent`] is the raw record plus every derived attribute,
//! produced by the derivation engine. [`VoterRecord`] is what survives the voter
//! filter: the same data without the transient `voter` classification.

use serde::{Deserialize, Serialize};

use crate::models::case_id::CaseId;
use crate::models::categories::{DifficultyLevel, NonVoteReason, Party, PresumedBasis};
use crate::models::respondent::RawRespondent;

/// A respondent with all derived attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedRespondent {
    /// Source variables the attributes were derived from
    pub raw: RawRespondent,
    /// Democrat / Republican grouping; missing for independents and non-response
    pub party: Option<Party>,
    /// Whether the respondent voted; missing on non-response
    pub voted: Option<bool>,
    /// Reported difficulty of voting
    pub difficulty_level: Option<DifficultyLevel>,
    /// Whether a specific voting problem was mentioned
    pub problem_mentioned: Option<bool>,
    /// Non-voter whose reason indicates a thwarted attempt to vote
    pub presumed: bool,
    /// Rule that made the respondent a presumed voter
    pub presumed_basis: Option<PresumedBasis>,
    /// Main reason for not voting
    pub presumed_reason: Option<NonVoteReason>,
    /// Difficulty assigned to presumed voters
    pub presumed_difficulty_level: Option<DifficultyLevel>,
    /// Voted or presumed voter
    pub voter: bool,
    /// Difficulty used in the analysis: presumed difficulty or reported difficulty
    pub voter_difficulty_level: Option<DifficultyLevel>,
}

impl DerivedRespondent {
    /// The respondent identifier
    #[must_use]
    pub const fn case_id(&self) -> &CaseId {
        &self.raw.case_id
    }

    /// Whether the registration failure rule made this respondent a presumed voter
    #[must_use]
    pub fn is_registration_failure(&self) -> bool {
        self.presumed_basis == Some(PresumedBasis::RegistrationFailure)
    }
}

/// A row of the persisted analytic table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterRecord {
    pub raw: RawRespondent,
    pub party: Option<Party>,
    pub voter_difficulty_level: Option<DifficultyLevel>,
    pub voted: Option<bool>,
    pub difficulty_level: Option<DifficultyLevel>,
    pub problem_mentioned: Option<bool>,
    pub presumed: bool,
    pub presumed_reason: Option<NonVoteReason>,
    pub presumed_difficulty_level: Option<DifficultyLevel>,
}

impl VoterRecord {
    /// The respondent identifier
    #[must_use]
    pub const fn case_id(&self) -> &CaseId {
        &self.raw.case_id
    }
}

impl From<DerivedRespondent> for VoterRecord {
    fn from(derived: DerivedRespondent) -> Self {
        Self {
            raw: derived.raw,
            party: derived.party,
            voter_difficulty_level: derived.voter_difficulty_level,
            voted: derived.voted,
            difficulty_level: derived.difficulty_level,
            problem_mentioned: derived.problem_mentioned,
            presumed: derived.presumed,
            presumed_reason: derived.presumed_reason,
            presumed_difficulty_level: derived.presumed_difficulty_level,
        }
    }
}
