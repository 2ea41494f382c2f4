//! Derivation engine
//!
//! Computes every derived attribute of a respondent from its raw codes, in
//! dependency order: party, voted, difficulty level, problem mentioned,
//! presumed, presumed reason, presumed difficulty level, voter, voter
//! difficulty level. Each step is a rule table; later steps read the outputs of
//! earlier ones. The engine is a pure function of the raw record.

use std::ops::RangeInclusive;

use log::debug;

use crate::derive::encoder::{encode_difficulty, encode_reason};
use crate::derive::rules::{Rule, RuleTable};
use crate::error::{Result, SurveyError};
use crate::models::categories::{DifficultyLevel, NonVoteReason, Party, PresumedBasis};
use crate::models::derived::DerivedRespondent;
use crate::models::respondent::{ProblemFlags, RawRespondent};
use crate::schema::columns;

/// A raw survey code; `None` for null cells
pub type Code = Option<i32>;

/// Index of the "no problems at all" indicator
pub const NO_PROBLEMS_FLAG: usize = columns::PROBLEM_FLAG_COUNT - 1;

/// Reason codes equivalent to having had difficulty voting
/// (lacked correct id through absentee ballot problem)
pub const DIFFICULTY_EQUIVALENT_REASONS: RangeInclusive<i32> =
    NonVoteReason::LackedCorrectId.code()..=NonVoteReason::AbsenteeBallotProblem.code();

/// Whether a code is a sentinel or null
#[must_use]
pub const fn is_missing(code: Code) -> bool {
    match code {
        Some(c) => c < 0,
        None => true,
    }
}

/// Not registered, but intended to register
///
/// Shared by the `presumed` rule table and the standalone statistic.
#[must_use]
pub fn is_registration_failure(non_vote_reason_code: Code, intended_to_register_flag: Code) -> bool {
    non_vote_reason_code == Some(NonVoteReason::NotRegistered.code())
        && intended_to_register_flag == Some(1)
}

/// Reason codes feeding the `presumed` rules
#[derive(Debug, Clone, Copy)]
pub struct ReasonInput {
    pub non_vote_reason_code: Code,
    pub intended_to_register_flag: Code,
}

/// Inputs of the `voter` classification
#[derive(Debug, Clone, Copy)]
pub struct VoterInput {
    pub voted: Option<bool>,
    pub presumed: bool,
}

/// Inputs of `voter_difficulty_level`
#[derive(Debug, Clone, Copy)]
pub struct VoterDifficultyInput {
    pub presumed: bool,
    pub difficulty_level: Option<DifficultyLevel>,
    pub presumed_difficulty_level: Option<DifficultyLevel>,
}

static PARTY_RULES: [Rule<Code, Party>; 2] = [
    Rule {
        name: "democrat",
        predicate: |code| matches!(code, Some(1..=3)),
        value: |_| Party::Democrat,
    },
    Rule {
        name: "republican",
        predicate: |code| matches!(code, Some(5..=7)),
        value: |_| Party::Republican,
    },
];

/// Party from the 7-point scale; independents (4) are deliberately left missing
pub static PARTY: RuleTable<Code, Party> = RuleTable::new(columns::PARTY, &PARTY_RULES);

static VOTED_RULES: [Rule<Code, bool>; 2] = [
    Rule {
        name: "did_not_vote",
        predicate: |code| *code == Some(0),
        value: |_| false,
    },
    Rule {
        name: "voted",
        predicate: |code| *code == Some(1),
        value: |_| true,
    },
];

pub static VOTED: RuleTable<Code, bool> = RuleTable::new(columns::VOTED, &VOTED_RULES);

static VALID_CODE_RULES: [Rule<Code, i32>; 1] = [Rule {
    name: "valid_code",
    predicate: |code| !is_missing(*code),
    value: |code| code.unwrap_or_default(),
}];

/// Sentinel cleaning of the difficulty code
pub static DIFFICULTY_CODE: RuleTable<Code, i32> =
    RuleTable::new(columns::DIFFICULTY_LEVEL, &VALID_CODE_RULES);

/// Sentinel cleaning of the non-vote reason code
pub static REASON_CODE: RuleTable<Code, i32> =
    RuleTable::new(columns::PRESUMED_REASON, &VALID_CODE_RULES);

static PROBLEM_MENTIONED_RULES: [Rule<ProblemFlags, bool>; 2] = [
    Rule {
        name: "specific_problem",
        predicate: |flags| flags[..NO_PROBLEMS_FLAG].iter().any(|flag| *flag == Some(1)),
        value: |_| true,
    },
    Rule {
        name: "no_problems",
        predicate: |flags| flags[NO_PROBLEMS_FLAG] == Some(1),
        value: |_| false,
    },
];

/// A specific problem outranks an inconsistent "no problems" answer
pub static PROBLEM_MENTIONED: RuleTable<ProblemFlags, bool> =
    RuleTable::new(columns::PROBLEM_MENTIONED, &PROBLEM_MENTIONED_RULES);

static PRESUMED_RULES: [Rule<ReasonInput, PresumedBasis>; 2] = [
    Rule {
        name: "registration_failure",
        predicate: |input| {
            is_registration_failure(input.non_vote_reason_code, input.intended_to_register_flag)
        },
        value: |_| PresumedBasis::RegistrationFailure,
    },
    Rule {
        name: "difficulty_equivalent_reason",
        predicate: |input| {
            input
                .non_vote_reason_code
                .is_some_and(|code| DIFFICULTY_EQUIVALENT_REASONS.contains(&code))
        },
        value: |_| PresumedBasis::DifficultyEquivalentReason,
    },
];

/// Basis for a presumed voter; no match means "not presumed"
pub static PRESUMED: RuleTable<ReasonInput, PresumedBasis> =
    RuleTable::new(columns::PRESUMED, &PRESUMED_RULES);

static PRESUMED_DIFFICULTY_RULES: [Rule<bool, DifficultyLevel>; 1] = [Rule {
    name: "presumed",
    predicate: |presumed| *presumed,
    value: |_| DifficultyLevel::Extreme,
}];

pub static PRESUMED_DIFFICULTY_LEVEL: RuleTable<bool, DifficultyLevel> =
    RuleTable::new(columns::PRESUMED_DIFFICULTY_LEVEL, &PRESUMED_DIFFICULTY_RULES);

static VOTER_RULES: [Rule<VoterInput, bool>; 2] = [
    Rule {
        name: "voted",
        predicate: |input| input.voted == Some(true),
        value: |_| true,
    },
    Rule {
        name: "presumed",
        predicate: |input| input.presumed,
        value: |_| true,
    },
];

pub static VOTER: RuleTable<VoterInput, bool> = RuleTable::new(columns::VOTER, &VOTER_RULES);

static VOTER_DIFFICULTY_RULES: [Rule<VoterDifficultyInput, Option<DifficultyLevel>>; 2] = [
    Rule {
        name: "presumed",
        predicate: |input| input.presumed,
        value: |input| input.presumed_difficulty_level,
    },
    Rule {
        name: "reported",
        predicate: |_| true,
        value: |input| input.difficulty_level,
    },
];

pub static VOTER_DIFFICULTY_LEVEL: RuleTable<VoterDifficultyInput, Option<DifficultyLevel>> =
    RuleTable::new(columns::VOTER_DIFFICULTY_LEVEL, &VOTER_DIFFICULTY_RULES);

/// Derive every attribute of one respondent
pub fn derive(raw: &RawRespondent) -> Result<DerivedRespondent> {
    let case_id = &raw.case_id;

    let party = PARTY.evaluate(&raw.party_identification_summary);
    let voted = VOTED.evaluate(&raw.turnout_summary);
    let difficulty_level = DIFFICULTY_CODE
        .evaluate(&raw.difficulty_level_raw)
        .map(|code| encode_difficulty(columns::DIFFICULTY_LEVEL, code, case_id))
        .transpose()?;
    let problem_mentioned = PROBLEM_MENTIONED.evaluate(&raw.voting_problem_flags);

    let presumed_basis = PRESUMED.evaluate(&ReasonInput {
        non_vote_reason_code: raw.non_vote_reason_code,
        intended_to_register_flag: raw.intended_to_register_flag,
    });
    let presumed = presumed_basis.is_some();
    let presumed_reason = REASON_CODE
        .evaluate(&raw.non_vote_reason_code)
        .map(|code| encode_reason(columns::PRESUMED_REASON, code, case_id))
        .transpose()?;
    let presumed_difficulty_level = PRESUMED_DIFFICULTY_LEVEL.evaluate(&presumed);

    let voter = VOTER.evaluate_or(&VoterInput { voted, presumed }, false);
    let voter_difficulty_level = VOTER_DIFFICULTY_LEVEL
        .evaluate(&VoterDifficultyInput {
            presumed,
            difficulty_level,
            presumed_difficulty_level,
        })
        .flatten();

    Ok(DerivedRespondent {
        raw: raw.clone(),
        party,
        voted,
        difficulty_level,
        problem_mentioned,
        presumed,
        presumed_basis,
        presumed_reason,
        presumed_difficulty_level,
        voter,
        voter_difficulty_level,
    })
}

/// Check the cross-field invariants of a derived record
pub fn check_invariants(derived: &DerivedRespondent) -> Result<()> {
    let violation = |message: &str| SurveyError::IntegrityViolation {
        case_id: derived.case_id().clone(),
        message: message.to_string(),
    };

    if derived.presumed && derived.voted == Some(true) {
        return Err(violation(
            "respondent voted but also gave a presumed-voter reason for not voting",
        ));
    }
    if derived.presumed
        && (derived.presumed_difficulty_level != Some(DifficultyLevel::Extreme)
            || derived.voter_difficulty_level != Some(DifficultyLevel::Extreme))
    {
        return Err(violation("presumed voter without extreme difficulty"));
    }
    if derived.voter != (derived.voted == Some(true) || derived.presumed) {
        return Err(violation("voter classification disagrees with voted/presumed"));
    }
    Ok(())
}

/// Derive and check every respondent, keeping input order
pub fn derive_all(respondents: &[RawRespondent]) -> Result<Vec<DerivedRespondent>> {
    let derived = respondents
        .iter()
        .map(|raw| {
            let record = derive(raw)?;
            check_invariants(&record)?;
            Ok(record)
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(
        "Derived {} respondents: {} voted, {} presumed",
        derived.len(),
        derived.iter().filter(|d| d.voted == Some(true)).count(),
        derived.iter().filter(|d| d.presumed).count()
    );
    Ok(derived)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::case_id::CaseId;
    use crate::utils::test::respondent;

    fn derived(raw: impl Into<RawRespondent>) -> DerivedRespondent {
        derive(&raw.into()).unwrap()
    }

    #[test]
    fn test_party_ranges() {
        let party = |code| PARTY.evaluate(&Some(code));
        assert_eq!(party(1), Some(Party::Democrat));
        assert_eq!(party(3), Some(Party::Democrat));
        assert_eq!(party(4), None);
        assert_eq!(party(5), Some(Party::Republican));
        assert_eq!(party(7), Some(Party::Republican));
        assert_eq!(party(-8), None);
        assert_eq!(PARTY.evaluate(&None), None);
    }

    #[test]
    fn test_voted_sentinel_is_missing() {
        assert_eq!(VOTED.evaluate(&Some(0)), Some(false));
        assert_eq!(VOTED.evaluate(&Some(1)), Some(true));
        assert_eq!(VOTED.evaluate(&Some(-9)), None);
    }

    #[test]
    fn test_problem_mentioned_priority() {
        let mut flags: ProblemFlags = [Some(0); columns::PROBLEM_FLAG_COUNT];
        assert_eq!(PROBLEM_MENTIONED.evaluate(&flags), None);

        flags[NO_PROBLEMS_FLAG] = Some(1);
        assert_eq!(PROBLEM_MENTIONED.evaluate(&flags), Some(false));

        // Inconsistent row: a specific problem wins over "no problems"
        flags[3] = Some(1);
        assert_eq!(PROBLEM_MENTIONED.evaluate(&flags), Some(true));

        let sentinels: ProblemFlags = [Some(-1); columns::PROBLEM_FLAG_COUNT];
        assert_eq!(PROBLEM_MENTIONED.evaluate(&sentinels), None);
    }

    #[test]
    fn test_voter_with_reported_difficulty() {
        let d = derived(respondent(1).voted(3));
        assert_eq!(d.voted, Some(true));
        assert!(!d.presumed);
        assert!(d.voter);
        assert_eq!(d.difficulty_level, Some(DifficultyLevel::Moderate));
        assert_eq!(d.voter_difficulty_level, Some(DifficultyLevel::Moderate));
        assert_eq!(d.presumed_difficulty_level, None);
        assert_eq!(d.presumed_reason, None);
    }

    #[test]
    fn test_registration_failure_is_presumed() {
        let d = derived(respondent(2).not_registered_intending());
        assert_eq!(d.voted, Some(false));
        assert!(d.presumed);
        assert!(d.is_registration_failure());
        assert!(d.voter);
        assert_eq!(d.presumed_reason, Some(NonVoteReason::NotRegistered));
        assert_eq!(d.presumed_difficulty_level, Some(DifficultyLevel::Extreme));
        assert_eq!(d.voter_difficulty_level, Some(DifficultyLevel::Extreme));
    }

    #[test]
    fn test_not_registered_without_intent_is_not_presumed() {
        let d = derived(respondent(3).did_not_vote(5).intending_to_register(2));
        assert!(!d.presumed);
        assert!(!d.voter);
        assert_eq!(d.presumed_reason, Some(NonVoteReason::NotRegistered));
    }

    #[test]
    fn test_difficulty_equivalent_reasons() {
        for code in 1..=16 {
            let d = derived(respondent(10).did_not_vote(code));
            let expected = (6..=13).contains(&code);
            assert_eq!(d.presumed, expected, "reason code {code}");
            assert_eq!(
                d.presumed_basis,
                expected.then_some(PresumedBasis::DifficultyEquivalentReason)
            );
        }
    }

    #[test]
    fn test_forgot_is_excluded() {
        let d = derived(respondent(4).forgot());
        assert!(!d.presumed);
        assert!(!d.voter);
        assert_eq!(d.presumed_reason, Some(NonVoteReason::Forgot));
        assert_eq!(d.voter_difficulty_level, None);
    }

    #[test]
    fn test_nonresponse_is_missing_not_false() {
        let d = derived(respondent(5).nonresponse());
        assert_eq!(d.voted, None);
        assert_eq!(d.party, None);
        assert_eq!(d.difficulty_level, None);
        assert_eq!(d.problem_mentioned, None);
        assert_eq!(d.presumed_reason, None);
        assert!(!d.presumed);
        assert!(!d.voter);
    }

    #[test]
    fn test_out_of_range_difficulty_is_fatal() {
        let mut raw: RawRespondent = respondent(6).voted(1).into();
        raw.difficulty_level_raw = Some(7);
        assert!(matches!(
            derive(&raw),
            Err(SurveyError::CodeOutOfRange {
                field: "difficulty_level",
                code: 7,
                case_id: CaseId::Integer(6),
                ..
            })
        ));
    }

    #[test]
    fn test_out_of_range_reason_is_fatal() {
        let raw: RawRespondent = respondent(8).did_not_vote(17).into();
        assert!(matches!(
            derive(&raw),
            Err(SurveyError::CodeOutOfRange {
                field: "presumed_reason",
                ..
            })
        ));
    }

    #[test]
    fn test_voted_and_presumed_is_integrity_violation() {
        let mut raw: RawRespondent = respondent(9).voted(2).into();
        raw.non_vote_reason_code = Some(9);
        let err = derive_all(&[raw]).unwrap_err();
        assert!(matches!(
            err,
            SurveyError::IntegrityViolation { case_id: CaseId::Integer(9), .. }
        ));
    }

    #[test]
    fn test_derive_is_deterministic() {
        let raw: RawRespondent = respondent(11).not_registered_intending().into();
        assert_eq!(derive(&raw).unwrap(), derive(&raw).unwrap());
    }
}
