//! Column names of the survey extract and the analytic table.

/// Respondent identifier
pub const CASE_ID: &str = "case_id";
/// 7-point party identification summary
pub const PARTY_IDENTIFICATION_SUMMARY: &str = "party_identification_summary";
/// Turnout summary (0 did not vote, 1 voted)
pub const TURNOUT_SUMMARY: &str = "turnout_summary";
/// Self-reported difficulty of voting, 1-5
pub const DIFFICULTY_LEVEL_RAW: &str = "difficulty_level_raw";
/// Main reason for not voting, 1-16
pub const NON_VOTE_REASON_CODE: &str = "non_vote_reason_code";
/// Whether a non-registered respondent intended to register
pub const INTENDED_TO_REGISTER_FLAG: &str = "intended_to_register_flag";

/// Number of voting problem indicators
pub const PROBLEM_FLAG_COUNT: usize = 11;

/// Voting problem indicators; the last one means "no problems at all"
pub const VOTING_PROBLEM_FLAGS: [&str; PROBLEM_FLAG_COUNT] = [
    "voting_problem_flag_1",
    "voting_problem_flag_2",
    "voting_problem_flag_3",
    "voting_problem_flag_4",
    "voting_problem_flag_5",
    "voting_problem_flag_6",
    "voting_problem_flag_7",
    "voting_problem_flag_8",
    "voting_problem_flag_9",
    "voting_problem_flag_10",
    "voting_problem_flag_11",
];

// Derived columns
pub const PARTY: &str = "party";
pub const VOTED: &str = "voted";
pub const DIFFICULTY_LEVEL: &str = "difficulty_level";
pub const PROBLEM_MENTIONED: &str = "problem_mentioned";
pub const PRESUMED: &str = "presumed";
pub const PRESUMED_REASON: &str = "presumed_reason";
pub const PRESUMED_DIFFICULTY_LEVEL: &str = "presumed_difficulty_level";
pub const VOTER: &str = "voter";
pub const VOTER_DIFFICULTY_LEVEL: &str = "voter_difficulty_level";

/// Coded (numeric) source columns, excluding the case identifier
#[must_use]
pub fn code_columns() -> Vec<&'static str> {
    let mut columns = vec![
        PARTY_IDENTIFICATION_SUMMARY,
        TURNOUT_SUMMARY,
        DIFFICULTY_LEVEL_RAW,
    ];
    columns.extend(VOTING_PROBLEM_FLAGS);
    columns.extend([NON_VOTE_REASON_CODE, INTENDED_TO_REGISTER_FLAG]);
    columns
}

/// Every column the selector keeps, in table order
#[must_use]
pub fn source_columns() -> Vec<&'static str> {
    let mut columns = vec![CASE_ID];
    columns.extend(code_columns());
    columns
}

/// Derived columns of the analytic table, in table order
pub const DERIVED_OUTPUT_COLUMNS: [&str; 8] = [
    PARTY,
    VOTER_DIFFICULTY_LEVEL,
    VOTED,
    DIFFICULTY_LEVEL,
    PROBLEM_MENTIONED,
    PRESUMED,
    PRESUMED_REASON,
    PRESUMED_DIFFICULTY_LEVEL,
];

/// Columns of the persisted analytic table, in order
#[must_use]
pub fn output_columns() -> Vec<&'static str> {
    let mut columns = vec![CASE_ID];
    columns.extend(DERIVED_OUTPUT_COLUMNS);
    columns.extend(code_columns());
    columns
}
