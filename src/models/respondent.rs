//! Raw respondent record
//!
//! One row of the selected survey table, holding the coded source variables
//! exactly as they were loaded. Sentinels (negative codes) and nulls are kept
//! as-is; cleaning happens in the derivation engine.

use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::case_id::CaseId;
use crate::schema::adapt::required_column;
use crate::schema::columns::{CASE_ID, PROBLEM_FLAG_COUNT};
use crate::schema::{select_columns, source_schema};

/// The ordered voting problem indicators; index 10 is "no problems at all"
pub type ProblemFlags = [Option<i32>; PROBLEM_FLAG_COUNT];

/// Source variables of one respondent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRespondent {
    /// Unique respondent identifier
    pub case_id: CaseId,
    /// 7-point party identification summary
    pub party_identification_summary: Option<i32>,
    /// Turnout summary (0 did not vote, 1 voted)
    pub turnout_summary: Option<i32>,
    /// Difficulty of voting, 1-5
    pub difficulty_level_raw: Option<i32>,
    /// Voting problem indicators
    pub voting_problem_flags: ProblemFlags,
    /// Main reason for not voting, 1-16
    pub non_vote_reason_code: Option<i32>,
    /// Intended to register (1 = yes)
    pub intended_to_register_flag: Option<i32>,
}

impl RawRespondent {
    /// Create a respondent with every coded variable missing
    #[must_use]
    pub fn new(case_id: impl Into<CaseId>) -> Self {
        Self {
            case_id: case_id.into(),
            party_identification_summary: None,
            turnout_summary: None,
            difficulty_level_raw: None,
            voting_problem_flags: [None; PROBLEM_FLAG_COUNT],
            non_vote_reason_code: None,
            intended_to_register_flag: None,
        }
    }

    /// Read respondents from a loaded survey table
    ///
    /// Runs the column selector first, so schema violations surface here.
    pub fn from_batch(batch: &RecordBatch) -> Result<Vec<Self>> {
        let selected = select_columns(batch)?;
        Self::from_selected_batch(&selected)
    }

    /// Read respondents from a table that already has the source schema
    pub fn from_selected_batch(batch: &RecordBatch) -> Result<Vec<Self>> {
        match required_column(batch, CASE_ID)?.data_type() {
            DataType::Utf8 => read_rows::<String>(batch),
            _ => read_rows::<i64>(batch),
        }
    }

    /// Build a table with the source schema from respondents
    ///
    /// The `case_id` column is `Int64` when every identifier is numeric and
    /// `Utf8` otherwise.
    pub fn to_batch(respondents: &[Self]) -> Result<RecordBatch> {
        let numeric_ids: Option<Vec<i64>> = respondents
            .iter()
            .map(|raw| raw.case_id.as_integer())
            .collect();

        match numeric_ids {
            Some(ids) => {
                let rows: Vec<SourceRow<i64>> = respondents
                    .iter()
                    .zip(ids)
                    .map(|(raw, id)| SourceRow::new(raw, id))
                    .collect();
                write_rows(&DataType::Int64, &rows)
            }
            None => {
                let rows: Vec<SourceRow<String>> = respondents
                    .iter()
                    .map(|raw| SourceRow::new(raw, raw.case_id.to_string()))
                    .collect();
                write_rows(&DataType::Utf8, &rows)
            }
        }
    }
}

fn read_rows<Id>(batch: &RecordBatch) -> Result<Vec<RawRespondent>>
where
    Id: DeserializeOwned,
    CaseId: From<Id>,
{
    let rows: Vec<SourceRow<Id>> = serde_arrow::from_record_batch(batch)?;
    Ok(rows.into_iter().map(SourceRow::into_raw).collect())
}

fn write_rows<Id: Serialize>(case_id_type: &DataType, rows: &[SourceRow<Id>]) -> Result<RecordBatch> {
    Ok(serde_arrow::to_record_batch(
        source_schema(case_id_type).fields(),
        &rows,
    )?)
}

/// Flat row layout matching the source columns one-to-one
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SourceRow<Id> {
    case_id: Id,
    party_identification_summary: Option<i32>,
    turnout_summary: Option<i32>,
    difficulty_level_raw: Option<i32>,
    voting_problem_flag_1: Option<i32>,
    voting_problem_flag_2: Option<i32>,
    voting_problem_flag_3: Option<i32>,
    voting_problem_flag_4: Option<i32>,
    voting_problem_flag_5: Option<i32>,
    voting_problem_flag_6: Option<i32>,
    voting_problem_flag_7: Option<i32>,
    voting_problem_flag_8: Option<i32>,
    voting_problem_flag_9: Option<i32>,
    voting_problem_flag_10: Option<i32>,
    voting_problem_flag_11: Option<i32>,
    non_vote_reason_code: Option<i32>,
    intended_to_register_flag: Option<i32>,
}

impl<Id> SourceRow<Id> {
    fn new(raw: &RawRespondent, case_id: Id) -> Self {
        let [f1, f2, f3, f4, f5, f6, f7, f8, f9, f10, f11] = raw.voting_problem_flags;
        Self {
            case_id,
            party_identification_summary: raw.party_identification_summary,
            turnout_summary: raw.turnout_summary,
            difficulty_level_raw: raw.difficulty_level_raw,
            voting_problem_flag_1: f1,
            voting_problem_flag_2: f2,
            voting_problem_flag_3: f3,
            voting_problem_flag_4: f4,
            voting_problem_flag_5: f5,
            voting_problem_flag_6: f6,
            voting_problem_flag_7: f7,
            voting_problem_flag_8: f8,
            voting_problem_flag_9: f9,
            voting_problem_flag_10: f10,
            voting_problem_flag_11: f11,
            non_vote_reason_code: raw.non_vote_reason_code,
            intended_to_register_flag: raw.intended_to_register_flag,
        }
    }

    fn into_raw(self) -> RawRespondent
    where
        CaseId: From<Id>,
    {
        RawRespondent {
            case_id: CaseId::from(self.case_id),
            party_identification_summary: self.party_identification_summary,
            turnout_summary: self.turnout_summary,
            difficulty_level_raw: self.difficulty_level_raw,
            voting_problem_flags: [
                self.voting_problem_flag_1,
                self.voting_problem_flag_2,
                self.voting_problem_flag_3,
                self.voting_problem_flag_4,
                self.voting_problem_flag_5,
                self.voting_problem_flag_6,
                self.voting_problem_flag_7,
                self.voting_problem_flag_8,
                self.voting_problem_flag_9,
                self.voting_problem_flag_10,
                self.voting_problem_flag_11,
            ],
            non_vote_reason_code: self.non_vote_reason_code,
            intended_to_register_flag: self.intended_to_register_flag,
        }
    }
}
