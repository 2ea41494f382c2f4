//! Survey statistics
//!
//! Aggregates computed on the raw survey table, before column selection,
//! derivation and filtering. They are informational outputs and never feed
//! back into the pipeline.

pub mod frequency;

use arrow::record_batch::RecordBatch;
use itertools::izip;
use serde::{Deserialize, Serialize};

use crate::derive::is_registration_failure;
use crate::error::Result;
use crate::schema::code_values;
use crate::schema::columns::{
    INTENDED_TO_REGISTER_FLAG, NON_VOTE_REASON_CODE, PARTY_IDENTIFICATION_SUMMARY,
    TURNOUT_SUMMARY,
};
pub use frequency::{FrequencyEntry, FrequencyTable};
use frequency::{non_vote_reason_label, party_identification_label, turnout_label};

/// Name of the respondent count
pub const TOTAL_RESPONDENTS: &str = "total_respondents";
/// Name of the party identification frequency table
pub const PARTY_IDENTIFICATION_FREQUENCY: &str = "party_identification_frequency";
/// Name of the turnout frequency table
pub const TURNOUT_FREQUENCY: &str = "turnout_frequency";
/// Name of the non-vote reason frequency table
pub const NON_VOTE_REASON_FREQUENCY: &str = "non_vote_reason_frequency";
/// Name of the registration failure count
pub const REGISTRATION_FAILURE_COUNT: &str = "registration_failure_count";

/// Names of every statistic in the bundle, in bundle order
pub const STATISTIC_NAMES: [&str; 5] = [
    TOTAL_RESPONDENTS,
    PARTY_IDENTIFICATION_FREQUENCY,
    TURNOUT_FREQUENCY,
    NON_VOTE_REASON_FREQUENCY,
    REGISTRATION_FAILURE_COUNT,
];

/// A single statistic retrieved by name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statistic<'a> {
    /// A respondent count
    Count(usize),
    /// A frequency table
    Frequency(&'a FrequencyTable),
}

/// The statistics bundle; serializes to a JSON object keyed by statistic name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyStatistics {
    /// Rows in the raw table
    pub total_respondents: usize,
    /// Raw party identification codes, including non-response
    pub party_identification_frequency: FrequencyTable,
    /// Raw turnout codes
    pub turnout_frequency: FrequencyTable,
    /// Raw non-vote reason codes
    pub non_vote_reason_frequency: FrequencyTable,
    /// Respondents not registered but intending to register
    pub registration_failure_count: usize,
}

impl SurveyStatistics {
    /// Retrieve a statistic by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Statistic<'_>> {
        match name {
            TOTAL_RESPONDENTS => Some(Statistic::Count(self.total_respondents)),
            PARTY_IDENTIFICATION_FREQUENCY => {
                Some(Statistic::Frequency(&self.party_identification_frequency))
            }
            TURNOUT_FREQUENCY => Some(Statistic::Frequency(&self.turnout_frequency)),
            NON_VOTE_REASON_FREQUENCY => Some(Statistic::Frequency(&self.non_vote_reason_frequency)),
            REGISTRATION_FAILURE_COUNT => Some(Statistic::Count(self.registration_failure_count)),
            _ => None,
        }
    }

    /// Render a human-readable summary
    #[must_use]
    pub fn generate_summary(&self) -> String {
        let mut summary = String::new();
        summary.push_str("Survey Statistics:\n");
        summary.push_str(&format!("  Total Respondents: {}\n", self.total_respondents));
        summary.push_str(&format!(
            "  Registration Failures (not registered, intended to): {}\n",
            self.registration_failure_count
        ));

        for table in [
            &self.party_identification_frequency,
            &self.turnout_frequency,
            &self.non_vote_reason_frequency,
        ] {
            summary.push_str(&format!("\n{}:\n", table.variable));
            for entry in &table.entries {
                let code = entry
                    .code
                    .map_or_else(|| "NA".to_string(), |code| code.to_string());
                let label = entry.label.as_deref().unwrap_or("unlabelled");
                let percentage = if self.total_respondents > 0 {
                    (entry.count as f64 / self.total_respondents as f64) * 100.0
                } else {
                    0.0
                };
                summary.push_str(&format!(
                    "  {code:>4} {label}: {} ({percentage:.1}%)\n",
                    entry.count
                ));
            }
        }

        summary
    }
}

/// Functions computing the statistics bundle
pub struct StatisticsCollector;

impl StatisticsCollector {
    /// Compute every statistic over the raw survey table
    ///
    /// Reads only the columns it needs; a missing or non-numeric one is a schema
    /// error.
    pub fn collect(batch: &RecordBatch) -> Result<SurveyStatistics> {
        let party = code_values(batch, PARTY_IDENTIFICATION_SUMMARY)?;
        let turnout = code_values(batch, TURNOUT_SUMMARY)?;
        let reasons = code_values(batch, NON_VOTE_REASON_CODE)?;
        let intents = code_values(batch, INTENDED_TO_REGISTER_FLAG)?;

        let registration_failure_count = Self::registration_failures(&reasons, &intents);

        Ok(SurveyStatistics {
            total_respondents: batch.num_rows(),
            party_identification_frequency: FrequencyTable::tabulate(
                PARTY_IDENTIFICATION_SUMMARY,
                party,
                party_identification_label,
            ),
            turnout_frequency: FrequencyTable::tabulate(TURNOUT_SUMMARY, turnout, turnout_label),
            non_vote_reason_frequency: FrequencyTable::tabulate(
                NON_VOTE_REASON_CODE,
                reasons,
                non_vote_reason_label,
            ),
            registration_failure_count,
        })
    }

    /// Count rows that are not registered but intended to register
    #[must_use]
    pub fn registration_failures(reasons: &[Option<i32>], intents: &[Option<i32>]) -> usize {
        izip!(reasons, intents)
            .filter(|&(reason, intent)| is_registration_failure(*reason, *intent))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test::{SurveyBatchBuilder, respondent};

    fn sample_batch() -> RecordBatch {
        SurveyBatchBuilder::new()
            .push(respondent(1).voted(1).party(1))
            .push(respondent(2).voted(4).party(7))
            .push(respondent(3).not_registered_intending().party(4))
            .push(respondent(4).did_not_vote(5).intending_to_register(2))
            .push(respondent(5).forgot().party(-8))
            .push(respondent(6).nonresponse())
            .build()
    }

    #[test]
    fn test_collect_counts() {
        let stats = StatisticsCollector::collect(&sample_batch()).unwrap();
        assert_eq!(stats.total_respondents, 6);
        assert_eq!(stats.registration_failure_count, 1);

        assert_eq!(stats.turnout_frequency.count_of(Some(1)), 2);
        assert_eq!(stats.turnout_frequency.count_of(Some(0)), 3);
        assert_eq!(stats.turnout_frequency.count_of(Some(-1)), 1);

        assert_eq!(stats.non_vote_reason_frequency.count_of(Some(5)), 2);
        assert_eq!(stats.non_vote_reason_frequency.count_of(Some(1)), 1);
        assert_eq!(stats.party_identification_frequency.count_of(Some(4)), 1);
        assert_eq!(stats.party_identification_frequency.count_of(Some(-8)), 1);
    }

    #[test]
    fn test_get_by_name() {
        let stats = StatisticsCollector::collect(&sample_batch()).unwrap();
        for name in STATISTIC_NAMES {
            assert!(stats.get(name).is_some(), "statistic {name}");
        }
        assert_eq!(stats.get(TOTAL_RESPONDENTS), Some(Statistic::Count(6)));
        assert_eq!(
            stats.get(TURNOUT_FREQUENCY),
            Some(Statistic::Frequency(&stats.turnout_frequency))
        );
        assert_eq!(stats.get("median_age"), None);
    }

    #[test]
    fn test_json_keys_are_statistic_names() {
        let stats = StatisticsCollector::collect(&sample_batch()).unwrap();
        let value = serde_json::to_value(&stats).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), STATISTIC_NAMES.len());
        for name in STATISTIC_NAMES {
            assert!(object.contains_key(name), "missing key {name}");
        }
    }

    #[test]
    fn test_summary_mentions_counts() {
        let stats = StatisticsCollector::collect(&sample_batch()).unwrap();
        let summary = stats.generate_summary();
        assert!(summary.contains("Total Respondents: 6"));
        assert!(summary.contains("not registered"));
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let batch = SurveyBatchBuilder::new()
            .without_column(TURNOUT_SUMMARY)
            .push(respondent(1).voted(1))
            .build();
        assert!(StatisticsCollector::collect(&batch).is_err());
    }
}
