//! Frequency tables of raw survey codes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::categories::NonVoteReason;

/// Count of one code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyEntry {
    /// Raw code; `None` for null cells
    pub code: Option<i32>,
    /// Codebook label of the code, when known
    pub label: Option<String>,
    /// Number of respondents with this code
    pub count: usize,
}

/// Frequencies of every code present in one variable, ordered by code with nulls first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyTable {
    /// Source variable
    pub variable: String,
    /// One entry per distinct code
    pub entries: Vec<FrequencyEntry>,
}

impl FrequencyTable {
    /// Tabulate `values`, labelling codes with `label`
    pub fn tabulate(
        variable: &str,
        values: impl IntoIterator<Item = Option<i32>>,
        label: fn(i32) -> Option<&'static str>,
    ) -> Self {
        let mut counts: BTreeMap<Option<i32>, usize> = BTreeMap::new();
        for value in values {
            *counts.entry(value).or_insert(0) += 1;
        }

        let entries = counts
            .into_iter()
            .map(|(code, count)| FrequencyEntry {
                code,
                label: code.map_or(Some("missing"), label).map(str::to_string),
                count,
            })
            .collect();

        Self {
            variable: variable.to_string(),
            entries,
        }
    }

    /// Count for a code (zero when absent)
    #[must_use]
    pub fn count_of(&self, code: Option<i32>) -> usize {
        self.entries
            .iter()
            .find(|entry| entry.code == code)
            .map_or(0, |entry| entry.count)
    }

    /// Sum of all counts
    #[must_use]
    pub fn total(&self) -> usize {
        self.entries.iter().map(|entry| entry.count).sum()
    }

    /// Respondents with a sentinel or null code
    #[must_use]
    pub fn nonresponse(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.code.is_none_or(|code| code < 0))
            .map(|entry| entry.count)
            .sum()
    }
}

fn sentinel_label(code: i32) -> Option<&'static str> {
    (code < 0).then_some("non-response")
}

/// Codebook labels of the 7-point party identification scale
#[must_use]
pub fn party_identification_label(code: i32) -> Option<&'static str> {
    match code {
        1 => Some("strong Democrat"),
        2 => Some("not very strong Democrat"),
        3 => Some("independent-Democrat"),
        4 => Some("independent"),
        5 => Some("independent-Republican"),
        6 => Some("not very strong Republican"),
        7 => Some("strong Republican"),
        _ => sentinel_label(code),
    }
}

/// Codebook labels of the turnout summary
#[must_use]
pub fn turnout_label(code: i32) -> Option<&'static str> {
    match code {
        0 => Some("did not vote"),
        1 => Some("voted"),
        _ => sentinel_label(code),
    }
}

/// Codebook labels of the non-vote reason
#[must_use]
pub fn non_vote_reason_label(code: i32) -> Option<&'static str> {
    NonVoteReason::from_code(code)
        .map(NonVoteReason::label)
        .or_else(|| sentinel_label(code))
}
