//! Respondent identifier
//!
//! Survey extracts identify respondents either by a number or by a text code.
//! The loaded column decides which; the analytic table keeps the same kind.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of one respondent, unique across the survey
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CaseId {
    /// Numeric identifier (`Int64` column)
    Integer(i64),
    /// Text identifier (`Utf8` column)
    Text(String),
}

impl CaseId {
    /// The numeric identifier, if this is one
    #[must_use]
    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(id) => Some(*id),
            Self::Text(_) => None,
        }
    }

    /// The text identifier, if this is one
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Integer(_) => None,
            Self::Text(id) => Some(id),
        }
    }
}

impl From<i64> for CaseId {
    fn from(id: i64) -> Self {
        Self::Integer(id)
    }
}

impl From<i32> for CaseId {
    fn from(id: i32) -> Self {
        Self::Integer(i64::from(id))
    }
}

impl From<String> for CaseId {
    fn from(id: String) -> Self {
        Self::Text(id)
    }
}

impl From<&str> for CaseId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}

impl PartialEq<i64> for CaseId {
    fn eq(&self, other: &i64) -> bool {
        self.as_integer() == Some(*other)
    }
}

impl PartialEq<i32> for CaseId {
    fn eq(&self, other: &i32) -> bool {
        self.as_integer() == Some(i64::from(*other))
    }
}

impl PartialEq<&str> for CaseId {
    fn eq(&self, other: &&str) -> bool {
        self.as_text() == Some(*other)
    }
}

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(id) => write!(f, "{id}"),
            Self::Text(id) => write!(f, "{id}"),
        }
    }
}
