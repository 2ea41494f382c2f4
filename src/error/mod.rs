//! Error handling for the voter difficulty pipeline.

pub mod util;

use std::io;
use std::path::PathBuf;

use arrow::error::ArrowError;
use parquet::errors::ParquetError;

use crate::models::case_id::CaseId;

/// Specialized error type for the survey pipeline
#[derive(Debug, thiserror::Error)]
pub enum SurveyError {
    /// Error opening, reading or writing a file
    #[error("IO error: {message}{}", path_suffix(.path))]
    Io {
        /// What was being attempted
        message: String,
        /// File or directory involved, if any
        path: Option<PathBuf>,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// Error reading or writing Parquet data
    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),

    /// Error building or transforming Arrow data
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Error mapping between records and Arrow batches
    #[error("Record conversion error: {0}")]
    RecordConversion(#[from] serde_arrow::Error),

    /// Error serializing the statistics bundle
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An expected variable is absent from the input
    #[error("Schema error: column '{column}' not found in survey data")]
    MissingColumn {
        /// Name of the absent column
        column: String,
    },

    /// A variable has a type that cannot hold numeric codes
    #[error("Schema error: column '{column}' has type {actual}, expected {expected}")]
    ColumnType {
        /// Column name
        column: String,
        /// Human-readable expected type
        expected: String,
        /// Actual Arrow type
        actual: String,
    },

    /// A case identifier is null
    #[error("Schema error: case_id is null at row {row}")]
    NullCaseId {
        /// Zero-based row index in the loaded table
        row: usize,
    },

    /// A case identifier occurs more than once
    #[error("Schema error: case_id {case_id} occurs more than once")]
    DuplicateCaseId {
        /// The repeated identifier
        case_id: CaseId,
    },

    /// A cleaned code has no label in its categorical table
    #[error("Code out of range: {field} = {code} for case_id {case_id} (valid codes {min}..={max})")]
    CodeOutOfRange {
        /// Derived field being encoded
        field: &'static str,
        /// Offending code
        code: i32,
        /// Respondent the code belongs to
        case_id: CaseId,
        /// Smallest valid code
        min: i32,
        /// Largest valid code
        max: i32,
    },

    /// A derived record breaks a cross-field invariant
    #[error("Integrity violation for case_id {case_id}: {message}")]
    IntegrityViolation {
        /// Respondent the violation was found on
        case_id: CaseId,
        /// Description of the broken rule
        message: String,
    },

    /// No respondent survived the voter filter and the run was configured to refuse that
    #[error("No respondents classified as voters out of {total} rows")]
    EmptyVoterSet {
        /// Number of rows that went into the filter
        total: usize,
    },
}

fn path_suffix(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" ({})", p.display()))
        .unwrap_or_default()
}

impl SurveyError {
    /// Create an IO error with a description of the attempted operation
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            message: message.into(),
            path: None,
            source,
        }
    }

    /// Attach a path to an IO error; other variants are returned unchanged
    #[must_use]
    pub fn with_path(self, path: impl Into<PathBuf>) -> Self {
        match self {
            Self::Io {
                message, source, ..
            } => Self::Io {
                message,
                path: Some(path.into()),
                source,
            },
            other => other,
        }
    }

    /// Whether the error stems from the shape of the input rather than from I/O
    #[must_use]
    pub const fn is_schema_violation(&self) -> bool {
        matches!(
            self,
            Self::MissingColumn { .. }
                | Self::ColumnType { .. }
                | Self::NullCaseId { .. }
                | Self::DuplicateCaseId { .. }
        )
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, SurveyError>;
