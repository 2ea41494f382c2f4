//! Derives the voter difficulty analytic dataset from a survey extract.
//!
//! Respondents are loaded from Parquet, recoded through priority-ordered rule
//! tables into party, turnout, difficulty and presumed-voter attributes,
//! filtered to voters, and written together with summary statistics of the
//! raw survey.

pub mod config;
pub mod derive;
pub mod error;
pub mod filter;
pub mod loader;
pub mod models;
pub mod pipeline;
pub mod schema;
pub mod statistics;
pub mod utils;
pub mod writer;

// Re-export the most common types for easier use
pub use config::PipelineConfig;
pub use error::{Result, SurveyError};
pub use models::{
    CaseId, DerivedRespondent, DifficultyLevel, NonVoteReason, Party, PresumedBasis, RawRespondent,
    VoterRecord,
};
pub use pipeline::{PipelineOutput, PipelineReport, run, run_with_progress, transform};
pub use statistics::{StatisticsCollector, SurveyStatistics};

// Arrow types
pub use arrow::record_batch::RecordBatch;
