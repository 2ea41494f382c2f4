//! Test utilities
//!
//! Fixture builders shared by unit and integration tests.

pub mod helpers;

pub use fixtures::{INAPPLICABLE, RespondentFixture, respondent};
pub use helpers::{SurveyBatchBuilder, write_parquet};
