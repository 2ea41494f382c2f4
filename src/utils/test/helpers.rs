//! Test helpers for survey tables

use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;

use crate::models::respondent::RawRespondent;

/// Builds a raw survey table from respondent fixtures
#[derive(Debug, Clone, Default)]
pub struct SurveyBatchBuilder {
    respondents: Vec<RawRespondent>,
    extra_columns: Vec<String>,
    dropped_columns: Vec<String>,
}

impl SurveyBatchBuilder {
    /// Create an empty builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a respondent
    #[must_use]
    pub fn push(mut self, respondent: impl Into<RawRespondent>) -> Self {
        self.respondents.push(respondent.into());
        self
    }

    /// Append several respondents
    #[must_use]
    pub fn extend(mut self, respondents: impl IntoIterator<Item = RawRespondent>) -> Self {
        self.respondents.extend(respondents);
        self
    }

    /// Add a text column the pipeline does not use
    #[must_use]
    pub fn with_extra_column(mut self, name: &str) -> Self {
        self.extra_columns.push(name.to_string());
        self
    }

    /// Leave a source column out of the table
    #[must_use]
    pub fn without_column(mut self, name: &str) -> Self {
        self.dropped_columns.push(name.to_string());
        self
    }

    /// Build the record batch
    ///
    /// # Panics
    /// Panics if the fixtures cannot be converted, which is a test bug.
    #[must_use]
    pub fn build(self) -> RecordBatch {
        let source = RawRespondent::to_batch(&self.respondents).expect("fixture batch");
        let schema = source.schema();

        let mut fields: Vec<Field> = Vec::new();
        let mut arrays: Vec<ArrayRef> = Vec::new();
        for (field, array) in schema.fields().iter().zip(source.columns()) {
            if self.dropped_columns.iter().any(|name| name == field.name()) {
                continue;
            }
            fields.push(field.as_ref().clone());
            arrays.push(array.clone());
        }
        for name in &self.extra_columns {
            fields.push(Field::new(name, DataType::Utf8, true));
            let values: StringArray = self.respondents.iter().map(|_| Some("web")).collect();
            arrays.push(Arc::new(values));
        }

        RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).expect("fixture batch")
    }
}

/// Write a batch to a Parquet file
///
/// # Panics
/// Panics on any write failure.
pub fn write_parquet(path: &Path, batch: &RecordBatch) {
    crate::writer::write_parquet(path, batch).expect("write fixture parquet");
}
