//! Artifact writing
//!
//! The analytic table goes to Parquet with categorical columns stored as
//! dictionaries; the statistics bundle goes to pretty-printed JSON. Neither
//! output carries timestamps or other run-dependent data, so identical input
//! produces identical files.

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;

use crate::config::PipelineConfig;
use crate::derive::encoder::{categorical_field, dictionary_column};
use crate::error::util::{ensure_directory, safe_create_file};
use crate::error::{Result, SurveyError};
use crate::models::categories::{DifficultyLevel, NonVoteReason, Party};
use crate::models::derived::VoterRecord;
use crate::models::respondent::RawRespondent;
use crate::schema::adapt::required_column;
use crate::schema::columns::{self, CASE_ID, code_columns, output_columns};
use crate::statistics::SurveyStatistics;
use crate::utils::logging::log_operation_complete;

/// Arrow schema of the analytic table
///
/// `case_id_type` is `Int64` for numeric identifiers and `Utf8` for text ones.
#[must_use]
pub fn voter_table_schema(case_id_type: &DataType) -> SchemaRef {
    let fields: Vec<Field> = output_columns()
        .into_iter()
        .map(|name| match name {
            CASE_ID => Field::new(name, case_id_type.clone(), false),
            columns::PARTY => categorical_field::<Party>(name),
            columns::VOTER_DIFFICULTY_LEVEL
            | columns::DIFFICULTY_LEVEL
            | columns::PRESUMED_DIFFICULTY_LEVEL => categorical_field::<DifficultyLevel>(name),
            columns::PRESUMED_REASON => categorical_field::<NonVoteReason>(name),
            columns::VOTED | columns::PROBLEM_MENTIONED => Field::new(name, DataType::Boolean, true),
            columns::PRESUMED => Field::new(name, DataType::Boolean, false),
            _ => Field::new(name, DataType::Int32, true),
        })
        .collect();
    Arc::new(Schema::new(fields))
}

/// Build the analytic table from voter records
pub fn voter_table(records: &[VoterRecord]) -> Result<RecordBatch> {
    let raws: Vec<RawRespondent> = records.iter().map(|r| r.raw.clone()).collect();
    let raw_batch = RawRespondent::to_batch(&raws)?;

    let case_ids = required_column(&raw_batch, CASE_ID)?;
    let schema = voter_table_schema(case_ids.data_type());

    let mut arrays: Vec<ArrayRef> = vec![case_ids.clone()];
    arrays.push(dictionary_column(records.iter().map(|r| r.party))?);
    arrays.push(dictionary_column(records.iter().map(|r| r.voter_difficulty_level))?);
    arrays.push(boolean_column(records.iter().map(|r| r.voted)));
    arrays.push(dictionary_column(records.iter().map(|r| r.difficulty_level))?);
    arrays.push(boolean_column(records.iter().map(|r| r.problem_mentioned)));
    arrays.push(boolean_column(records.iter().map(|r| Some(r.presumed))));
    arrays.push(dictionary_column(records.iter().map(|r| r.presumed_reason))?);
    arrays.push(dictionary_column(records.iter().map(|r| r.presumed_difficulty_level))?);
    for name in code_columns() {
        arrays.push(required_column(&raw_batch, name)?.clone());
    }

    Ok(RecordBatch::try_new(schema, arrays)?)
}

fn boolean_column(values: impl Iterator<Item = Option<bool>>) -> ArrayRef {
    Arc::new(values.collect::<BooleanArray>())
}

/// Write a record batch to a Parquet file
pub fn write_parquet(path: &Path, batch: &RecordBatch) -> Result<()> {
    let file = safe_create_file(path, "writing analytic table")?;
    let props = WriterProperties::builder().build();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))?;
    writer.write(batch)?;
    writer.close()?;
    Ok(())
}

/// Write the statistics bundle as JSON
pub fn write_statistics(path: &Path, statistics: &SurveyStatistics) -> Result<()> {
    let file = safe_create_file(path, "writing statistics")?;
    let mut out = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut out, statistics)?;
    out.write_all(b"\n")
        .and_then(|()| out.flush())
        .map_err(|e| SurveyError::io("Failed to write statistics", e).with_path(path))?;
    Ok(())
}

/// Locations of the written artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    /// Analytic table
    pub table: PathBuf,
    /// Statistics bundle
    pub statistics: PathBuf,
}

/// Write both artifacts into the configured output directory
pub fn write_artifacts(
    config: &PipelineConfig,
    records: &[VoterRecord],
    statistics: &SurveyStatistics,
) -> Result<ArtifactPaths> {
    ensure_directory(&config.output_dir, "writing artifacts")?;

    let paths = ArtifactPaths {
        table: config.table_path(),
        statistics: config.statistics_path(),
    };

    let table = voter_table(records)?;
    write_parquet(&paths.table, &table)?;
    log_operation_complete("wrote", &paths.table, table.num_rows(), None);

    write_statistics(&paths.statistics, statistics)?;
    log_operation_complete("wrote", &paths.statistics, 1, None);

    Ok(paths)
}
