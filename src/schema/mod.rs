//! Survey schema: column names, type adaptation and the column selector.
//!
//! The selector projects the loaded table down to the source columns the
//! derivation needs and normalises their types. A missing column, a column that
//! cannot hold numeric codes, or a null or repeated case identifier aborts the
//! run, since every later step assumes the fixed schema. Case identifiers may be
//! numeric or text.

pub mod adapt;
pub mod columns;

use std::hash::Hash;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Field, Int64Type, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use log::debug;
use rustc_hash::FxHashSet;

use crate::error::{Result, SurveyError};
use crate::models::case_id::CaseId;
use adapt::{normalize_case_id, normalize_numeric, required_column};
use columns::{CASE_ID, code_columns, source_columns};

pub use adapt::{code_column, code_values};

/// Arrow schema of the selected source table
///
/// `case_id_type` is `Int64` for numeric identifiers and `Utf8` for text ones.
#[must_use]
pub fn source_schema(case_id_type: &DataType) -> SchemaRef {
    let mut fields = vec![Field::new(CASE_ID, case_id_type.clone(), false)];
    fields.extend(
        code_columns()
            .into_iter()
            .map(|name| Field::new(name, DataType::Int32, true)),
    );
    Arc::new(Schema::new(fields))
}

/// Check that every source column is present with a usable type
///
/// Codes must be numeric; the case identifier may also be text. Reports the
/// first offending column, in source column order.
pub fn validate_schema(schema: &Schema) -> Result<()> {
    for name in source_columns() {
        let field = schema
            .field_with_name(name)
            .map_err(|_| SurveyError::MissingColumn {
                column: name.to_string(),
            })?;
        let (accepted, expected) = if name == CASE_ID {
            (adapt::is_case_id_type(field.data_type()), "integer or text identifier")
        } else {
            (adapt::is_code_type(field.data_type()), "integer-coded numeric")
        };
        if !accepted {
            return Err(SurveyError::ColumnType {
                column: name.to_string(),
                expected: expected.to_string(),
                actual: field.data_type().to_string(),
            });
        }
    }
    Ok(())
}

/// Project a survey table onto the source columns
///
/// The result has [`source_schema`]: `case_id` as non-null `Int64` or `Utf8`,
/// codes as nullable `Int32`. Extra input columns are dropped.
pub fn select_columns(batch: &RecordBatch) -> Result<RecordBatch> {
    validate_schema(&batch.schema())?;

    let case_ids = normalize_case_id(required_column(batch, CASE_ID)?, CASE_ID)?;
    check_case_ids(&case_ids)?;
    let case_id_type = case_ids.data_type().clone();

    let mut arrays: Vec<ArrayRef> = vec![case_ids];
    for name in code_columns() {
        arrays.push(normalize_numeric(
            required_column(batch, name)?,
            name,
            &DataType::Int32,
        )?);
    }

    debug!(
        "Selected {} of {} columns for {} rows",
        arrays.len(),
        batch.num_columns(),
        batch.num_rows()
    );
    Ok(RecordBatch::try_new(source_schema(&case_id_type), arrays)?)
}

fn check_case_ids(case_ids: &ArrayRef) -> Result<()> {
    match case_ids.data_type() {
        DataType::Utf8 => check_unique(case_ids.as_string::<i32>().iter(), CaseId::from),
        _ => check_unique(case_ids.as_primitive::<Int64Type>().iter(), CaseId::from),
    }
}

fn check_unique<T: Copy + Eq + Hash>(
    ids: impl ExactSizeIterator<Item = Option<T>>,
    to_case_id: fn(T) -> CaseId,
) -> Result<()> {
    let mut seen = FxHashSet::default();
    seen.reserve(ids.len());
    for (row, id) in ids.enumerate() {
        let id = id.ok_or(SurveyError::NullCaseId { row })?;
        if !seen.insert(id) {
            return Err(SurveyError::DuplicateCaseId {
                case_id: to_case_id(id),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test::{SurveyBatchBuilder, respondent};
    use arrow::array::{Int64Array, StringArray};

    #[test]
    fn test_select_columns_projects_and_normalizes() {
        let batch = SurveyBatchBuilder::new()
            .with_extra_column("interview_mode")
            .push(respondent(1).voted(3))
            .push(respondent(2).not_registered_intending())
            .build();
        assert_eq!(batch.num_columns(), 18);

        let selected = select_columns(&batch).unwrap();
        assert_eq!(selected.schema(), source_schema(&DataType::Int64));
        assert_eq!(selected.num_rows(), 2);
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let batch = SurveyBatchBuilder::new()
            .without_column(columns::NON_VOTE_REASON_CODE)
            .push(respondent(1).voted(1))
            .build();
        let err = select_columns(&batch).unwrap_err();
        assert!(matches!(
            err,
            SurveyError::MissingColumn { ref column } if column == "non_vote_reason_code"
        ));
    }

    #[test]
    fn test_duplicate_case_id_is_fatal() {
        let batch = SurveyBatchBuilder::new()
            .push(respondent(7).voted(1))
            .push(respondent(7).forgot())
            .build();
        assert!(matches!(
            select_columns(&batch),
            Err(SurveyError::DuplicateCaseId { case_id: CaseId::Integer(7) })
        ));
    }

    #[test]
    fn test_null_case_id_is_fatal() {
        let ids: ArrayRef = Arc::new(Int64Array::from(vec![Some(1), None]));
        assert!(matches!(
            check_case_ids(&ids),
            Err(SurveyError::NullCaseId { row: 1 })
        ));
    }

    #[test]
    fn test_text_case_ids_are_accepted() {
        let batch = SurveyBatchBuilder::new()
            .push(respondent("R-0001").voted(3))
            .push(respondent("R-0002").forgot())
            .build();
        let selected = select_columns(&batch).unwrap();
        assert_eq!(selected.schema(), source_schema(&DataType::Utf8));

        let schema = Schema::new(vec![Field::new(CASE_ID, DataType::LargeUtf8, false)]);
        assert!(!matches!(
            validate_schema(&schema),
            Err(SurveyError::ColumnType { .. })
        ));
    }

    #[test]
    fn test_text_case_id_checks() {
        let duplicated: ArrayRef = Arc::new(StringArray::from(vec!["R-1", "R-2", "R-1"]));
        assert!(matches!(
            check_case_ids(&duplicated),
            Err(SurveyError::DuplicateCaseId { case_id: CaseId::Text(ref id) }) if id == "R-1"
        ));

        let missing: ArrayRef = Arc::new(StringArray::from(vec![Some("R-1"), None]));
        assert!(matches!(
            check_case_ids(&missing),
            Err(SurveyError::NullCaseId { row: 1 })
        ));
    }

    #[test]
    fn test_boolean_case_id_is_rejected() {
        let schema = Schema::new(vec![Field::new(CASE_ID, DataType::Boolean, false)]);
        let err = validate_schema(&schema).unwrap_err();
        assert!(matches!(err, SurveyError::ColumnType { .. }));
    }
}
