//! Type adaptation for survey columns.
//!
//! Statistical packages export coded variables with whatever integer width (or
//! a double) fits the value labels. Everything coded is normalised to `Int32`.
//! The case identifier is either numeric, normalised to `Int64`, or text,
//! normalised to `Utf8`.

use arrow::array::{Array, ArrayRef, AsArray, Int32Array};
use arrow::compute::{CastOptions, cast, cast_with_options};
use arrow::datatypes::{DataType, Float64Type, Int32Type};
use arrow::record_batch::RecordBatch;
use log::debug;

use crate::error::{Result, SurveyError};

/// Whether an Arrow type can carry survey codes
#[must_use]
pub const fn is_code_type(data_type: &DataType) -> bool {
    matches!(
        data_type,
        DataType::Null
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Whether an Arrow type can carry case identifiers
#[must_use]
pub const fn is_case_id_type(data_type: &DataType) -> bool {
    matches!(data_type, DataType::Utf8 | DataType::LargeUtf8) || is_code_type(data_type)
}

/// Look up a column by name, failing with a schema error when absent
pub fn required_column<'a>(batch: &'a RecordBatch, column_name: &str) -> Result<&'a ArrayRef> {
    let idx = batch
        .schema()
        .index_of(column_name)
        .map_err(|_| SurveyError::MissingColumn {
            column: column_name.to_string(),
        })?;
    Ok(batch.column(idx))
}

/// Convert a numeric column to `target`, refusing lossy conversions
///
/// Float columns must hold integral values; out-of-range integers are an error
/// rather than silently becoming null.
pub fn normalize_numeric(column: &ArrayRef, column_name: &str, target: &DataType) -> Result<ArrayRef> {
    let actual = column.data_type();
    if actual == target {
        return Ok(column.clone());
    }
    if !is_code_type(actual) {
        return Err(SurveyError::ColumnType {
            column: column_name.to_string(),
            expected: "integer-coded numeric".to_string(),
            actual: actual.to_string(),
        });
    }

    if matches!(actual, DataType::Float32 | DataType::Float64) {
        let as_float = cast(column, &DataType::Float64)?;
        let non_integral = as_float
            .as_primitive::<Float64Type>()
            .iter()
            .flatten()
            .find(|v| v.fract() != 0.0 || !v.is_finite());
        if let Some(value) = non_integral {
            return Err(SurveyError::ColumnType {
                column: column_name.to_string(),
                expected: "integral codes".to_string(),
                actual: format!("{actual} containing {value}"),
            });
        }
    }

    debug!("Converting column '{column_name}' from {actual:?} to {target:?}");
    let options = CastOptions {
        safe: false,
        ..Default::default()
    };
    Ok(cast_with_options(column, target, &options)?)
}

/// Normalise the case identifier column to `Utf8` (text ids) or `Int64`
pub fn normalize_case_id(column: &ArrayRef, column_name: &str) -> Result<ArrayRef> {
    match column.data_type() {
        DataType::Utf8 => Ok(column.clone()),
        DataType::LargeUtf8 => Ok(cast(column, &DataType::Utf8)?),
        _ => normalize_numeric(column, column_name, &DataType::Int64),
    }
}

/// Fetch a coded column as `Int32`
pub fn code_column(batch: &RecordBatch, column_name: &str) -> Result<Int32Array> {
    let column = required_column(batch, column_name)?;
    let normalized = normalize_numeric(column, column_name, &DataType::Int32)?;
    Ok(normalized.as_primitive::<Int32Type>().clone())
}

/// Values of a coded column, with nulls as `None`
pub fn code_values(batch: &RecordBatch, column_name: &str) -> Result<Vec<Option<i32>>> {
    Ok(code_column(batch, column_name)?.iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{BooleanArray, Float64Array, Int8Array, LargeStringArray, StringArray};
    use arrow::datatypes::{Field, Schema};
    use std::sync::Arc;

    fn batch_with(name: &str, array: ArrayRef) -> RecordBatch {
        let schema = Schema::new(vec![Field::new(name, array.data_type().clone(), true)]);
        RecordBatch::try_new(Arc::new(schema), vec![array]).unwrap()
    }

    #[test]
    fn test_int8_is_widened() {
        let batch = batch_with(
            "turnout_summary",
            Arc::new(Int8Array::from(vec![Some(1), Some(-9), None])),
        );
        let values = code_values(&batch, "turnout_summary").unwrap();
        assert_eq!(values, vec![Some(1), Some(-9), None]);
    }

    #[test]
    fn test_integral_doubles_are_accepted() {
        let batch = batch_with(
            "turnout_summary",
            Arc::new(Float64Array::from(vec![Some(0.0), Some(-1.0), None])),
        );
        let values = code_values(&batch, "turnout_summary").unwrap();
        assert_eq!(values, vec![Some(0), Some(-1), None]);
    }

    #[test]
    fn test_fractional_doubles_are_rejected() {
        let batch = batch_with(
            "turnout_summary",
            Arc::new(Float64Array::from(vec![Some(0.5)])),
        );
        let err = code_values(&batch, "turnout_summary").unwrap_err();
        assert!(err.is_schema_violation());
    }

    #[test]
    fn test_string_column_is_rejected() {
        let batch = batch_with(
            "turnout_summary",
            Arc::new(StringArray::from(vec![Some("voted")])),
        );
        assert!(matches!(
            code_values(&batch, "turnout_summary"),
            Err(SurveyError::ColumnType { .. })
        ));
    }

    #[test]
    fn test_missing_column() {
        let batch = batch_with("other", Arc::new(Int8Array::from(vec![Some(1)])));
        assert!(matches!(
            code_values(&batch, "turnout_summary"),
            Err(SurveyError::MissingColumn { column }) if column == "turnout_summary"
        ));
    }

    #[test]
    fn test_case_id_normalization() {
        let large: ArrayRef = Arc::new(LargeStringArray::from(vec!["R-1", "R-2"]));
        let ids = normalize_case_id(&large, "case_id").unwrap();
        assert_eq!(ids.data_type(), &DataType::Utf8);
        assert_eq!(ids.as_string::<i32>().value(1), "R-2");

        let narrow: ArrayRef = Arc::new(Int8Array::from(vec![1, 2]));
        let ids = normalize_case_id(&narrow, "case_id").unwrap();
        assert_eq!(ids.data_type(), &DataType::Int64);

        let flags: ArrayRef = Arc::new(BooleanArray::from(vec![true]));
        assert!(!is_case_id_type(flags.data_type()));
        assert!(normalize_case_id(&flags, "case_id").is_err());
    }
}
