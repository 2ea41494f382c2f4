//! Categorical encoder
//!
//! Turns cleaned codes into labelled categories, and categories into Arrow
//! dictionary columns whose dictionary is the full label list in level order.
//!
//! Parquet keeps only the dictionary values that occur, so the level list and
//! whether it is ordered are also recorded in the field metadata, as a single
//! JSON entry to keep the encoded schema stable between runs.

use std::collections::HashMap;
use std::sync::Arc;

use arrow::array::{ArrayRef, DictionaryArray, Int8Array, StringArray};
use arrow::datatypes::{DataType, Field, Int8Type};

use crate::error::{Result, SurveyError};
use crate::models::case_id::CaseId;
use crate::models::categories::{DifficultyLevel, NonVoteReason, Party};

/// A categorical type that can be stored as a dictionary column
pub trait Categorical: Copy + 'static {
    /// Whether level order is meaningful
    const ORDERED: bool;
    /// All levels in dictionary order
    fn levels() -> &'static [Self];
    /// Label of this level
    fn label(self) -> &'static str;
    /// Zero-based position in [`Categorical::levels`]
    fn index(self) -> usize;
}

impl Categorical for Party {
    const ORDERED: bool = false;

    fn levels() -> &'static [Self] {
        &Self::ALL
    }
    fn label(self) -> &'static str {
        Self::label(self)
    }
    fn index(self) -> usize {
        Self::index(self)
    }
}

impl Categorical for DifficultyLevel {
    const ORDERED: bool = true;

    fn levels() -> &'static [Self] {
        &Self::ALL
    }
    fn label(self) -> &'static str {
        Self::label(self)
    }
    fn index(self) -> usize {
        Self::index(self)
    }
}

impl Categorical for NonVoteReason {
    const ORDERED: bool = false;

    fn levels() -> &'static [Self] {
        &Self::ALL
    }
    fn label(self) -> &'static str {
        Self::label(self)
    }
    fn index(self) -> usize {
        Self::index(self)
    }
}

/// Arrow type of every categorical column
#[must_use]
pub fn dictionary_type() -> DataType {
    DataType::Dictionary(Box::new(DataType::Int8), Box::new(DataType::Utf8))
}

/// Field metadata key of the level description, `{"levels": [..], "ordered": bool}`
pub const CATEGORICAL_METADATA_KEY: &str = "categorical";

/// Nullable dictionary field describing the levels of `C`
#[must_use]
pub fn categorical_field<C: Categorical>(name: &str) -> Field {
    let labels: Vec<&str> = C::levels().iter().map(|level| level.label()).collect();
    let description = serde_json::json!({ "levels": labels, "ordered": C::ORDERED });
    let metadata = HashMap::from([(CATEGORICAL_METADATA_KEY.to_string(), description.to_string())]);
    Field::new(name, dictionary_type(), true).with_metadata(metadata)
}

/// Encode a cleaned difficulty code
///
/// A code outside 1-5 at this point means the data does not follow its
/// codebook, so it is reported rather than mapped to missing.
pub fn encode_difficulty(field: &'static str, code: i32, case_id: &CaseId) -> Result<DifficultyLevel> {
    DifficultyLevel::from_code(code).ok_or_else(|| SurveyError::CodeOutOfRange {
        field,
        code,
        case_id: case_id.clone(),
        min: DifficultyLevel::MIN_CODE,
        max: DifficultyLevel::MAX_CODE,
    })
}

/// Encode a cleaned non-vote reason code
pub fn encode_reason(field: &'static str, code: i32, case_id: &CaseId) -> Result<NonVoteReason> {
    NonVoteReason::from_code(code).ok_or_else(|| SurveyError::CodeOutOfRange {
        field,
        code,
        case_id: case_id.clone(),
        min: NonVoteReason::MIN_CODE,
        max: NonVoteReason::MAX_CODE,
    })
}

/// Build a dictionary column from optional categories
///
/// The dictionary always holds every level, used or not, so level order is
/// preserved in the persisted table.
pub fn dictionary_column<C: Categorical>(values: impl IntoIterator<Item = Option<C>>) -> Result<ArrayRef> {
    let keys: Int8Array = values
        .into_iter()
        .map(|value| value.map(|category| category.index() as i8))
        .collect();
    let labels: StringArray = C::levels().iter().map(|level| Some(level.label())).collect();
    let array = DictionaryArray::<Int8Type>::try_new(keys, Arc::new(labels))?;
    Ok(Arc::new(array))
}
