//! Derived attributes of survey respondents.

pub mod encoder;
pub mod engine;
pub mod rules;

pub use encoder::{
    Categorical, categorical_field, dictionary_column, encode_difficulty, encode_reason,
};
pub use engine::{check_invariants, derive, derive_all, is_registration_failure};
pub use rules::{Rule, RuleTable};
