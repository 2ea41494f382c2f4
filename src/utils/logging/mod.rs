//! Logging and progress output

pub mod log;
pub mod progress;

pub use self::log::{log_operation_complete, log_operation_start, log_report};
pub use progress::{create_stage_spinner, finish_progress_bar};
