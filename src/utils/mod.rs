//! Utilities for logging, progress output and tests

pub mod logging;
pub mod test;
