//! Utility functions for error handling
//!
//! Opening input files and preparing output directories with error messages that
//! say which file was involved and why it was needed.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{Result, SurveyError};

/// Safely open a file with rich error information
///
/// # Arguments
/// * `path` - The path to the file to open
/// * `purpose` - Why the file is being opened (for error context)
pub fn safe_open_file(path: &Path, purpose: &str) -> Result<fs::File> {
    if !path.is_file() {
        let kind = if path.exists() {
            io::ErrorKind::InvalidInput
        } else {
            io::ErrorKind::NotFound
        };
        return Err(SurveyError::io(
            format!("Expected a readable file for: {purpose}"),
            io::Error::new(kind, "not a file"),
        )
        .with_path(path));
    }

    fs::File::open(path).map_err(|e| {
        let context = match e.kind() {
            io::ErrorKind::PermissionDenied => {
                "Permission denied - check file permissions".to_string()
            }
            _ => format!("Failed to open file for: {purpose}"),
        };
        SurveyError::io(context, e).with_path(path)
    })
}

/// Create a file for writing, replacing any previous content
pub fn safe_create_file(path: &Path, purpose: &str) -> Result<fs::File> {
    fs::File::create(path)
        .map_err(|e| SurveyError::io(format!("Failed to create file for: {purpose}"), e).with_path(path))
}

/// Make sure an output directory exists, creating it (and its parents) if needed
pub fn ensure_directory(path: &Path, purpose: &str) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }
    if path.exists() {
        return Err(SurveyError::io(
            format!("Expected a directory for: {purpose}"),
            io::Error::new(io::ErrorKind::InvalidInput, "path exists and is not a directory"),
        )
        .with_path(path));
    }

    fs::create_dir_all(path).map_err(|e| {
        SurveyError::io(format!("Failed to create directory for: {purpose}"), e).with_path(path)
    })
}
