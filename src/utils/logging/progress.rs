//! Progress reporting for pipeline stages

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Template of the stage spinner
pub const STAGE_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] {msg}";

/// Create a spinner showing the current pipeline stage
///
/// Hidden when `visible` is false, so library callers and tests stay quiet.
#[must_use]
pub fn create_stage_spinner(visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template(STAGE_TEMPLATE) {
        pb.set_style(style);
    }
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Finish a spinner with a completion message
pub fn finish_progress_bar(pb: &ProgressBar, message: Option<&str>) {
    match message {
        Some(msg) => pb.finish_with_message(msg.to_string()),
        None => pb.finish_and_clear(),
    }
}
