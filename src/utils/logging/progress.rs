//! Progress spinners for the ingestion stages
//!
//! Spinners are only drawn when progress display is enabled; otherwise a
//! hidden bar is returned so callers never branch on it.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Template used by every stage spinner
pub const SPINNER_TEMPLATE: &str = "{spinner:.green} {elapsed_precise} {msg}";

/// Create a spinner for a stage without a known length
///
/// # Arguments
/// * `message` - Optional message to display with the spinner
/// * `visible` - Draw the spinner; a hidden bar is returned otherwise
#[must_use]
pub fn create_spinner(message: Option<&str>, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template(SPINNER_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    if let Some(msg) = message {
        pb.set_message(msg.to_string());
    }
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Finish a spinner and clear it from display
pub fn finish_and_clear(pb: &ProgressBar) {
    pb.finish_and_clear();
}
