use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::llm::ProgressReporter;

/// Spinner shown while waiting on the LLM.
///
/// Cleared when dropped.
pub struct Spinner {
    pb: ProgressBar,
    base_message: String,
}

impl Spinner {
    pub fn new(message: &str, colored: bool) -> Self {
        let pb = ProgressBar::new_spinner();
        let template = if colored {
            "{spinner:.green} {msg}"
        } else {
            "{spinner} {msg}"
        };
        if let Ok(style) = ProgressStyle::default_spinner().template(template) {
            pb.set_style(style);
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(80));
        Self {
            pb,
            base_message: message.to_string(),
        }
    }

    pub fn append_suffix(&self, suffix: &str) {
        self.pb
            .set_message(format!("{} {}", self.base_message, suffix));
    }

    pub fn finish_and_clear(&self) {
        self.pb.finish_and_clear();
    }
}

impl ProgressReporter for Spinner {
    fn append_suffix(&self, suffix: &str) {
        Spinner::append_suffix(self, suffix);
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.pb.finish_and_clear();
    }
}
