//! Spinner shown while a response or upload is outstanding

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// An indicatif spinner that can be switched off with `--quiet`.
pub struct TypingIndicator {
    enabled: bool,
    bar: Option<ProgressBar>,
}

impl TypingIndicator {
    pub fn new(enabled: bool) -> Self {
        Self { enabled, bar: None }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    /// Start spinning with `message`; a running spinner just changes text.
    pub fn start(&mut self, message: &str) {
        if !self.enabled {
            return;
        }
        if let Some(bar) = &self.bar {
            bar.set_message(message.to_string());
            return;
        }
        let bar = ProgressBar::new_spinner();
        bar.set_style(Self::style());
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        self.bar = Some(bar);
    }

    /// Remove the spinner line.
    pub fn stop(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }

    pub fn is_active(&self) -> bool {
        self.bar.is_some()
    }
}

impl Drop for TypingIndicator {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_indicator_never_starts() {
        let mut indicator = TypingIndicator::new(false);
        indicator.start("Waiting for response...");
        assert!(!indicator.is_active());
    }

    #[test]
    fn test_start_and_stop() {
        let mut indicator = TypingIndicator::new(true);
        indicator.start("Waiting for response...");
        indicator.start("Still waiting...");
        assert!(indicator.is_active());
        indicator.stop();
        indicator.stop();
        assert!(!indicator.is_active());
    }
}
