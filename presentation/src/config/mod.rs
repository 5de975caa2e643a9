//! Presentation-level configuration
//!
//! Settings the chat REPL needs, already merged from files, environment and
//! flags by the binary.

use std::path::PathBuf;

/// REPL configuration for the presentation layer
#[derive(Debug, Clone)]
pub struct ReplConfig {
    /// Show a spinner while a response is outstanding
    pub show_progress: bool,
    /// Prefix transcript lines with their arrival time
    pub show_timestamps: bool,
    /// Path to history file; defaults to the platform data directory
    pub history_file: Option<PathBuf>,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            show_progress: true,
            show_timestamps: false,
            history_file: None,
        }
    }
}

impl ReplConfig {
    /// History file actually used by the REPL, with a leading `~/` expanded
    pub fn history_path(&self) -> Option<PathBuf> {
        match &self.history_file {
            Some(path) => match path.strip_prefix("~") {
                Ok(rest) => dirs::home_dir().map(|home| home.join(rest)),
                Err(_) => Some(path.clone()),
            },
            None => dirs::data_dir().map(|p| p.join("docchat").join("history.txt")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_history_path_is_kept() {
        let config = ReplConfig {
            history_file: Some(PathBuf::from("/tmp/docchat-history.txt")),
            ..Default::default()
        };
        assert_eq!(
            config.history_path(),
            Some(PathBuf::from("/tmp/docchat-history.txt"))
        );
    }

    #[test]
    fn test_default_history_path_is_under_docchat() {
        if let Some(path) = ReplConfig::default().history_path() {
            assert!(path.ends_with("docchat/history.txt"));
        }
    }
}
