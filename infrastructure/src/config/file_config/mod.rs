//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Values stay as plain strings here; conversion into domain types happens in
//! [`FileConfig::validate`] and the accessors.

mod connection;
mod logging;
mod repl;
mod upload;

pub use connection::FileConnectionConfig;
pub use logging::FileLoggingConfig;
pub use repl::FileReplConfig;
pub use upload::FileUploadConfig;

use docchat_domain::Endpoint;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    #[error("connection.endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("upload.url must start with http:// or https:// (got '{0}')")]
    InvalidUploadUrl(String),

    #[error("upload.timeout_seconds cannot be 0")]
    InvalidTimeout,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Chat service connection
    pub connection: FileConnectionConfig,
    /// Document upload service
    pub upload: FileUploadConfig,
    /// REPL settings
    pub repl: FileReplConfig,
    /// Transcript logging
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();

        if let Err(e) = self.endpoint() {
            issues.push(ConfigValidationError::InvalidEndpoint(e.to_string()));
        }

        let url = self.upload.url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            issues.push(ConfigValidationError::InvalidUploadUrl(
                self.upload.url.clone(),
            ));
        }

        if self.upload.timeout_seconds == 0 {
            issues.push(ConfigValidationError::InvalidTimeout);
        }

        issues
    }

    /// Parsed chat endpoint
    pub fn endpoint(&self) -> Result<Endpoint, docchat_domain::DomainError> {
        Endpoint::parse(self.connection.endpoint.trim())
    }

    /// Effective configuration rendered as TOML (for `--print-config`)
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docchat_domain::DEFAULT_ENDPOINT;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[connection]
endpoint = "wss://chat.example.com/ws"

[upload]
url = "https://chat.example.com/upload"
timeout_seconds = 60

[repl]
show_progress = false
show_timestamps = true
history_file = "~/.local/share/docchat/history.txt"

[logging]
conversation_log = "/tmp/docchat.jsonl"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.connection.endpoint, "wss://chat.example.com/ws");
        assert_eq!(config.upload.timeout_seconds, 60);
        assert!(!config.repl.show_progress);
        assert!(config.repl.show_timestamps);
        assert_eq!(
            config.logging.conversation_log.as_deref(),
            Some("/tmp/docchat.jsonl")
        );
        assert!(config.endpoint().unwrap().is_secure());
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[upload]
timeout_seconds = 10
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        // Defaults should apply
        assert_eq!(config.connection.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.upload.url, "http://localhost:8000/upload");
        assert!(config.repl.show_progress);
        assert!(config.logging.conversation_log.is_none());
    }

    #[test]
    fn test_validate_valid_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_reports_every_issue() {
        let mut config = FileConfig::default();
        config.connection.endpoint = "http://localhost:8000/ws".to_string();
        config.upload.url = "localhost:8000/upload".to_string();
        config.upload.timeout_seconds = 0;

        let issues = config.validate();
        assert_eq!(issues.len(), 3);
        assert!(matches!(issues[0], ConfigValidationError::InvalidEndpoint(_)));
        assert_eq!(issues[2], ConfigValidationError::InvalidTimeout);
    }

    #[test]
    fn test_to_toml_renders_sections() {
        let toml_out = FileConfig::default().to_toml().unwrap();
        assert!(toml_out.contains("[connection]"));
        assert!(toml_out.contains(r#"endpoint = "ws://localhost:8000/ws""#));
        assert!(toml_out.contains("timeout_seconds = 300"));
    }
}
