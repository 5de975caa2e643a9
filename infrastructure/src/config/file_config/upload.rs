//! Upload configuration from TOML (`[upload]` section)

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw upload configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileUploadConfig {
    /// Upload endpoint of the document service
    pub url: String,
    /// Request timeout; document processing is slow, so the default is generous
    pub timeout_seconds: u64,
}

impl FileUploadConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for FileUploadConfig {
    fn default() -> Self {
        Self {
            url: crate::upload::DEFAULT_UPLOAD_URL.to_string(),
            timeout_seconds: 300,
        }
    }
}
