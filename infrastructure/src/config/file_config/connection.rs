//! Connection configuration from TOML (`[connection]` section)

use docchat_domain::DEFAULT_ENDPOINT;
use serde::{Deserialize, Serialize};

/// Raw connection configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConnectionConfig {
    /// WebSocket endpoint of the chat service
    pub endpoint: String,
}

impl Default for FileConnectionConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}
