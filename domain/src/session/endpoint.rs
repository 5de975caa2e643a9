//! Chat service endpoint

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default address of the chat service's duplex endpoint.
pub const DEFAULT_ENDPOINT: &str = "ws://localhost:8000/ws";

/// Validated address of the duplex chat endpoint (Value Object)
///
/// Only `ws://` and `wss://` URLs with a non-empty authority are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Endpoint(String);

impl Endpoint {
    pub fn parse(url: &str) -> Result<Self, DomainError> {
        let url = url.trim();
        let invalid = |reason: &str| DomainError::InvalidEndpoint {
            url: url.to_string(),
            reason: reason.to_string(),
        };

        let rest = url
            .strip_prefix("ws://")
            .or_else(|| url.strip_prefix("wss://"))
            .ok_or_else(|| invalid("scheme must be ws or wss"))?;

        let authority = rest.split(['/', '?', '#']).next().unwrap_or("");
        if authority.is_empty() {
            return Err(invalid("missing host"));
        }
        if rest.chars().any(char::is_whitespace) {
            return Err(invalid("contains whitespace"));
        }

        Ok(Self(url.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_secure(&self) -> bool {
        self.0.starts_with("wss://")
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self(DEFAULT_ENDPOINT.to_string())
    }
}

impl FromStr for Endpoint {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Endpoint {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Endpoint> for String {
    fn from(endpoint: Endpoint) -> Self {
        endpoint.0
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
