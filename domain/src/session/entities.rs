//! Session domain entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Author of a message in the transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Label shown next to a message (`You` / `Assistant`)
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "You",
            Role::Assistant => "Assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// Message content waiting to be appended to a [`MessageLog`](super::log::MessageLog).
///
/// Only the log assigns a sequence number, so callers build one of these and
/// hand it over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub role: Role,
    pub content: String,
}

impl NewMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A message stored in the transcript (Entity)
///
/// `content` is opaque text; it may hold markdown or tables that only the
/// presentation layer interprets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    /// Position in the log, starting at 0.
    pub sequence: u64,
    pub received_at: DateTime<Utc>,
}

impl Message {
    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    pub fn is_assistant(&self) -> bool {
        self.role == Role::Assistant
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_message_constructors() {
        assert_eq!(NewMessage::user("hi").role, Role::User);
        assert_eq!(NewMessage::assistant("hello").role, Role::Assistant);
        assert_eq!(NewMessage::assistant("hello").content, "hello");
    }

    #[test]
    fn test_message_json_carries_timestamp() {
        let message = Message {
            role: Role::Assistant,
            content: "Section 2 covers payment terms".to_string(),
            sequence: 1,
            received_at: "2024-05-01T12:30:00Z".parse().unwrap(),
        };

        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["role"], "assistant");
        assert!(
            value["received_at"]
                .as_str()
                .unwrap()
                .starts_with("2024-05-01T12:30:00")
        );

        let back: Message = serde_json::from_value(value).unwrap();
        assert_eq!(back, message);
    }

    #[test]
    fn test_role_labels() {
        assert_eq!(Role::User.label(), "You");
        assert_eq!(Role::Assistant.label(), "Assistant");
        assert_eq!(Role::Assistant.to_string(), "assistant");
    }
}
