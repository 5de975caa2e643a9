//! Read-only session view

use super::entities::Message;
use super::state::ConnectionState;

/// Point-in-time copy of session state.
///
/// Produced by the session controller after every state change. Holding one
/// never gives access to controller-owned state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub connection_state: ConnectionState,
    pub messages: Vec<Message>,
    pub awaiting_response: bool,
    pub last_error: Option<String>,
    /// Errors recorded so far. Moves even when the same reason repeats.
    pub error_count: u64,
}

impl SessionSnapshot {
    pub fn is_connected(&self) -> bool {
        self.connection_state.is_open()
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Messages appended after the first `seen` entries.
    pub fn messages_since(&self, seen: usize) -> &[Message] {
        self.messages.get(seen..).unwrap_or(&[])
    }
}
