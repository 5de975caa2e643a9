//! Port for structured conversation logging.
//!
//! Defines the [`ConversationLogger`] trait for recording transcript events
//! (queries sent, responses received, connection changes, errors) to a
//! structured log.
//!
//! This is separate from `tracing`-based diagnostics: tracing handles
//! human-readable operational messages, while this port captures the chat
//! transcript in a machine-readable format (JSONL). The log is write-only;
//! nothing reads it back into a session.

use serde_json::Value;

/// A structured conversation event for logging.
pub struct ConversationEvent {
    /// Event type identifier (e.g., "query_sent", "response_received").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging conversation events.
///
/// `log` is synchronous and infallible so that a broken log file never
/// disturbs the session; implementations swallow their own write errors.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
