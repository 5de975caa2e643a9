//! Session controller: the stateful core of a chat session.
//!
//! [`SessionController`] owns a [`ConnectionManager`] and a [`MessageLog`] and
//! is the single decision-maker for the session:
//!
//! | Trigger | Effect |
//! |---------|--------|
//! | [`send_query`](SessionController::send_query) | transmit, append `User` message, `awaiting_response = true` |
//! | `Opened` | state `Open`, clear `last_error` |
//! | `Response` | append `Assistant` message, `awaiting_response = false` |
//! | `Failed(reason)` | `last_error = reason`, `awaiting_response = false` |
//! | `ServerError(reason)` | append `Assistant` message with the reason, then as `Failed`; connection stays open |
//! | `Closed` / [`close`](SessionController::close) | state `Closed`, `awaiting_response = false` |
//!
//! A [`SessionSnapshot`] is published on a `watch` channel after every state
//! change, before the handler returns.
//!
//! Responses are not correlated with individual queries: `awaiting_response`
//! is one boolean and any response clears it, however many queries are
//! outstanding.

use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::duplex::{ConnectionEvent, DuplexConnector, EventReceiver};
use crate::use_cases::connection_manager::{ConnectionManager, ManagedEvent, SessionError};
use docchat_domain::{
    ClientFrame, ConnectionState, Endpoint, Message, MessageLog, NewMessage, SessionSnapshot,
    preview,
};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// One chat session: connection, transcript and derived state.
///
/// Created once per chat view and dropped when the view is torn down, which
/// closes the connection. All methods run on the owner's task; nothing here
/// blocks.
pub struct SessionController {
    connection: ConnectionManager,
    events: EventReceiver,
    log: MessageLog,
    awaiting_response: bool,
    last_error: Option<String>,
    error_count: u64,
    snapshot_tx: watch::Sender<SessionSnapshot>,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl SessionController {
    /// Create an `Idle` session with an empty transcript.
    pub fn new(connector: Arc<dyn DuplexConnector>, endpoint: Endpoint) -> Self {
        let (connection, events) = ConnectionManager::new(connector, endpoint);
        let (snapshot_tx, _) = watch::channel(SessionSnapshot::default());
        Self {
            connection,
            events,
            log: MessageLog::new(),
            awaiting_response: false,
            last_error: None,
            error_count: 0,
            snapshot_tx,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    /// Record transcript events through `logger`.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn endpoint(&self) -> &Endpoint {
        self.connection.endpoint()
    }

    pub fn connection_state(&self) -> &ConnectionState {
        self.connection.state()
    }

    pub fn messages(&self) -> &[Message] {
        self.log.all()
    }

    pub fn awaiting_response(&self) -> bool {
        self.awaiting_response
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn error_count(&self) -> u64 {
        self.error_count
    }

    /// Start connecting to the session's endpoint.
    pub fn open(&mut self) -> Result<(), SessionError> {
        self.connection.open()?;
        self.log_state();
        self.publish();
        Ok(())
    }

    /// Close the connection. An outstanding query is abandoned, the
    /// transcript is kept.
    pub fn close(&mut self) {
        if self.connection.state() == &ConnectionState::Closed {
            return;
        }
        self.connection.close();
        self.awaiting_response = false;
        self.log_state();
        self.publish();
    }

    /// Send a user query.
    ///
    /// Rejected without touching any state when `text` is blank or the
    /// connection is not `Open`; nothing is queued for later. On success the
    /// `User` message is in the transcript before any response arrives.
    pub fn send_query(&mut self, text: &str) -> Result<&Message, SessionError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SessionError::EmptyQuery);
        }
        if !self.connection.state().is_open() {
            debug!("Query refused while {}", self.connection.state());
            return Err(SessionError::NotConnected);
        }

        if let Err(e) = self.connection.transmit(&ClientFrame::query(text)) {
            if let SessionError::ConnectionFailure(reason) = &e {
                self.record_error("connection", reason.clone());
                self.publish();
            }
            return Err(e);
        }
        self.awaiting_response = true;

        let sequence = self.log.append(NewMessage::user(text)).sequence;
        info!("Query sent (#{}): {}", sequence, preview(text, 60));
        self.conversation_logger.log(ConversationEvent::new(
            "query_sent",
            json!({ "sequence": sequence, "content": text }),
        ));

        self.publish();
        Ok(&self.log.all()[sequence as usize])
    }

    /// Apply one transport event and publish the result.
    ///
    /// Returns `false` when the event changed nothing (malformed or stale
    /// frames); no snapshot is published in that case.
    pub fn handle_event(&mut self, event: ConnectionEvent) -> bool {
        let Some(event) = self.connection.apply(event) else {
            return false;
        };

        match event {
            ManagedEvent::Opened => {
                self.last_error = None;
                self.log_state();
            }
            ManagedEvent::Response(content) => {
                let stored = self.log.append(NewMessage::assistant(content));
                info!(
                    "Response received (#{}, {} bytes)",
                    stored.sequence,
                    stored.content.len()
                );
                let payload = json!({ "sequence": stored.sequence, "content": stored.content });
                self.awaiting_response = false;
                self.conversation_logger
                    .log(ConversationEvent::new("response_received", payload));
            }
            ManagedEvent::ServerError(reason) => {
                let sequence = self.log.append(NewMessage::assistant(&reason)).sequence;
                debug!("Service error stored as #{}", sequence);
                self.record_error("service", reason);
            }
            ManagedEvent::Failed(reason) => {
                self.record_error("connection", reason);
                self.log_state();
            }
            ManagedEvent::Closed => {
                if self.awaiting_response {
                    warn!("Connection closed with a query outstanding");
                }
                self.awaiting_response = false;
                self.log_state();
            }
        }

        self.publish();
        true
    }

    /// Wait for the next transport event, apply it, and return the snapshot.
    ///
    /// Events that change nothing are skipped. Returns `None` only when the
    /// event channel is gone.
    pub async fn next_event(&mut self) -> Option<SessionSnapshot> {
        loop {
            let event = self.events.recv().await?;
            if self.handle_event(event) {
                return Some(self.snapshot());
            }
        }
    }

    /// Current state as an owned copy.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            connection_state: self.connection.state().clone(),
            messages: self.log.all().to_vec(),
            awaiting_response: self.awaiting_response,
            last_error: self.last_error.clone(),
            error_count: self.error_count,
        }
    }

    /// Receive every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot_tx.subscribe()
    }

    fn record_error(&mut self, source: &'static str, reason: String) {
        self.awaiting_response = false;
        self.conversation_logger.log(ConversationEvent::new(
            "session_error",
            json!({ "source": source, "reason": reason }),
        ));
        self.last_error = Some(reason);
        self.error_count += 1;
    }

    fn log_state(&self) {
        let state = self.connection.state();
        self.conversation_logger.log(ConversationEvent::new(
            "connection_state",
            json!({ "endpoint": self.connection.endpoint().as_str(), "state": state.to_string() }),
        ));
    }

    fn publish(&self) {
        self.snapshot_tx.send_replace(self.snapshot());
    }
}
