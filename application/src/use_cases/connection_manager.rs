//! Connection manager.
//!
//! Owns exactly one duplex connection and its [`ConnectionState`]. The manager
//! is the only place that
//!
//! - decides whether a frame may be sent (`Open` only, no buffering), and
//! - turns raw [`ConnectionEvent`]s into typed [`ManagedEvent`]s, parsing
//!   frames and dropping malformed or stale ones.
//!
//! State machine: `Idle → Connecting → Open → {Closed | Failed}`. There is no
//! reconnection; once `Closed` or `Failed`, a new manager is needed.

use crate::ports::duplex::{
    ConnectionEvent, DuplexConnector, DuplexLink, EventReceiver, EventSender, TransportError,
};
use docchat_domain::{ClientFrame, ConnectionState, Endpoint, ServerFrame, preview};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

/// Errors surfaced by the session core
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Not connected")]
    NotConnected,

    #[error("Connection failure: {0}")]
    ConnectionFailure(String),

    #[error("Malformed frame: {0}")]
    MalformedFrame(String),

    #[error("Query is empty")]
    EmptyQuery,

    #[error("Connection already started")]
    AlreadyStarted,

    #[error("Connection already terminated, start a new session")]
    Terminated,
}

/// Event after the manager has applied it to its own state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManagedEvent {
    Opened,
    Response(String),
    /// The service reported that it could not answer
    ServerError(String),
    Failed(String),
    Closed,
}

/// Owner of one duplex connection.
///
/// Dropping the manager closes the connection.
pub struct ConnectionManager {
    connector: Arc<dyn DuplexConnector>,
    endpoint: Endpoint,
    state: ConnectionState,
    link: Option<Box<dyn DuplexLink>>,
    events_tx: EventSender,
}

impl ConnectionManager {
    /// Create an `Idle` manager for `endpoint`.
    ///
    /// Returns the receiving end of the event channel; the caller must feed
    /// every received event back through [`apply`](Self::apply).
    pub fn new(connector: Arc<dyn DuplexConnector>, endpoint: Endpoint) -> (Self, EventReceiver) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let manager = Self {
            connector,
            endpoint,
            state: ConnectionState::Idle,
            link: None,
            events_tx,
        };
        (manager, events_rx)
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Begin connection establishment (`Idle → Connecting`).
    pub fn open(&mut self) -> Result<(), SessionError> {
        match self.state {
            ConnectionState::Idle => {}
            ConnectionState::Connecting | ConnectionState::Open => {
                return Err(SessionError::AlreadyStarted);
            }
            ConnectionState::Closed | ConnectionState::Failed(_) => {
                return Err(SessionError::Terminated);
            }
        }

        info!("Connecting to {}", self.endpoint);
        self.state = ConnectionState::Connecting;
        self.link = Some(
            self.connector
                .connect(&self.endpoint, self.events_tx.clone()),
        );
        Ok(())
    }

    /// Send a query frame. Refused unless the connection is `Open`.
    pub fn transmit(&self, frame: &ClientFrame) -> Result<(), SessionError> {
        let link = match (&self.state, &self.link) {
            (ConnectionState::Open, Some(link)) => link,
            _ => {
                debug!("Refusing to transmit while {}", self.state);
                return Err(SessionError::NotConnected);
            }
        };

        let text = frame
            .encode()
            .map_err(|e| SessionError::MalformedFrame(e.to_string()))?;
        trace!("Transmitting: {}", text);

        link.send_text(text).map_err(|e| match e {
            TransportError::LinkClosed => {
                warn!("Link closed before its close event was processed");
                SessionError::NotConnected
            }
            TransportError::SendFailed(reason) => SessionError::ConnectionFailure(reason),
        })
    }

    /// Release the connection and move to `Closed`, whatever the prior state.
    pub fn close(&mut self) {
        if let Some(mut link) = self.link.take() {
            info!("Closing connection to {}", self.endpoint);
            link.close();
        }
        self.state = ConnectionState::Closed;
    }

    /// Apply one transport event and return what it means for the session.
    ///
    /// Returns `None` for events that change nothing: malformed frames,
    /// duplicates, and anything arriving after the connection ended.
    pub fn apply(&mut self, event: ConnectionEvent) -> Option<ManagedEvent> {
        let state = self.state.clone();
        match (state, event) {
            (ConnectionState::Closed, event) => {
                debug!("Ignoring {:?} after close", event);
                None
            }
            (ConnectionState::Failed(_), ConnectionEvent::Closed) => {
                self.release_link();
                self.state = ConnectionState::Closed;
                Some(ManagedEvent::Closed)
            }
            (ConnectionState::Failed(_), event) => {
                debug!("Ignoring {:?} after failure", event);
                None
            }
            (ConnectionState::Idle, event) => {
                debug!("Ignoring {:?} before open", event);
                None
            }
            (ConnectionState::Connecting, ConnectionEvent::Opened) => {
                info!("Connected to {}", self.endpoint);
                self.state = ConnectionState::Open;
                Some(ManagedEvent::Opened)
            }
            (ConnectionState::Open, ConnectionEvent::Opened) => {
                debug!("Duplicate open event ignored");
                None
            }
            (ConnectionState::Open, ConnectionEvent::Frame(text)) => self.decode_frame(&text),
            (ConnectionState::Connecting, ConnectionEvent::Frame(text)) => {
                warn!("Frame before open dropped: {}", preview(&text, 80));
                None
            }
            (_, ConnectionEvent::Errored(reason)) => {
                warn!("Connection to {} failed: {}", self.endpoint, reason);
                self.release_link();
                self.state = ConnectionState::Failed(reason.clone());
                Some(ManagedEvent::Failed(reason))
            }
            (_, ConnectionEvent::Closed) => {
                info!("Connection to {} closed", self.endpoint);
                self.release_link();
                self.state = ConnectionState::Closed;
                Some(ManagedEvent::Closed)
            }
        }
    }

    fn decode_frame(&self, text: &str) -> Option<ManagedEvent> {
        match ServerFrame::decode(text) {
            Ok(ServerFrame::Response { content }) => {
                debug!("Response frame ({} bytes)", content.len());
                Some(ManagedEvent::Response(content))
            }
            Ok(ServerFrame::Error { message }) => {
                warn!("Service reported an error: {}", message);
                Some(ManagedEvent::ServerError(message))
            }
            Err(e) => {
                warn!("Dropping malformed frame ({}): {}", e, preview(text, 120));
                None
            }
        }
    }

    fn release_link(&mut self) {
        if let Some(mut link) = self.link.take() {
            link.close();
        }
    }
}

impl Drop for ConnectionManager {
    fn drop(&mut self) {
        self.release_link();
    }
}
