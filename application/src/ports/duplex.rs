//! Duplex transport port
//!
//! Defines the contract between the session manager and a concrete duplex
//! transport (WebSocket in infrastructure, scripted mocks in tests).
//!
//! Transport callbacks (open / message / error / close) are delivered as a
//! uniform [`ConnectionEvent`] through an `mpsc` channel, so the consumer
//! processes them strictly in arrival order on its own task.

use docchat_domain::Endpoint;
use thiserror::Error;
use tokio::sync::mpsc;

/// Raw notification emitted by a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// The connection is established
    Opened,
    /// One text frame arrived (not yet parsed)
    Frame(String),
    /// The transport failed; no further frames will arrive
    Errored(String),
    /// The connection was closed by either side
    Closed,
}

/// Sending half of the event channel handed to a transport
pub type EventSender = mpsc::UnboundedSender<ConnectionEvent>;

/// Receiving half of the event channel, owned by the session
pub type EventReceiver = mpsc::UnboundedReceiver<ConnectionEvent>;

/// Errors reported by a live link
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Link closed")]
    LinkClosed,

    #[error("Send failed: {0}")]
    SendFailed(String),
}

/// Factory for duplex links
///
/// `connect` must return immediately; connection progress is reported on
/// `events` (`Opened` on success, `Errored` then `Closed` on failure).
pub trait DuplexConnector: Send + Sync {
    fn connect(&self, endpoint: &Endpoint, events: EventSender) -> Box<dyn DuplexLink>;
}

/// One established (or establishing) duplex connection
pub trait DuplexLink: Send {
    /// Hand a text frame to the transport without waiting for the write.
    fn send_text(&self, text: String) -> Result<(), TransportError>;

    /// Release the connection. Calling it twice is harmless.
    fn close(&mut self);
}
