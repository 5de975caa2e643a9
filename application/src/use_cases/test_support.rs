//! Scripted duplex transport shared by the session tests.

use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use crate::ports::duplex::{
    ConnectionEvent, DuplexConnector, DuplexLink, EventSender, TransportError,
};
use docchat_domain::Endpoint;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Shared {
    endpoints: Vec<String>,
    sent: Vec<String>,
    closed_links: usize,
    dead: bool,
    send_failure: Option<String>,
    events: Option<EventSender>,
}

/// Connector whose links record outgoing frames instead of sending them.
pub struct MockConnector {
    shared: Arc<Mutex<Shared>>,
}

impl MockConnector {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared::default())),
        }
    }

    pub fn connect_count(&self) -> usize {
        self.shared.lock().unwrap().endpoints.len()
    }

    pub fn last_endpoint(&self) -> Option<String> {
        self.shared.lock().unwrap().endpoints.last().cloned()
    }

    pub fn sent(&self) -> Vec<String> {
        self.shared.lock().unwrap().sent.clone()
    }

    pub fn closed_links(&self) -> usize {
        self.shared.lock().unwrap().closed_links
    }

    /// Make every link refuse further sends, as if its socket task ended.
    pub fn kill_links(&self) {
        self.shared.lock().unwrap().dead = true;
    }

    /// Make every send fail with `reason` while the link stays open.
    pub fn fail_sends(&self, reason: &str) {
        self.shared.lock().unwrap().send_failure = Some(reason.to_string());
    }

    /// Push an event as the transport would.
    pub fn emit(&self, event: ConnectionEvent) {
        let shared = self.shared.lock().unwrap();
        shared
            .events
            .as_ref()
            .expect("connect() not called")
            .send(event)
            .unwrap();
    }
}

impl DuplexConnector for MockConnector {
    fn connect(&self, endpoint: &Endpoint, events: EventSender) -> Box<dyn DuplexLink> {
        let mut shared = self.shared.lock().unwrap();
        shared.endpoints.push(endpoint.to_string());
        shared.events = Some(events);
        Box::new(MockLink {
            shared: Arc::clone(&self.shared),
            closed: false,
        })
    }
}

struct MockLink {
    shared: Arc<Mutex<Shared>>,
    closed: bool,
}

impl DuplexLink for MockLink {
    fn send_text(&self, text: String) -> Result<(), TransportError> {
        let mut shared = self.shared.lock().unwrap();
        if self.closed || shared.dead {
            return Err(TransportError::LinkClosed);
        }
        if let Some(reason) = &shared.send_failure {
            return Err(TransportError::SendFailed(reason.clone()));
        }
        shared.sent.push(text);
        Ok(())
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.shared.lock().unwrap().closed_links += 1;
        }
    }
}

/// Logger that keeps event types in memory.
#[derive(Default)]
pub struct RecordingLogger {
    events: Mutex<Vec<(&'static str, serde_json::Value)>>,
}

impl RecordingLogger {
    pub fn event_types(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().iter().map(|(t, _)| *t).collect()
    }

    pub fn payloads(&self, event_type: &str) -> Vec<serde_json::Value> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(t, _)| *t == event_type)
            .map(|(_, p)| p.clone())
            .collect()
    }
}

impl ConversationLogger for RecordingLogger {
    fn log(&self, event: ConversationEvent) {
        self.events
            .lock()
            .unwrap()
            .push((event.event_type, event.payload));
    }
}
