//! WebSocket connector and link.
//!
//! Each [`WebSocketLink`] is backed by one spawned handler task that owns the
//! socket exclusively. The task
//!
//! 1. connects and emits `Opened` (or `Errored` + `Closed` on failure),
//! 2. forwards queued outgoing text frames and incoming text frames until
//!    either side closes or the link is cancelled,
//! 3. sends a close frame on the way out and always emits `Closed` last.
//!
//! Writes never block the caller: [`send_text`](DuplexLink::send_text) only
//! pushes onto an unbounded channel drained by the handler task.

use docchat_application::{
    ConnectionEvent, DuplexConnector, DuplexLink, EventSender, TransportError,
};
use docchat_domain::Endpoint;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Opens WebSocket links on the current Tokio runtime.
#[derive(Debug, Default, Clone)]
pub struct WebSocketConnector;

impl WebSocketConnector {
    pub fn new() -> Self {
        Self
    }
}

impl DuplexConnector for WebSocketConnector {
    fn connect(&self, endpoint: &Endpoint, events: EventSender) -> Box<dyn DuplexLink> {
        let (outgoing_tx, outgoing_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let url = endpoint.as_str().to_string();
        let task_cancel = cancel.clone();
        tokio::spawn(async move {
            run_link(url, outgoing_rx, events, task_cancel).await;
        });

        Box::new(WebSocketLink {
            outgoing: outgoing_tx,
            cancel,
        })
    }
}

/// Handle to one WebSocket connection.
///
/// Dropping the link cancels its handler task.
pub struct WebSocketLink {
    outgoing: mpsc::UnboundedSender<String>,
    cancel: CancellationToken,
}

impl DuplexLink for WebSocketLink {
    fn send_text(&self, text: String) -> Result<(), TransportError> {
        if self.cancel.is_cancelled() {
            return Err(TransportError::LinkClosed);
        }
        self.outgoing
            .send(text)
            .map_err(|_| TransportError::LinkClosed)
    }

    fn close(&mut self) {
        self.cancel.cancel();
    }
}

impl Drop for WebSocketLink {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Connect, then pump frames until the connection ends.
async fn run_link(
    url: String,
    outgoing: mpsc::UnboundedReceiver<String>,
    events: EventSender,
    cancel: CancellationToken,
) {
    let connected = tokio::select! {
        _ = cancel.cancelled() => {
            debug!("Connection to {} cancelled before it was established", url);
            let _ = events.send(ConnectionEvent::Closed);
            return;
        }
        result = connect_async(url.as_str()) => result,
    };

    let ws = match connected {
        Ok((ws, _response)) => ws,
        Err(e) => {
            warn!("WebSocket connect to {} failed: {}", url, e);
            let _ = events.send(ConnectionEvent::Errored(e.to_string()));
            let _ = events.send(ConnectionEvent::Closed);
            return;
        }
    };

    info!("WebSocket connected: {}", url);
    let _ = events.send(ConnectionEvent::Opened);

    if let Some(reason) = pump(ws, outgoing, &events, &cancel).await {
        let _ = events.send(ConnectionEvent::Errored(reason));
    }
    let _ = events.send(ConnectionEvent::Closed);
    debug!("WebSocket handler for {} finished", url);
}

/// Forward frames in both directions.
///
/// Returns the failure reason when the connection ended abnormally, `None`
/// on an orderly close from either side.
async fn pump(
    ws: WsStream,
    mut outgoing: mpsc::UnboundedReceiver<String>,
    events: &EventSender,
    cancel: &CancellationToken,
) -> Option<String> {
    let (mut ws_tx, mut ws_rx) = ws.split();

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                if let Err(e) = ws_tx.send(Message::Close(None)).await {
                    debug!("Close frame not sent: {}", e);
                }
                return None;
            }
            text = outgoing.recv() => {
                let Some(text) = text else {
                    let _ = ws_tx.send(Message::Close(None)).await;
                    return None;
                };
                trace!("WebSocket send: {}", text);
                if let Err(e) = ws_tx.send(Message::Text(text.into())).await {
                    return Some(e.to_string());
                }
            }
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        trace!("WebSocket recv: {}", text.as_str());
                        let _ = events.send(ConnectionEvent::Frame(text.as_str().to_string()));
                    }
                    Some(Ok(Message::Binary(bytes))) => {
                        match String::from_utf8(bytes.to_vec()) {
                            Ok(text) => {
                                let _ = events.send(ConnectionEvent::Frame(text));
                            }
                            Err(_) => warn!("Dropping non-UTF-8 binary frame ({} bytes)", bytes.len()),
                        }
                    }
                    Some(Ok(Message::Close(frame))) => {
                        info!("Server closed the connection: {:?}", frame);
                        return None;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Some(e.to_string()),
                    None => return None,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_endpoint_reports_error_then_close() {
        // Port 9 (discard) is closed on test machines.
        let endpoint = Endpoint::parse("ws://127.0.0.1:9/ws").unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _link = WebSocketConnector::new().connect(&endpoint, tx);

        assert!(matches!(rx.recv().await, Some(ConnectionEvent::Errored(_))));
        assert_eq!(rx.recv().await, Some(ConnectionEvent::Closed));
    }

    #[tokio::test]
    async fn test_secure_endpoint_attempts_tls_handshake() {
        // A plain TCP peer that hangs up fails the TLS handshake itself.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            drop(stream);
        });

        let endpoint = Endpoint::parse(&format!("wss://{addr}/ws")).unwrap();
        assert!(endpoint.is_secure());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _link = WebSocketConnector::new().connect(&endpoint, tx);

        let Some(ConnectionEvent::Errored(reason)) = rx.recv().await else {
            panic!("expected a connection error");
        };
        assert!(!reason.contains("TLS support not compiled in"), "{reason}");
        assert_eq!(rx.recv().await, Some(ConnectionEvent::Closed));
    }

    #[tokio::test]
    async fn test_closed_link_refuses_sends() {
        let endpoint = Endpoint::parse("ws://127.0.0.1:9/ws").unwrap();
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut link = WebSocketConnector::new().connect(&endpoint, tx);

        link.close();
        link.close();
        assert_eq!(
            link.send_text("{}".to_string()),
            Err(TransportError::LinkClosed)
        );
    }
}
