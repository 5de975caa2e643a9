//! WebSocket transport
//!
//! Implements the [`DuplexConnector`](docchat_application::DuplexConnector)
//! port over `tokio-tungstenite`.

pub mod connector;

pub use connector::{WebSocketConnector, WebSocketLink};
