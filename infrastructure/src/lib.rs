//! Infrastructure layer for docchat
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: the WebSocket transport, the HTTP upload gateway, the
//! JSONL transcript logger, and configuration file loading.

pub mod config;
pub mod logging;
pub mod upload;
pub mod websocket;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileConnectionConfig, FileLoggingConfig,
    FileReplConfig, FileUploadConfig,
};
pub use logging::JsonlConversationLogger;
pub use upload::{DEFAULT_UPLOAD_URL, FsAttachmentSource, HttpUploadGateway};
pub use websocket::{WebSocketConnector, WebSocketLink};
