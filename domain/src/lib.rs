//! Domain layer for docchat
//!
//! This crate contains the core entities and value objects of the chat
//! session. It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! - **Transcript**: an append-only [`MessageLog`] of [`Message`]s, ordered by
//!   the sequence number assigned at append time
//! - **Connection lifecycle**: [`ConnectionState`] of the single duplex
//!   connection to the chat service at [`Endpoint`]
//! - **Snapshot**: [`SessionSnapshot`], the read-only view rendered by the
//!   presentation layer
//! - **Upload**: assembly rules for the document upload collaborator

pub mod core;
pub mod protocol;
pub mod session;
pub mod upload;

// Re-export commonly used types
pub use core::{error::DomainError, string::preview};
pub use protocol::frame::{ClientFrame, ServerFrame};
pub use session::{
    endpoint::{DEFAULT_ENDPOINT, Endpoint},
    entities::{Message, NewMessage, Role},
    log::MessageLog,
    snapshot::SessionSnapshot,
    state::ConnectionState,
};
pub use upload::{
    entities::{Attachment, AttachmentKind, UploadReceipt, UploadRequest},
    error::UploadError,
};
