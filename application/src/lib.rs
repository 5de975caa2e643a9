//! Application layer for docchat
//!
//! This crate contains the session use cases and the port definitions that
//! infrastructure adapters implement. It depends only on the domain layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    duplex::{
        ConnectionEvent, DuplexConnector, DuplexLink, EventReceiver, EventSender, TransportError,
    },
    upload_gateway::{AttachmentSource, UploadGateway},
};
pub use use_cases::connection_manager::{ConnectionManager, ManagedEvent, SessionError};
pub use use_cases::session_controller::SessionController;
pub use use_cases::upload_documents::{UploadDocumentsOutput, UploadDocumentsUseCase};
