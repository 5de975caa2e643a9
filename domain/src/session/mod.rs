//! Chat session domain.
//!
//! - [`entities::Message`]: one entry of the transcript
//! - [`log::MessageLog`]: append-only, strictly ordered transcript
//! - [`state::ConnectionState`]: lifecycle of the duplex connection
//! - [`snapshot::SessionSnapshot`]: read-only view handed to presentation
//! - [`endpoint::Endpoint`]: validated address of the chat service

pub mod endpoint;
pub mod entities;
pub mod log;
pub mod snapshot;
pub mod state;
