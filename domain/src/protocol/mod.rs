//! Wire protocol of the chat service.
//!
//! JSON text frames exchanged over the duplex connection:
//!
//! - Client → Server: `{"type": "query", "content": "<user text>"}`
//! - Server → Client: `{"type": "response", "content": <text or structured>}`
//! - Server → Client: `{"type": "error", "content": "<reason>"}`

pub mod frame;
