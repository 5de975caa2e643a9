//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod connection_manager;
pub mod session_controller;
pub mod upload_documents;

#[cfg(test)]
pub(crate) mod test_support;
