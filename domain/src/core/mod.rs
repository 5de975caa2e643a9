//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`]: domain-level errors
//! - [`string::preview`]: single-line previews for logs and status lines

pub mod error;
pub mod string;
