//! Document upload domain.
//!
//! The upload service accepts one or more documents plus exactly two
//! spreadsheets (a metadata sheet and a category sheet). This module holds the
//! classification and assembly rules; the transport lives in infrastructure.

pub mod entities;
pub mod error;
