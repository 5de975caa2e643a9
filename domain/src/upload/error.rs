//! Upload error types

use thiserror::Error;

/// Errors raised while assembling or sending an upload
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("Please upload both metadata and category spreadsheets (found {found})")]
    MissingAuxiliaryFiles { found: usize },

    #[error("At least one PDF document is required")]
    NoDocuments,

    #[error("Could not read {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("Upload rejected: {0}")]
    Rejected(String),

    #[error("Upload transport error: {0}")]
    Transport(String),
}

impl UploadError {
    /// True when the request never left the client
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            UploadError::MissingAuxiliaryFiles { .. }
                | UploadError::NoDocuments
                | UploadError::Io { .. }
        )
    }
}
