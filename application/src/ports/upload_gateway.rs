//! Upload ports
//!
//! The upload service is invoked independently of the chat session; these
//! ports let the upload use case stay free of file system and HTTP details.

use async_trait::async_trait;
use docchat_domain::{Attachment, UploadError, UploadReceipt, UploadRequest};
use std::path::Path;

/// Sends an assembled upload to the document service
#[async_trait]
pub trait UploadGateway: Send + Sync {
    async fn upload(&self, request: &UploadRequest) -> Result<UploadReceipt, UploadError>;
}

/// Reads a local file into an [`Attachment`]
#[async_trait]
pub trait AttachmentSource: Send + Sync {
    async fn load(&self, path: &Path) -> Result<Attachment, UploadError>;
}
