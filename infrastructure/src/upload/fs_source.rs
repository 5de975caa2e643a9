//! File system attachment source

use async_trait::async_trait;
use docchat_application::AttachmentSource;
use docchat_domain::{Attachment, UploadError};
use std::path::Path;
use tracing::debug;

/// Reads attachments with `tokio::fs`.
#[derive(Debug, Default, Clone)]
pub struct FsAttachmentSource;

impl FsAttachmentSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AttachmentSource for FsAttachmentSource {
    async fn load(&self, path: &Path) -> Result<Attachment, UploadError> {
        let io_error = |reason: String| UploadError::Io {
            path: path.display().to_string(),
            reason,
        };

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| io_error("not a file".to_string()))?;
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| io_error(e.to_string()))?;

        debug!("Loaded {} ({} bytes)", path.display(), bytes.len());
        Ok(Attachment::new(file_name, bytes))
    }
}
