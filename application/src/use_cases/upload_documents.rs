//! Upload documents use case
//!
//! Loads the selected files, sorts them into an [`UploadRequest`] and hands it
//! to the [`UploadGateway`]. Runs independently of any chat session.
//!
//! Files are classified by extension: `.pdf` files are contract documents,
//! the first `.xlsx`/`.xls` file is the metadata sheet and the second the
//! category sheet. Anything else is skipped with a warning before any file is
//! read.

use crate::ports::upload_gateway::{AttachmentSource, UploadGateway};
use docchat_domain::{AttachmentKind, UploadError, UploadReceipt, UploadRequest};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Result of a successful upload
#[derive(Debug, Clone)]
pub struct UploadDocumentsOutput {
    pub receipt: UploadReceipt,
    /// File names in the order they were sent
    pub uploaded: Vec<String>,
    /// Paths skipped because of their extension
    pub skipped: Vec<PathBuf>,
}

/// Use case for sending documents to the analysis service
pub struct UploadDocumentsUseCase {
    source: Arc<dyn AttachmentSource>,
    gateway: Arc<dyn UploadGateway>,
}

impl UploadDocumentsUseCase {
    pub fn new(source: Arc<dyn AttachmentSource>, gateway: Arc<dyn UploadGateway>) -> Self {
        Self { source, gateway }
    }

    pub async fn execute(&self, paths: &[PathBuf]) -> Result<UploadDocumentsOutput, UploadError> {
        let (selected, skipped): (Vec<&PathBuf>, Vec<&PathBuf>) = paths
            .iter()
            .partition(|p| kind_of(p) != AttachmentKind::Unsupported);
        for path in &skipped {
            warn!("Skipping unsupported file: {}", path.display());
        }

        // Validate the selection before reading anything.
        let sheets = selected
            .iter()
            .filter(|p| kind_of(p) == AttachmentKind::Spreadsheet)
            .count();
        if sheets < 2 {
            return Err(UploadError::MissingAuxiliaryFiles { found: sheets });
        }
        if sheets == selected.len() {
            return Err(UploadError::NoDocuments);
        }

        let mut attachments = Vec::with_capacity(selected.len());
        for path in selected {
            attachments.push(self.source.load(path).await?);
        }

        let request = UploadRequest::assemble(attachments)?;
        let uploaded: Vec<String> = request
            .file_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        info!(
            "Uploading {} document(s) with {} and {}",
            request.documents.len(),
            request.metadata.file_name,
            request.category.file_name
        );

        let receipt = self.gateway.upload(&request).await?;
        info!("Upload accepted: {}", receipt.message);

        Ok(UploadDocumentsOutput {
            receipt,
            uploaded,
            skipped: skipped.into_iter().cloned().collect(),
        })
    }
}

fn kind_of(path: &Path) -> AttachmentKind {
    path.file_name()
        .map(|name| AttachmentKind::from_file_name(&name.to_string_lossy()))
        .unwrap_or(AttachmentKind::Unsupported)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use docchat_domain::Attachment;
    use std::sync::Mutex;

    struct FakeSource;

    #[async_trait]
    impl AttachmentSource for FakeSource {
        async fn load(&self, path: &Path) -> Result<Attachment, UploadError> {
            let name = path.file_name().unwrap().to_string_lossy().to_string();
            if name.starts_with("missing") {
                return Err(UploadError::Io {
                    path: path.display().to_string(),
                    reason: "No such file or directory".to_string(),
                });
            }
            Ok(Attachment::new(name, b"bytes".to_vec()))
        }
    }

    #[derive(Default)]
    struct MockGateway {
        requests: Mutex<Vec<UploadRequest>>,
        reject_with: Option<String>,
    }

    #[async_trait]
    impl UploadGateway for MockGateway {
        async fn upload(&self, request: &UploadRequest) -> Result<UploadReceipt, UploadError> {
            self.requests.lock().unwrap().push(request.clone());
            match &self.reject_with {
                Some(detail) => Err(UploadError::Rejected(detail.clone())),
                None => Ok(UploadReceipt {
                    message: "Files processed successfully".to_string(),
                }),
            }
        }
    }

    fn use_case(gateway: Arc<MockGateway>) -> UploadDocumentsUseCase {
        UploadDocumentsUseCase::new(Arc::new(FakeSource), gateway)
    }

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[tokio::test]
    async fn test_upload_sorts_files_into_roles() {
        let gateway = Arc::new(MockGateway::default());
        let output = use_case(gateway.clone())
            .execute(&paths(&["docs/a.pdf", "meta.xlsx", "b.PDF", "cats.xls"]))
            .await
            .unwrap();

        assert_eq!(output.receipt.message, "Files processed successfully");
        assert_eq!(output.uploaded, vec!["a.pdf", "b.PDF", "meta.xlsx", "cats.xls"]);
        assert!(output.skipped.is_empty());

        let requests = gateway.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].metadata.file_name, "meta.xlsx");
        assert_eq!(requests[0].category.file_name, "cats.xls");
    }

    #[tokio::test]
    async fn test_unsupported_files_are_skipped() {
        let gateway = Arc::new(MockGateway::default());
        let output = use_case(gateway)
            .execute(&paths(&["a.pdf", "notes.txt", "m.xlsx", "c.xlsx"]))
            .await
            .unwrap();
        assert_eq!(output.skipped, paths(&["notes.txt"]));
        assert_eq!(output.uploaded.len(), 3);
    }

    #[tokio::test]
    async fn test_fewer_than_two_spreadsheets_is_refused_before_upload() {
        let gateway = Arc::new(MockGateway::default());
        let err = use_case(gateway.clone())
            .execute(&paths(&["a.pdf", "meta.xlsx"]))
            .await
            .unwrap_err();
        assert_eq!(err, UploadError::MissingAuxiliaryFiles { found: 1 });
        assert!(gateway.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_spreadsheets_only_is_refused() {
        let gateway = Arc::new(MockGateway::default());
        let err = use_case(gateway)
            .execute(&paths(&["meta.xlsx", "cats.xlsx"]))
            .await
            .unwrap_err();
        assert_eq!(err, UploadError::NoDocuments);
    }

    #[tokio::test]
    async fn test_unreadable_file_stops_upload() {
        let gateway = Arc::new(MockGateway::default());
        let err = use_case(gateway.clone())
            .execute(&paths(&["missing.pdf", "m.xlsx", "c.xlsx"]))
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::Io { .. }));
        assert!(gateway.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_service_rejection_is_reported() {
        let gateway = Arc::new(MockGateway {
            reject_with: Some("Invalid metadata sheet".to_string()),
            ..Default::default()
        });
        let err = use_case(gateway)
            .execute(&paths(&["a.pdf", "m.xlsx", "c.xlsx"]))
            .await
            .unwrap_err();
        assert_eq!(err, UploadError::Rejected("Invalid metadata sheet".to_string()));
    }
}
