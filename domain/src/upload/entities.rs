//! Upload entities and assembly rules

use super::error::UploadError;
use serde::{Deserialize, Serialize};

/// Kind of an attachment, derived from its file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    /// PDF document to analyse
    Document,
    /// Excel workbook (metadata or category sheet)
    Spreadsheet,
    /// Anything else; skipped during assembly
    Unsupported,
}

impl AttachmentKind {
    pub fn from_file_name(name: &str) -> Self {
        let ext = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "pdf" => AttachmentKind::Document,
            "xlsx" | "xls" => AttachmentKind::Spreadsheet,
            _ => AttachmentKind::Unsupported,
        }
    }
}

/// A file selected for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub kind: AttachmentKind,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let kind = AttachmentKind::from_file_name(&file_name);
        Self {
            file_name,
            kind,
            bytes,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self.kind {
            AttachmentKind::Document => "application/pdf",
            AttachmentKind::Spreadsheet if self.file_name.to_ascii_lowercase().ends_with(".xls") => {
                "application/vnd.ms-excel"
            }
            AttachmentKind::Spreadsheet => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            AttachmentKind::Unsupported => "application/octet-stream",
        }
    }
}

/// A validated upload: documents plus the two auxiliary spreadsheets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub documents: Vec<Attachment>,
    pub metadata: Attachment,
    pub category: Attachment,
}

impl UploadRequest {
    /// Sort `attachments` into an upload request.
    ///
    /// The first spreadsheet is the metadata sheet, the second the category
    /// sheet; extra spreadsheets and unsupported files are dropped.
    pub fn assemble(attachments: Vec<Attachment>) -> Result<Self, UploadError> {
        let (documents, rest): (Vec<_>, Vec<_>) = attachments
            .into_iter()
            .partition(|a| a.kind == AttachmentKind::Document);
        let sheets: Vec<_> = rest
            .into_iter()
            .filter(|a| a.kind == AttachmentKind::Spreadsheet)
            .collect();

        let found = sheets.len();
        let mut sheets = sheets.into_iter();
        let (Some(metadata), Some(category)) = (sheets.next(), sheets.next()) else {
            return Err(UploadError::MissingAuxiliaryFiles { found });
        };

        if documents.is_empty() {
            return Err(UploadError::NoDocuments);
        }

        Ok(Self {
            documents,
            metadata,
            category,
        })
    }

    /// File names in upload order
    pub fn file_names(&self) -> Vec<&str> {
        self.documents
            .iter()
            .chain([&self.metadata, &self.category])
            .map(|a| a.file_name.as_str())
            .collect()
    }
}

/// Successful upload acknowledgement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub message: String,
}
