//! HTTP upload gateway
//!
//! Sends one `multipart/form-data` POST per upload:
//!
//! | Field | Content |
//! |-------|---------|
//! | `contract_files` | every PDF document (repeated field) |
//! | `metadata_file` | first spreadsheet |
//! | `category_file` | second spreadsheet |
//!
//! A 2xx response carries `{"message": ...}`; failures carry a FastAPI style
//! `{"detail": ...}` body whose text is surfaced to the user.

use async_trait::async_trait;
use docchat_application::UploadGateway;
use docchat_domain::{Attachment, UploadError, UploadReceipt, UploadRequest};
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_UPLOAD_URL: &str = "http://localhost:8000/upload";

/// Upload gateway backed by `reqwest`.
pub struct HttpUploadGateway {
    client: reqwest::Client,
    url: String,
}

impl HttpUploadGateway {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, UploadError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| UploadError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn build_form(request: &UploadRequest) -> Result<Form, UploadError> {
        let mut form = Form::new();
        for document in &request.documents {
            form = form.part("contract_files", part(document)?);
        }
        Ok(form
            .part("metadata_file", part(&request.metadata)?)
            .part("category_file", part(&request.category)?))
    }
}

fn part(attachment: &Attachment) -> Result<Part, UploadError> {
    Part::bytes(attachment.bytes.clone())
        .file_name(attachment.file_name.clone())
        .mime_str(attachment.mime_type())
        .map_err(|e| UploadError::Transport(e.to_string()))
}

/// Extract the human-readable failure reason from an error body.
fn error_detail(status: reqwest::StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("detail").cloned());
    match detail {
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
        None => format!(
            "HTTP {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown")
        ),
    }
}

#[async_trait]
impl UploadGateway for HttpUploadGateway {
    async fn upload(&self, request: &UploadRequest) -> Result<UploadReceipt, UploadError> {
        let form = Self::build_form(request)?;
        debug!("POST {} ({} files)", self.url, request.file_names().len());

        let response = self
            .client
            .post(&self.url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| UploadError::Transport(e.to_string()))?;

        if !status.is_success() {
            let detail = error_detail(status, &body);
            warn!("Upload rejected ({}): {}", status, detail);
            return Err(UploadError::Rejected(detail));
        }

        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| "Files uploaded".to_string());
        Ok(UploadReceipt { message })
    }
}
