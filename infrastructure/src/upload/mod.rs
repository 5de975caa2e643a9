//! Document upload adapters
//!
//! - [`HttpUploadGateway`]: multipart POST to the analysis service
//! - [`FsAttachmentSource`]: reads selected files from disk

pub mod fs_source;
pub mod http_gateway;

pub use fs_source::FsAttachmentSource;
pub use http_gateway::{DEFAULT_UPLOAD_URL, HttpUploadGateway};
