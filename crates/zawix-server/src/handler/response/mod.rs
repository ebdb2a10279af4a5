//! Response types for HTTP handlers.

mod downloads;
mod errors;

pub use downloads::{APK_FILE_NAME, DownloadUrl, FileDownload};
pub use errors::ErrorResponse;
