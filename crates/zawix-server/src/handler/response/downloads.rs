use axum::Json;
use axum::body::Body;
use axum::http::header::{self, HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::service::TransferStream;

/// File name every download is offered under.
pub const APK_FILE_NAME: &str = "zawixLauncher.apk";

/// Content type used when the upstream does not send one.
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Response body of the download location endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadUrl {
    /// Configured upstream location.
    pub download_url: String,
}

impl IntoResponse for DownloadUrl {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Streamed attachment relayed from the upstream.
#[must_use]
#[derive(Debug)]
pub struct FileDownload {
    content_type: Option<String>,
    content_length: Option<u64>,
    body: TransferStream,
}

impl FileDownload {
    /// Creates a download around an already opened transfer.
    pub fn new(body: TransferStream) -> Self {
        Self {
            content_type: None,
            content_length: None,
            body,
        }
    }

    /// Sets the content type forwarded to the client.
    pub fn with_content_type(mut self, content_type: Option<String>) -> Self {
        self.content_type = content_type;
        self
    }

    /// Sets the content length forwarded to the client.
    pub fn with_content_length(mut self, content_length: Option<u64>) -> Self {
        self.content_length = content_length;
        self
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();

        let content_type = self
            .content_type
            .as_deref()
            .and_then(|value| HeaderValue::from_str(value).ok())
            .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
        headers.insert(header::CONTENT_TYPE, content_type);

        let disposition = format!("attachment; filename=\"{APK_FILE_NAME}\"");
        headers.insert(
            header::CONTENT_DISPOSITION,
            HeaderValue::from_str(&disposition)
                .unwrap_or_else(|_| HeaderValue::from_static("attachment")),
        );

        if let Some(length) = self.content_length {
            headers.insert(header::CONTENT_LENGTH, HeaderValue::from(length));
        }

        headers
    }
}

impl IntoResponse for FileDownload {
    fn into_response(self) -> Response {
        let headers = self.headers();
        (headers, Body::from_stream(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use futures::StreamExt;

    use super::*;

    fn empty_transfer() -> TransferStream {
        TransferStream::new(futures::stream::empty().boxed())
    }

    #[test]
    fn download_url_serializes_camel_case() -> anyhow::Result<()> {
        let body = DownloadUrl {
            download_url: "https://example.test/app.apk".to_owned(),
        };

        assert_eq!(
            serde_json::to_string(&body)?,
            r#"{"downloadUrl":"https://example.test/app.apk"}"#
        );
        Ok(())
    }

    #[test]
    fn file_download_defaults_content_type() {
        let headers = FileDownload::new(empty_transfer()).headers();

        assert_eq!(headers[header::CONTENT_TYPE], DEFAULT_CONTENT_TYPE);
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"zawixLauncher.apk\""
        );
        assert!(!headers.contains_key(header::CONTENT_LENGTH));
    }

    #[test]
    fn file_download_forwards_upstream_headers() {
        let headers = FileDownload::new(empty_transfer())
            .with_content_type(Some("image/png".to_owned()))
            .with_content_length(Some(1024))
            .headers();

        assert_eq!(headers[header::CONTENT_TYPE], "image/png");
        assert_eq!(headers[header::CONTENT_LENGTH], "1024");
    }
}
