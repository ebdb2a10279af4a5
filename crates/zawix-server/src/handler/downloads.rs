//! Download relay handlers.

use axum::Router;
use axum::extract::State;
use axum::routing::get;
use zawix_core::{UpstreamRequest, UpstreamService};

use crate::handler::response::{DownloadUrl, FileDownload};
use crate::handler::{ErrorKind, Result, method_not_allowed};
use crate::service::{DownloadSource, ServiceState, TransferStream};

/// Tracing target for download endpoints.
const TRACING_TARGET: &str = "zawix_server::handler::downloads";

/// Returns the configured location or the configuration-missing error.
fn configured_url(source: &DownloadSource) -> Result<String> {
    source.download_url().ok_or_else(|| {
        ErrorKind::ConfigurationMissing.with_context("download location is absent or empty")
    })
}

/// Reports the configured download location.
#[tracing::instrument(skip_all)]
async fn download_url(State(source): State<DownloadSource>) -> Result<DownloadUrl> {
    let download_url = configured_url(&source)?;
    Ok(DownloadUrl { download_url })
}

/// Streams the configured file to the client as an attachment.
#[tracing::instrument(skip_all)]
async fn download(
    State(source): State<DownloadSource>,
    State(upstream): State<UpstreamService>,
) -> Result<FileDownload> {
    let url = configured_url(&source)?;
    let request = UpstreamRequest::parse(&url)?;
    let mut response = upstream.fetch(&request).await?;

    if !response.is_success() {
        tracing::warn!(
            target: TRACING_TARGET,
            url = %request.url,
            status = response.status,
            "Upstream answered with a non-success status"
        );
        return Err(ErrorKind::UpstreamUnavailable
            .with_context(format!("upstream status {}", response.status)));
    }

    let body = response.take_body().ok_or_else(|| {
        tracing::error!(
            target: TRACING_TARGET,
            url = %request.url,
            "Upstream response has no readable body"
        );
        ErrorKind::StreamUnavailable.into_error()
    })?;

    tracing::info!(
        target: TRACING_TARGET,
        url = %request.url,
        status = response.status,
        content_type = ?response.content_type,
        content_length = ?response.content_length,
        "Streaming download to client"
    );

    Ok(FileDownload::new(TransferStream::new(body))
        .with_content_type(response.content_type)
        .with_content_length(response.content_length))
}

/// Returns a [`Router`] with all related routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route(
            "/api/download-url",
            get(download_url).fallback(method_not_allowed),
        )
        .route("/api/download", get(download).fallback(method_not_allowed))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::http::{StatusCode, header};
    use bytes::Bytes;
    use serde_json::json;
    use zawix_core::mock::MockUpstream;
    use zawix_core::{ErrorKind as UpstreamErrorKind, UpstreamService};

    use crate::handler::test::{create_test_server_with_state, spawn_test_server, test_state};
    use crate::service::DownloadSource;

    const APK_URL: &str = "https://example.test/app.apk";
    const APK_TYPE: &str = "application/vnd.android.package-archive";

    fn configuration_missing() -> serde_json::Value {
        json!({
            "error": "Download URL not configured",
            "message": "Please configure the DOWNLOAD environment variable",
        })
    }

    #[tokio::test]
    async fn download_url_unset_is_configuration_missing() -> anyhow::Result<()> {
        let state = test_state(MockUpstream::new(200), DownloadSource::unset());
        let server = create_test_server_with_state(state)?;

        let response = server.get("/api/download-url").await;
        response.assert_status(StatusCode::NOT_FOUND);
        response.assert_json(&configuration_missing());
        Ok(())
    }

    #[tokio::test]
    async fn download_url_empty_is_configuration_missing() -> anyhow::Result<()> {
        let state = test_state(MockUpstream::new(200), DownloadSource::fixed(""));
        let server = create_test_server_with_state(state)?;

        let response = server.get("/api/download-url").await;
        response.assert_status(StatusCode::NOT_FOUND);
        response.assert_json(&configuration_missing());
        Ok(())
    }

    #[tokio::test]
    async fn download_url_is_reported_and_idempotent() -> anyhow::Result<()> {
        let upstream = MockUpstream::new(200);
        let state = test_state(upstream.clone(), DownloadSource::fixed(APK_URL));
        let server = create_test_server_with_state(state)?;

        let first = server.get("/api/download-url").await;
        let second = server.get("/api/download-url").await;

        first.assert_status_ok();
        first.assert_json(&json!({ "downloadUrl": APK_URL }));
        assert_eq!(first.as_bytes(), second.as_bytes());
        assert_eq!(upstream.request_count(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn download_unset_is_configuration_missing() -> anyhow::Result<()> {
        let upstream = MockUpstream::new(200).with_chunks(["never"]);
        let state = test_state(upstream.clone(), DownloadSource::unset());
        let server = create_test_server_with_state(state)?;

        let response = server.get("/api/download").await;
        response.assert_status(StatusCode::NOT_FOUND);
        response.assert_json(&configuration_missing());
        assert_eq!(upstream.request_count(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn download_relays_apk() -> anyhow::Result<()> {
        let payload: &[u8] = b"PK\x03\x04\x14\x00\x08\x00";
        let upstream = MockUpstream::new(200)
            .with_content_type(APK_TYPE)
            .with_content_length(payload.len() as u64)
            .with_chunks([&payload[..4], &payload[4..]]);
        let state = test_state(upstream.clone(), DownloadSource::fixed(APK_URL));
        let server = create_test_server_with_state(state)?;

        let response = server.get("/api/download").await;
        response.assert_status_ok();
        response.assert_header(header::CONTENT_TYPE, APK_TYPE);
        response.assert_header(
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"zawixLauncher.apk\"",
        );
        response.assert_header(header::CONTENT_LENGTH, payload.len().to_string());
        assert_eq!(response.as_bytes().as_ref(), payload);

        let requests = upstream.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url.as_str(), APK_URL);
        Ok(())
    }

    #[tokio::test]
    async fn download_forwards_content_type() -> anyhow::Result<()> {
        let upstream = MockUpstream::new(200)
            .with_content_type("image/png")
            .with_chunks([&b"\x89PNG"[..], &b"\r\n\x1a\n"[..]]);
        let state = test_state(upstream, DownloadSource::fixed("https://example.test/logo.png"));
        let server = create_test_server_with_state(state)?;

        let response = server.get("/api/download").await;
        response.assert_status_ok();
        response.assert_header(header::CONTENT_TYPE, "image/png");
        response.assert_header(
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"zawixLauncher.apk\"",
        );
        assert_eq!(response.as_bytes().as_ref(), b"\x89PNG\r\n\x1a\n");
        Ok(())
    }

    #[tokio::test]
    async fn download_defaults_content_type_and_omits_length() -> anyhow::Result<()> {
        let upstream = MockUpstream::new(200).with_chunks(["a", "b", "c"]);
        let state = test_state(upstream, DownloadSource::fixed(APK_URL));
        let server = create_test_server_with_state(state)?;

        let response = server.get("/api/download").await;
        response.assert_status_ok();
        response.assert_header(header::CONTENT_TYPE, "application/octet-stream");
        assert!(response.maybe_header(header::CONTENT_LENGTH).is_none());
        assert_eq!(response.as_bytes().as_ref(), b"abc");
        Ok(())
    }

    #[tokio::test]
    async fn download_upstream_not_found() -> anyhow::Result<()> {
        let upstream = MockUpstream::new(404)
            .with_content_type("text/html")
            .with_chunks(["<h1>gone</h1>"]);
        let state = test_state(upstream, DownloadSource::fixed(APK_URL));
        let server = create_test_server_with_state(state)?;

        let response = server.get("/api/download").await;
        response.assert_status(StatusCode::NOT_FOUND);
        response.assert_header(header::CONTENT_TYPE, "application/json");
        assert!(response.maybe_header(header::CONTENT_DISPOSITION).is_none());
        response.assert_json(&json!({
            "error": "File not found",
            "message": "Could not fetch the file from the configured URL",
        }));
        Ok(())
    }

    #[tokio::test]
    async fn download_upstream_server_error_is_not_found() -> anyhow::Result<()> {
        let state = test_state(MockUpstream::new(503), DownloadSource::fixed(APK_URL));
        let server = create_test_server_with_state(state)?;

        let response = server.get("/api/download").await;
        response.assert_status(StatusCode::NOT_FOUND);
        Ok(())
    }

    #[tokio::test]
    async fn download_fetch_failure_is_transfer_failure() -> anyhow::Result<()> {
        let upstream = MockUpstream::failing(UpstreamErrorKind::NetworkError);
        let state = test_state(upstream, DownloadSource::fixed(APK_URL));
        let server = create_test_server_with_state(state)?;

        let response = server.get("/api/download").await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        response.assert_json(&json!({
            "error": "Download failed",
            "message": "An error occurred while downloading the file",
        }));
        Ok(())
    }

    #[tokio::test]
    async fn download_malformed_url_is_transfer_failure() -> anyhow::Result<()> {
        let upstream = MockUpstream::new(200);
        let state = test_state(upstream.clone(), DownloadSource::fixed("not a url"));
        let server = create_test_server_with_state(state)?;

        let response = server.get("/api/download").await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        response.assert_json(&json!({
            "error": "Download failed",
            "message": "An error occurred while downloading the file",
        }));
        assert_eq!(upstream.request_count(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn download_without_body_is_stream_unavailable() -> anyhow::Result<()> {
        let upstream = MockUpstream::new(200).without_body();
        let state = test_state(upstream, DownloadSource::fixed(APK_URL));
        let server = create_test_server_with_state(state)?;

        let response = server.get("/api/download").await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        response.assert_json(&json!({
            "error": "Download failed",
            "message": "Could not stream the file",
        }));
        Ok(())
    }

    #[tokio::test]
    async fn download_streams_progressively() -> anyhow::Result<()> {
        let (tx, upstream) = MockUpstream::channel(200, 1);
        let state = test_state(upstream, DownloadSource::fixed(APK_URL));
        let addr = spawn_test_server(state).await?;

        tx.send(Ok(Bytes::from_static(b"first"))).await?;
        let mut response = reqwest::get(format!("http://{addr}/api/download")).await?;
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        assert!(response.headers().get(header::CONTENT_LENGTH).is_none());

        // The upstream is still open while the first chunk arrives.
        let first = tokio::time::timeout(Duration::from_secs(5), response.chunk()).await??;
        assert_eq!(first.as_deref(), Some(&b"first"[..]));
        assert!(!tx.is_closed());

        tx.send(Ok(Bytes::from_static(b"second"))).await?;
        drop(tx);

        let mut rest = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            rest.extend_from_slice(&chunk);
        }
        assert_eq!(rest, b"second");
        Ok(())
    }

    #[tokio::test]
    async fn download_client_disconnect_releases_upstream() -> anyhow::Result<()> {
        let (tx, upstream) = MockUpstream::channel(200, 1);
        let state = test_state(upstream, DownloadSource::fixed(APK_URL));
        let addr = spawn_test_server(state).await?;

        tx.send(Ok(Bytes::from_static(b"first"))).await?;
        let mut response = reqwest::get(format!("http://{addr}/api/download")).await?;
        let _ = response.chunk().await?;
        drop(response);

        // Keeps the server writing until the dropped connection releases the upstream.
        let released = async {
            while tx.send(Ok(Bytes::from_static(&[0; 1024]))).await.is_ok() {}
        };
        tokio::time::timeout(Duration::from_secs(5), released).await?;
        assert!(tx.is_closed());
        Ok(())
    }

    #[tokio::test]
    async fn download_mid_stream_error_aborts_response() -> anyhow::Result<()> {
        let (tx, upstream) = MockUpstream::channel(200, 1);
        let state = test_state(upstream, DownloadSource::fixed(APK_URL));
        let addr = spawn_test_server(state).await?;

        tx.send(Ok(Bytes::from_static(b"partial"))).await?;
        let mut response = reqwest::get(format!("http://{addr}/api/download")).await?;
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let first = tokio::time::timeout(Duration::from_secs(5), response.chunk()).await??;
        assert_eq!(first.as_deref(), Some(&b"partial"[..]));

        tx.send(Err(zawix_core::Error::network_error().with_message("connection reset")))
            .await?;
        let next = tokio::time::timeout(Duration::from_secs(5), response.chunk()).await?;
        assert!(next.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn upstream_service_is_injected() -> anyhow::Result<()> {
        let upstream = MockUpstream::new(200);
        let service = UpstreamService::new(upstream.clone());
        let state = crate::service::ServiceState::new(service, DownloadSource::fixed(APK_URL));
        let server = create_test_server_with_state(state)?;

        server.get("/api/download").await.assert_status_ok();
        assert_eq!(upstream.request_count(), 1);
        Ok(())
    }
}
