//! Upstream provider implementation.
//!
//! This module implements the [`UpstreamProvider`] trait for [`ReqwestClient`].

use futures::{StreamExt, TryStreamExt};
use reqwest::header::{ACCEPT_ENCODING, CONTENT_LENGTH, CONTENT_TYPE, HeaderMap, HeaderValue};
use zawix_core::{UpstreamProvider, UpstreamRequest, UpstreamResponse};

use crate::connect::{ReqwestClient, TRACING_TARGET};
use crate::error::Error;

#[async_trait::async_trait]
impl UpstreamProvider for ReqwestClient {
    async fn fetch(&self, request: &UpstreamRequest) -> zawix_core::Result<UpstreamResponse> {
        let timeout = self.config().effective_response_timeout();

        tracing::debug!(
            target: TRACING_TARGET,
            url = %request.url,
            timeout_ms = timeout.as_millis(),
            "Sending upstream request"
        );

        let pending = self
            .http()
            .get(request.url.clone())
            // Bytes are relayed verbatim.
            .header(ACCEPT_ENCODING, HeaderValue::from_static("identity"))
            .send();

        let http_response = tokio::time::timeout(timeout, pending)
            .await
            .map_err(|_| Error::ResponseTimeout(timeout))?
            .map_err(Error::from)?;

        let status = http_response.status().as_u16();
        let content_type = header_str(http_response.headers(), CONTENT_TYPE);
        let content_length =
            header_str(http_response.headers(), CONTENT_LENGTH).and_then(|v| v.parse().ok());

        tracing::debug!(
            target: TRACING_TARGET,
            url = %request.url,
            status,
            content_type = ?content_type,
            content_length = ?content_length,
            "Received upstream response head"
        );

        let body = http_response
            .bytes_stream()
            .map_err(|e| zawix_core::Error::from(Error::from(e)))
            .boxed();

        let mut response = UpstreamResponse::new(status).with_body(body);
        response.content_type = content_type;
        response.content_length = content_length;
        Ok(response)
    }
}

fn header_str(headers: &HeaderMap, name: reqwest::header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}
