//! Upstream service wrapper with observability.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use super::{Result, TRACING_TARGET, UpstreamProvider, UpstreamRequest, UpstreamResponse};

/// Upstream service wrapper with observability.
///
/// The provider is held behind an `Arc`, so cloning is cheap and the service
/// can live in shared application state.
#[derive(Clone)]
pub struct UpstreamService {
    inner: Arc<dyn UpstreamProvider>,
}

impl fmt::Debug for UpstreamService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamService").finish_non_exhaustive()
    }
}

impl UpstreamService {
    /// Creates a new upstream service wrapper.
    pub fn new<P>(provider: P) -> Self
    where
        P: UpstreamProvider + 'static,
    {
        Self {
            inner: Arc::new(provider),
        }
    }

    /// Opens the remote file described by `request`.
    pub async fn fetch(&self, request: &UpstreamRequest) -> Result<UpstreamResponse> {
        let started_at = Instant::now();

        tracing::debug!(
            target: TRACING_TARGET,
            url = %request.url,
            "Fetching upstream file"
        );

        let result = self.inner.fetch(request).await;
        let elapsed = started_at.elapsed();

        match &result {
            Ok(response) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    url = %request.url,
                    status = response.status,
                    content_length = ?response.content_length,
                    elapsed_ms = elapsed.as_millis(),
                    "Upstream responded"
                );
            }
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    url = %request.url,
                    error = %error,
                    elapsed_ms = elapsed.as_millis(),
                    "Upstream fetch failed"
                );
            }
        }

        result
    }
}
