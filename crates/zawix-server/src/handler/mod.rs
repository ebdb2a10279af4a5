//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! # Usage Example
//!
//! ```rust,ignore
//! use zawix_reqwest::{ReqwestClient, ReqwestConfig};
//! use zawix_server::handler::routes;
//! use zawix_server::service::{DownloadSource, ServiceState};
//!
//! let upstream = ReqwestClient::new(ReqwestConfig::default())?.into_service();
//! let state = ServiceState::new(upstream, DownloadSource::from_env());
//! let router: axum::Router = routes().with_state(state);
//! ```
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler

mod downloads;
mod error;
mod response;

use axum::Router;
use axum::response::{IntoResponse, Response};
use axum::routing::any;

pub use crate::handler::error::{Error, ErrorKind, Result};
pub use crate::handler::response::{APK_FILE_NAME, DownloadUrl, ErrorResponse, FileDownload};
use crate::service::ServiceState;

#[inline]
async fn handler() -> Response {
    ErrorKind::NotFound.into_response()
}

/// Answers requests whose method a matched route does not accept.
#[inline]
async fn method_not_allowed() -> Response {
    ErrorKind::MethodNotAllowed.into_response()
}

/// Returns a [`Router`] with all API routes.
///
/// Unmatched paths under `/api` answer with the JSON not-found error. Any
/// other unmatched path is left to the router's fallback.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .merge(downloads::routes())
        .route("/api", any(handler))
        .route("/api/{*path}", any(handler))
}

#[cfg(test)]
pub(crate) mod test {
    use std::net::SocketAddr;

    use axum::Router;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;
    use zawix_core::UpstreamService;
    use zawix_core::mock::MockUpstream;

    use crate::handler::routes;
    use crate::service::{DownloadSource, ServiceState};

    /// Returns a [`ServiceState`] backed by the given mock upstream.
    pub fn test_state(upstream: MockUpstream, source: DownloadSource) -> ServiceState {
        ServiceState::new(UpstreamService::new(upstream), source)
    }

    /// Returns the complete API [`Router`] bound to `state`.
    pub fn test_router(state: ServiceState) -> Router {
        routes().with_state(state)
    }

    /// Returns a new [`TestServer`] with the default router and the given state.
    pub fn create_test_server_with_state(state: ServiceState) -> anyhow::Result<TestServer> {
        let server = TestServer::new(test_router(state))?;
        Ok(server)
    }

    /// Serves the API on an ephemeral local port and returns its address.
    pub async fn spawn_test_server(state: ServiceState) -> anyhow::Result<SocketAddr> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let router = test_router(state);
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
        Ok(addr)
    }

    #[tokio::test]
    async fn handlers() -> anyhow::Result<()> {
        let state = test_state(MockUpstream::new(200), DownloadSource::unset());
        let server = create_test_server_with_state(state)?;
        assert!(server.is_running());
        Ok(())
    }

    #[tokio::test]
    async fn unknown_api_route_is_json_not_found() -> anyhow::Result<()> {
        let state = test_state(MockUpstream::new(200), DownloadSource::unset());
        let server = create_test_server_with_state(state)?;

        for path in ["/api", "/api/unknown", "/api/download/extra"] {
            let response = server.get(path).await;
            response.assert_status(StatusCode::NOT_FOUND);
            response.assert_json(&json!({
                "error": "Not found",
                "message": "The requested resource does not exist",
            }));
        }
        Ok(())
    }

    #[tokio::test]
    async fn api_routes_only_accept_get() -> anyhow::Result<()> {
        let state = test_state(MockUpstream::new(200), DownloadSource::unset());
        let server = create_test_server_with_state(state)?;

        for path in ["/api/download", "/api/download-url"] {
            let response = server.post(path).await;
            response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
            response.assert_json(&json!({
                "error": "Method not allowed",
                "message": "The requested method is not supported for this resource",
            }));
        }

        let response = server.delete("/api/download").await;
        response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
        Ok(())
    }
}
