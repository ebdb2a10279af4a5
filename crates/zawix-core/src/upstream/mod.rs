//! Upstream file fetching abstractions.
//!
//! The relay never names a concrete HTTP client. It holds an
//! [`UpstreamService`], which wraps any [`UpstreamProvider`] behind an `Arc`
//! and adds structured logging around each fetch.

mod request;
mod response;
mod service;

pub use request::UpstreamRequest;
pub use response::{ByteStream, UpstreamResponse};
pub use service::UpstreamService;

pub use crate::{Error, ErrorKind, Result};

/// Tracing target for upstream operations.
pub const TRACING_TARGET: &str = "zawix_core::upstream";

/// Core trait for fetching a remote file.
///
/// Implementations issue exactly one GET per call and resolve as soon as the
/// response head is available. The body is handed back unread as a
/// [`ByteStream`] so callers decide when, and whether, to pull it.
#[async_trait::async_trait]
pub trait UpstreamProvider: Send + Sync {
    /// Opens the remote file described by `request`.
    ///
    /// Returns an error only when no response was obtained at all. A non-2xx
    /// answer is still `Ok` and carries its status code.
    async fn fetch(&self, request: &UpstreamRequest) -> Result<UpstreamResponse>;
}
