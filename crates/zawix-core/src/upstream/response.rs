//! Upstream response head plus an unread body.

use std::fmt;

use bytes::Bytes;
use futures::stream::BoxStream;

use crate::Result;

/// Lazily polled stream of body chunks.
///
/// Dropping the stream releases the underlying connection.
pub type ByteStream = BoxStream<'static, Result<Bytes>>;

/// Response obtained from an upstream fetch.
///
/// Only the head has been read when this value is produced.
pub struct UpstreamResponse {
    /// HTTP status code.
    pub status: u16,
    /// `Content-Type` as sent by the upstream.
    pub content_type: Option<String>,
    /// `Content-Length` as sent by the upstream.
    pub content_length: Option<u64>,
    /// Body chunks, absent when the upstream produced no readable body.
    pub body: Option<ByteStream>,
}

impl fmt::Debug for UpstreamResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamResponse")
            .field("status", &self.status)
            .field("content_type", &self.content_type)
            .field("content_length", &self.content_length)
            .field("has_body", &self.body.is_some())
            .finish()
    }
}

impl UpstreamResponse {
    /// Creates a response head with the given status and no body.
    pub fn new(status: u16) -> Self {
        Self {
            status,
            content_type: None,
            content_length: None,
            body: None,
        }
    }

    /// Sets the content type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Sets the content length.
    #[must_use]
    pub fn with_content_length(mut self, content_length: u64) -> Self {
        self.content_length = Some(content_length);
        self
    }

    /// Attaches a body stream.
    #[must_use]
    pub fn with_body(mut self, body: ByteStream) -> Self {
        self.body = Some(body);
        self
    }

    /// Returns `true` for 2xx status codes.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Takes the body stream, leaving `None` behind.
    pub fn take_body(&mut self) -> Option<ByteStream> {
        self.body.take()
    }
}
