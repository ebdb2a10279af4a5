//! In-memory upstream for testing.
//!
//! # Feature Flag
//!
//! This module is only available when the `test-utils` feature is enabled:
//!
//! ```toml
//! [dev-dependencies]
//! zawix-core = { version = "...", features = ["test-utils"] }
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use zawix_core::UpstreamService;
//! use zawix_core::mock::MockUpstream;
//!
//! let upstream = MockUpstream::new(200)
//!     .with_content_type("image/png")
//!     .with_chunks(["\x89PNG", "rest"]);
//! let service = UpstreamService::new(upstream.clone());
//! ```

use std::sync::{Arc, Mutex};

use bytes::Bytes;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::{
    ByteStream, Error, ErrorKind, Result, UpstreamProvider, UpstreamRequest, UpstreamResponse,
};

type ChunkReceiver = mpsc::Receiver<Result<Bytes>>;

#[derive(Clone)]
enum MockBody {
    Chunks {
        chunks: Vec<Bytes>,
        trailing_error: bool,
    },
    Channel(Arc<Mutex<Option<ChunkReceiver>>>),
    Missing,
}

/// Scripted upstream that records every request it receives.
///
/// Clones share the request log, so a test can keep one handle while the
/// other is moved into an [`UpstreamService`](crate::UpstreamService).
#[derive(Clone)]
pub struct MockUpstream {
    status: u16,
    content_type: Option<String>,
    content_length: Option<u64>,
    body: MockBody,
    failure: Option<ErrorKind>,
    requests: Arc<Mutex<Vec<UpstreamRequest>>>,
}

impl std::fmt::Debug for MockUpstream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockUpstream")
            .field("status", &self.status)
            .field("content_type", &self.content_type)
            .field("content_length", &self.content_length)
            .field("failure", &self.failure)
            .finish_non_exhaustive()
    }
}

impl MockUpstream {
    /// Creates an upstream answering `status` with an empty body.
    pub fn new(status: u16) -> Self {
        Self {
            status,
            content_type: None,
            content_length: None,
            body: MockBody::Chunks {
                chunks: Vec::new(),
                trailing_error: false,
            },
            failure: None,
            requests: Arc::default(),
        }
    }

    /// Creates an upstream whose fetch never produces a response.
    pub fn failing(kind: ErrorKind) -> Self {
        Self {
            failure: Some(kind),
            ..Self::new(0)
        }
    }

    /// Creates an upstream streaming whatever is pushed into the returned sender.
    ///
    /// The body ends when the sender is dropped.
    pub fn channel(status: u16, capacity: usize) -> (mpsc::Sender<Result<Bytes>>, Self) {
        let (tx, rx) = mpsc::channel(capacity);
        let upstream = Self {
            body: MockBody::Channel(Arc::new(Mutex::new(Some(rx)))),
            ..Self::new(status)
        };
        (tx, upstream)
    }

    /// Sets the `Content-Type` reported by the upstream.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Sets the `Content-Length` reported by the upstream.
    #[must_use]
    pub fn with_content_length(mut self, content_length: u64) -> Self {
        self.content_length = Some(content_length);
        self
    }

    /// Serves the given chunks in order.
    #[must_use]
    pub fn with_chunks<I, B>(mut self, chunks: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Bytes>,
    {
        self.body = MockBody::Chunks {
            chunks: chunks.into_iter().map(Into::into).collect(),
            trailing_error: false,
        };
        self
    }

    /// Fails the body stream after the configured chunks were served.
    #[must_use]
    pub fn with_trailing_error(mut self) -> Self {
        if let MockBody::Chunks { trailing_error, .. } = &mut self.body {
            *trailing_error = true;
        }
        self
    }

    /// Answers without a readable body.
    #[must_use]
    pub fn without_body(mut self) -> Self {
        self.body = MockBody::Missing;
        self
    }

    /// Returns the number of fetches seen so far.
    pub fn request_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or_default()
    }

    /// Returns a copy of every request seen so far.
    pub fn requests(&self) -> Vec<UpstreamRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    fn open_body(&self) -> Result<Option<ByteStream>> {
        match &self.body {
            MockBody::Chunks {
                chunks,
                trailing_error,
            } => {
                let items = chunks.clone().into_iter().map(Ok);
                let stream = futures::stream::iter(items);
                if *trailing_error {
                    let failure = futures::stream::once(async {
                        Err(Error::network_error().with_message("mock upstream reset"))
                    });
                    Ok(Some(stream.chain(failure).boxed()))
                } else {
                    Ok(Some(stream.boxed()))
                }
            }
            MockBody::Channel(receiver) => {
                let receiver = receiver
                    .lock()
                    .map_err(|_| Error::internal_error().with_message("mock lock poisoned"))?
                    .take()
                    .ok_or_else(|| {
                        Error::internal_error().with_message("mock channel already consumed")
                    })?;
                Ok(Some(ReceiverStream::new(receiver).boxed()))
            }
            MockBody::Missing => Ok(None),
        }
    }
}

#[async_trait::async_trait]
impl UpstreamProvider for MockUpstream {
    async fn fetch(&self, request: &UpstreamRequest) -> Result<UpstreamResponse> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        if let Some(kind) = self.failure {
            return Err(Error::new(kind).with_message("mock upstream failure"));
        }

        let mut response = UpstreamResponse::new(self.status);
        response.content_type = self.content_type.clone();
        response.content_length = self.content_length;
        response.body = self.open_body()?;
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use futures::TryStreamExt;

    use super::*;
    use crate::UpstreamService;

    fn request() -> UpstreamRequest {
        UpstreamRequest::parse("https://example.test/app.apk").unwrap()
    }

    #[tokio::test]
    async fn test_serves_chunks_in_order() -> Result<()> {
        let upstream = MockUpstream::new(200).with_chunks(["ab", "cd"]);
        let service = UpstreamService::new(upstream.clone());

        let mut response = service.fetch(&request()).await?;
        let chunks: Vec<Bytes> = response.take_body().unwrap().try_collect().await?;

        assert_eq!(chunks, vec![Bytes::from("ab"), Bytes::from("cd")]);
        assert_eq!(upstream.request_count(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_body_outlives_mock_and_ends_with_error() -> Result<()> {
        let upstream = MockUpstream::new(200)
            .with_chunks(["partial"])
            .with_trailing_error();

        let first = upstream.fetch(&request()).await?.take_body();
        let mut second = upstream.fetch(&request()).await?.take_body().unwrap();
        drop(upstream);
        drop(first);

        assert_eq!(second.next().await.unwrap()?, Bytes::from("partial"));
        let error = second.next().await.unwrap().unwrap_err();
        assert_eq!(error.kind(), ErrorKind::NetworkError);
        assert!(second.next().await.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_failing_records_request() {
        let upstream = MockUpstream::failing(ErrorKind::Timeout);
        let error = upstream.fetch(&request()).await.unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Timeout);
        assert_eq!(upstream.requests(), vec![request()]);
    }

    #[tokio::test]
    async fn test_channel_body_ends_when_sender_drops() -> Result<()> {
        let (tx, upstream) = MockUpstream::channel(200, 4);
        let mut response = upstream.fetch(&request()).await?;

        tx.send(Ok(Bytes::from_static(b"PK"))).await.unwrap();
        drop(tx);

        let chunks: Vec<Bytes> = response.take_body().unwrap().try_collect().await?;
        assert_eq!(chunks, vec![Bytes::from_static(b"PK")]);
        Ok(())
    }
}
