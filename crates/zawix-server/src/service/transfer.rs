//! Relay body stream with transfer accounting.

use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::{Stream, StreamExt};
use zawix_core::ByteStream;

/// Tracing target for download transfers.
const TRACING_TARGET: &str = "zawix_server::service::transfer";

/// Upstream body handed to the HTTP server chunk by chunk.
///
/// The inner stream is only polled when the server asks for the next frame.
/// Dropping a transfer before it finished, for example because the client
/// went away, drops the upstream body with it.
pub struct TransferStream {
    inner: ByteStream,
    bytes_sent: u64,
    finished: bool,
}

impl fmt::Debug for TransferStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransferStream")
            .field("bytes_sent", &self.bytes_sent)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

impl TransferStream {
    /// Wraps an upstream body.
    pub fn new(inner: ByteStream) -> Self {
        Self {
            inner,
            bytes_sent: 0,
            finished: false,
        }
    }

    /// Returns the number of bytes handed out so far.
    pub fn bytes_sent(&self) -> u64 {
        self.bytes_sent
    }
}

impl Stream for TransferStream {
    type Item = zawix_core::Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.finished {
            return Poll::Ready(None);
        }

        match self.inner.poll_next_unpin(cx) {
            Poll::Ready(Some(Ok(chunk))) => {
                self.bytes_sent += chunk.len() as u64;
                Poll::Ready(Some(Ok(chunk)))
            }
            Poll::Ready(Some(Err(error))) => {
                self.finished = true;
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %error,
                    bytes_sent = self.bytes_sent,
                    "Download stream failed mid-transfer"
                );
                Poll::Ready(Some(Err(error)))
            }
            Poll::Ready(None) => {
                self.finished = true;
                tracing::debug!(
                    target: TRACING_TARGET,
                    bytes_sent = self.bytes_sent,
                    "Download transfer completed"
                );
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for TransferStream {
    fn drop(&mut self) {
        if !self.finished {
            tracing::debug!(
                target: TRACING_TARGET,
                bytes_sent = self.bytes_sent,
                "Download transfer aborted before completion"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn counts_bytes_and_ends() {
        let chunks = vec![Ok(Bytes::from_static(b"PK")), Ok(Bytes::from_static(b"\x03\x04"))];
        let mut transfer = TransferStream::new(futures::stream::iter(chunks).boxed());

        assert_eq!(transfer.next().await.unwrap().unwrap(), "PK");
        assert_eq!(transfer.next().await.unwrap().unwrap(), &b"\x03\x04"[..]);
        assert!(transfer.next().await.is_none());
        assert_eq!(transfer.bytes_sent(), 4);
    }

    #[tokio::test]
    async fn stops_after_error() {
        let chunks = vec![
            Ok(Bytes::from_static(b"abc")),
            Err(zawix_core::Error::network_error()),
            Ok(Bytes::from_static(b"never")),
        ];
        let mut transfer = TransferStream::new(futures::stream::iter(chunks).boxed());

        assert!(transfer.next().await.unwrap().is_ok());
        assert!(transfer.next().await.unwrap().is_err());
        assert!(transfer.next().await.is_none());
        assert_eq!(transfer.bytes_sent(), 3);
    }
}
