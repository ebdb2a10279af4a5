//! Internal error types for zawix-reqwest.

use std::time::Duration;

use thiserror::Error;

/// Result type alias for zawix-reqwest operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Internal error type for zawix-reqwest operations.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),
    /// The upstream did not send response headers in time.
    #[error("no response within {}s", .0.as_secs())]
    ResponseTimeout(Duration),
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
}

impl From<Error> for zawix_core::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Reqwest(e) => {
                if e.is_timeout() {
                    zawix_core::Error::timeout()
                        .with_message(e.to_string())
                        .with_source(e)
                } else if e.is_connect() {
                    zawix_core::Error::network_error()
                        .with_message("Connection failed")
                        .with_source(e)
                } else if e.is_builder() {
                    zawix_core::Error::invalid_input()
                        .with_message(e.to_string())
                        .with_source(e)
                } else {
                    zawix_core::Error::network_error()
                        .with_message(e.to_string())
                        .with_source(e)
                }
            }
            e @ Error::ResponseTimeout(_) => zawix_core::Error::timeout().with_message(e.to_string()),
            Error::Build(e) => zawix_core::Error::configuration()
                .with_message("Failed to build HTTP client")
                .with_source(e),
        }
    }
}
