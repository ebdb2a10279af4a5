//! Upstream error to HTTP error conversion implementation.

use super::http_error::{Error as HttpError, ErrorKind};

/// Tracing target for upstream error conversions.
const TRACING_TARGET: &str = "zawix_server::handler::upstream";

impl From<zawix_core::Error> for HttpError<'static> {
    fn from(error: zawix_core::Error) -> Self {
        use zawix_core::ErrorKind as UpstreamErrorKind;

        match error.kind {
            UpstreamErrorKind::InvalidInput => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %error,
                    source = ?error.source,
                    "Configured download URL is malformed"
                );
            }
            _ => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %error,
                    error_kind = %error.kind,
                    source = ?error.source,
                    "Upstream fetch failed"
                );
            }
        }

        ErrorKind::TransferFailure.with_context(error.to_string())
    }
}
