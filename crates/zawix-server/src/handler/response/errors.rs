use std::borrow::Cow;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Tracing target for error responses.
const TRACING_TARGET: &str = "zawix_server::handler::response";

/// HTTP error response representation.
///
/// Serializes to exactly `{"error": ..., "message": ...}`.
#[must_use = "error responses do nothing unless serialized"]
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse<'a> {
    /// Short error title
    pub error: Cow<'a, str>,
    /// User-friendly error message safe for client display
    pub message: Cow<'a, str>,

    /// Internal context for debugging (not exposed to client)
    #[serde(skip)]
    pub context: Option<Cow<'a, str>>,
    /// HTTP status code (not serialized in JSON)
    #[serde(skip)]
    pub status: StatusCode,
}

impl<'a> ErrorResponse<'a> {
    // 4xx Client Errors
    pub const CONFIGURATION_MISSING: Self = Self::new(
        "Download URL not configured",
        "Please configure the DOWNLOAD environment variable",
        StatusCode::NOT_FOUND,
    );
    pub const NOT_FOUND: Self = Self::new(
        "Not found",
        "The requested resource does not exist",
        StatusCode::NOT_FOUND,
    );
    pub const UPSTREAM_UNAVAILABLE: Self = Self::new(
        "File not found",
        "Could not fetch the file from the configured URL",
        StatusCode::NOT_FOUND,
    );
    pub const METHOD_NOT_ALLOWED: Self = Self::new(
        "Method not allowed",
        "The requested method is not supported for this resource",
        StatusCode::METHOD_NOT_ALLOWED,
    );
    // 5xx Server Errors
    pub const INTERNAL_SERVER_ERROR: Self = Self::new(
        "Internal server error",
        "An unexpected error occurred",
        StatusCode::INTERNAL_SERVER_ERROR,
    );
    pub const STREAM_UNAVAILABLE: Self = Self::new(
        "Download failed",
        "Could not stream the file",
        StatusCode::INTERNAL_SERVER_ERROR,
    );
    pub const TRANSFER_FAILURE: Self = Self::new(
        "Download failed",
        "An error occurred while downloading the file",
        StatusCode::INTERNAL_SERVER_ERROR,
    );

    /// Creates a new error response.
    #[inline]
    pub const fn new(error: &'a str, message: &'a str, status: StatusCode) -> Self {
        Self {
            error: Cow::Borrowed(error),
            message: Cow::Borrowed(message),
            context: None,
            status,
        }
    }

    /// Replaces the message of the error response.
    pub fn with_message(mut self, message: impl Into<Cow<'a, str>>) -> Self {
        self.message = message.into();
        self
    }

    /// Attaches context to the error response.
    /// If context already exists, it merges them with a separator.
    pub fn with_context(mut self, context: impl Into<Cow<'a, str>>) -> Self {
        let new_context = context.into();
        self.context = Some(match self.context {
            Some(existing) => Cow::Owned(format!("{}; {}", existing, new_context)),
            None => new_context,
        });
        self
    }
}

impl Default for ErrorResponse<'_> {
    #[inline]
    fn default() -> Self {
        Self::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for ErrorResponse<'_> {
    fn into_response(self) -> Response {
        tracing::warn!(
            target: TRACING_TARGET,
            status = %self.status,
            error = %self.error,
            message = %self.message,
            context = ?self.context,
            "HTTP error response"
        );
        (self.status, Json(self)).into_response()
    }
}
