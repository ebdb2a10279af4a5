//! Middleware configuration for the HTTP server.
//!
//! All middleware configs are re-exported from `zawix-server` and support
//! both CLI arguments and environment variables.
//!
//! # Example
//!
//! ```bash
//! zawix --cors-origins "https://zawix.app" --request-timeout 60
//! ```

use anyhow::{Result as AnyhowResult, anyhow};
use clap::Args;
use serde::{Deserialize, Serialize};
use zawix_server::middleware::{CorsConfig, RecoveryConfig, StaticAssetsConfig};

use super::TRACING_TARGET_CONFIG;

/// Middleware configuration combining CORS, recovery, and static bundle settings.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    /// CORS (Cross-Origin Resource Sharing) configuration.
    #[clap(flatten)]
    pub cors: CorsConfig,

    /// Recovery middleware configuration.
    ///
    /// Controls request timeout and panic recovery behavior.
    #[clap(flatten)]
    pub recovery: RecoveryConfig,

    /// Location of the pre-built front-end bundle.
    #[clap(flatten)]
    pub static_assets: StaticAssetsConfig,
}

impl MiddlewareConfig {
    /// Validates middleware configuration values.
    ///
    /// # Errors
    ///
    /// Returns an error if the request timeout is outside 1-300 seconds.
    pub fn validate(&self) -> AnyhowResult<()> {
        let timeout = self.recovery.request_timeout;
        if timeout == 0 || timeout > 300 {
            return Err(anyhow!(
                "Request timeout {timeout} seconds is invalid. Must be between 1 and 300 seconds."
            ));
        }

        Ok(())
    }

    /// Logs middleware configuration at info level.
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            origins = ?self.cors.allowed_origins,
            max_age_secs = self.cors.max_age_seconds,
            "CORS configuration"
        );

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            request_timeout_secs = self.recovery.request_timeout,
            "Recovery configuration"
        );

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            static_dir = %self.static_assets.static_dir.display(),
            fallback_dir = %self.static_assets.static_fallback_dir.display(),
            "Static assets configuration"
        );
    }
}
