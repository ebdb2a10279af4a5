//! CLI configuration management.
//!
//! This module defines the complete CLI configuration hierarchy:
//!
//! ```text
//! Cli
//! ├── server: ServerConfig         # Host, port, shutdown
//! ├── middleware: MiddlewareConfig # CORS, recovery/timeouts, static bundle
//! └── upstream: ReqwestConfig      # Upstream connect/response timeouts
//! ```
//!
//! All configuration can be provided via CLI arguments or environment variables.
//! Use `--help` to see all available options.
//!
//! # Example
//!
//! ```bash
//! zawix --port 8080 --static-dir ./dist/public
//!
//! # Or via environment variables
//! PORT=8080 STATIC_DIR=./dist/public zawix
//! ```

mod middleware;
mod server;

use std::process;

use anyhow::{Context, anyhow};
use clap::Parser;
pub use middleware::MiddlewareConfig;
use serde::{Deserialize, Serialize};
pub use server::ServerConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use zawix_reqwest::ReqwestConfig;

use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_SERVER_STARTUP};

/// Complete CLI configuration.
///
/// Combines all configuration groups for the zawix server:
/// - [`ServerConfig`]: Network binding and shutdown
/// - [`MiddlewareConfig`]: HTTP middleware (CORS, recovery, static bundle)
/// - [`ReqwestConfig`]: Upstream HTTP client used by the download relay
#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[command(name = "zawix")]
#[command(about = "Zawix launcher site and download relay")]
#[command(version)]
pub struct Cli {
    /// Server network and lifecycle configuration.
    #[clap(flatten)]
    pub server: ServerConfig,

    /// HTTP middleware configuration (CORS, timeouts, static bundle).
    #[clap(flatten)]
    pub middleware: MiddlewareConfig,

    /// Upstream client configuration for the download relay.
    #[clap(flatten)]
    pub upstream: ReqwestConfig,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    ///
    /// The .env file is loaded before clap parses arguments so its values act
    /// as environment defaults. This also makes `DOWNLOAD` from .env visible
    /// to the download relay.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is enabled.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Initializes tracing with environment-based filtering.
    pub fn init_tracing() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    /// Logs build information at debug level.
    fn log_build_info() {
        tracing::debug!(
            target: TRACING_TARGET_SERVER_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );
    }

    /// Validates all configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.server
            .validate()
            .context("invalid server configuration")?;
        self.middleware
            .validate()
            .context("invalid middleware configuration")?;

        let upstream_timeout = self.upstream.effective_response_timeout();
        let request_timeout = self.middleware.recovery.request_timeout();
        if upstream_timeout >= request_timeout {
            return Err(anyhow!(
                "Upstream response timeout ({}s) must be shorter than the request timeout ({}s)",
                upstream_timeout.as_secs(),
                request_timeout.as_secs()
            ));
        }

        Ok(())
    }

    /// Logs configuration (no sensitive information).
    pub fn log(&self) {
        Self::log_build_info();
        self.server.log();
        self.middleware.log();

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            connect_timeout_secs = self.upstream.effective_connect_timeout().as_secs(),
            response_timeout_secs = self.upstream.effective_response_timeout().as_secs(),
            user_agent = %self.upstream.effective_user_agent(),
            "Upstream configuration"
        );
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}
