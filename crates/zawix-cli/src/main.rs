#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod server;

use std::process;

use anyhow::Context;
use axum::Router;
use zawix_reqwest::ReqwestClient;
use zawix_server::handler::routes;
use zawix_server::middleware::{
    RouterObservabilityExt, RouterRecoveryExt, RouterSecurityExt, RouterStaticAssetsExt,
    SecurityHeadersConfig,
};
use zawix_server::service::{DownloadSource, ServiceState};

use crate::config::{Cli, MiddlewareConfig};

// Tracing target constants
pub const TRACING_TARGET_SERVER_STARTUP: &str = "zawix_cli::server::startup";
pub const TRACING_TARGET_SERVER_SHUTDOWN: &str = "zawix_cli::server::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "zawix_cli::config";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            "application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            error = %error,
            "application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    Cli::init_tracing();
    cli.log();
    cli.validate()?;

    let state = create_service_state(&cli)?;
    let router = create_router(state, &cli.middleware);

    server::serve(router, cli.server).await?;

    Ok(())
}

/// Creates the service state from configuration.
///
/// The download URL is not part of the configuration: it is looked up in the
/// process environment on every request.
fn create_service_state(cli: &Cli) -> anyhow::Result<ServiceState> {
    let upstream = ReqwestClient::new(cli.upstream.clone())
        .context("failed to create upstream client")?
        .into_service();

    Ok(ServiceState::new(upstream, DownloadSource::from_env()))
}

/// Creates the router with all middleware layers applied.
///
/// Middleware is applied in reverse order (last added = outermost):
/// 1. Recovery (outermost) - catches panics and enforces timeouts
/// 2. Observability - request IDs and tracing spans
/// 3. Security - CORS and security headers
/// 4. Static assets - front-end bundle for unmatched routes
/// 5. Routes (innermost) - download relay handlers
fn create_router(state: ServiceState, middleware: &MiddlewareConfig) -> Router {
    routes()
        .with_state(state)
        .with_static_assets(&middleware.static_assets)
        .with_security(&middleware.cors, &SecurityHeadersConfig::default())
        .with_observability()
        .with_recovery(&middleware.recovery)
}
