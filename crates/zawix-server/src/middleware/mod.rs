//! Middleware for `axum::Router` and HTTP request processing.
//!
//! This module provides router extension traits for:
//! - Recovery (panics, timeouts, service errors)
//! - Observability (request IDs, tracing spans)
//! - Security (CORS, response headers)
//! - Static front-end assets
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use axum::Router;
//! use zawix_server::middleware::{
//!     RecoveryConfig, RouterObservabilityExt, RouterRecoveryExt, RouterSecurityExt,
//!     RouterStaticAssetsExt, StaticAssetsConfig,
//! };
//!
//! let app: Router = Router::new()
//!     .with_static_assets(&StaticAssetsConfig::default())
//!     .with_default_security()
//!     .with_observability()
//!     .with_recovery(&RecoveryConfig::default());
//! ```

mod observability;
mod recovery;
mod security;
mod static_assets;

pub use observability::RouterObservabilityExt;
pub use recovery::{RecoveryConfig, RouterRecoveryExt};
pub use security::{
    CorsConfig, FrameOptions, ReferrerPolicy, RouterSecurityExt, SecurityHeadersConfig,
};
pub use static_assets::{MISSING_BUNDLE_MESSAGE, RouterStaticAssetsExt, StaticAssetsConfig};
