//! Serving of the pre-built front-end bundle.

use std::path::{Path, PathBuf};

use axum::Router;
use axum::http::StatusCode;
#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use tower_http::services::{ServeDir, ServeFile};

/// Tracing target for static asset serving.
const TRACING_TARGET: &str = "zawix_server::static_assets";

/// Plain-text body returned for non-API routes when no bundle is present.
pub const MISSING_BUNDLE_MESSAGE: &str = "Build files not found. Run 'npm run build' first.";

/// Location of the front-end bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct StaticAssetsConfig {
    /// Directory containing the built front-end.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "STATIC_DIR", default_value = "dist/public")
    )]
    pub static_dir: PathBuf,

    /// Directory tried when `static_dir` does not exist.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "STATIC_FALLBACK_DIR", default_value = "dist")
    )]
    pub static_fallback_dir: PathBuf,
}

impl Default for StaticAssetsConfig {
    fn default() -> Self {
        Self {
            static_dir: PathBuf::from("dist/public"),
            static_fallback_dir: PathBuf::from("dist"),
        }
    }
}

impl StaticAssetsConfig {
    /// Creates a configuration serving from a single directory.
    pub fn new(static_dir: impl Into<PathBuf>) -> Self {
        let static_dir = static_dir.into();
        Self {
            static_fallback_dir: static_dir.clone(),
            static_dir,
        }
    }

    /// Returns the first existing bundle directory, if any.
    pub fn resolve(&self) -> Option<&Path> {
        [self.static_dir.as_path(), self.static_fallback_dir.as_path()]
            .into_iter()
            .find(|dir| dir.is_dir())
    }
}

/// Extension trait for `axum::`[`Router`] to serve the front-end bundle.
pub trait RouterStaticAssetsExt {
    /// Serves the bundle for every unmatched route.
    ///
    /// Unknown paths fall back to `index.html` so client-side routing works.
    /// Without a bundle directory every unmatched route answers 404 with
    /// [`MISSING_BUNDLE_MESSAGE`].
    fn with_static_assets(self, config: &StaticAssetsConfig) -> Self;
}

impl RouterStaticAssetsExt for Router {
    fn with_static_assets(self, config: &StaticAssetsConfig) -> Self {
        match config.resolve() {
            Some(dir) => {
                tracing::info!(
                    target: TRACING_TARGET,
                    directory = %dir.display(),
                    "serving front-end bundle"
                );

                let index = ServeFile::new(dir.join("index.html"));
                self.fallback_service(ServeDir::new(dir).fallback(index))
            }
            None => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    static_dir = %config.static_dir.display(),
                    fallback_dir = %config.static_fallback_dir.display(),
                    "front-end bundle not found"
                );

                self.fallback(|| async { (StatusCode::NOT_FOUND, MISSING_BUNDLE_MESSAGE) })
            }
        }
    }
}
