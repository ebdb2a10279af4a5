//! Download location providers.
//!
//! The location is looked up on every call and never cached, so a changed
//! environment takes effect on the next request.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Environment variable holding the upstream download URL.
pub const DOWNLOAD_ENV_VAR: &str = "DOWNLOAD";

/// Read-only provider of the upstream download URL.
pub trait DownloadUrlProvider: Send + Sync {
    /// Returns the configured location, or `None` when absent or empty.
    fn download_url(&self) -> Option<String>;
}

/// Reads the location from an environment variable on every call.
#[derive(Debug, Clone)]
pub struct EnvDownloadSource {
    var: Cow<'static, str>,
}

impl EnvDownloadSource {
    /// Reads from a custom environment variable.
    pub fn new(var: impl Into<Cow<'static, str>>) -> Self {
        Self { var: var.into() }
    }

    /// Returns the environment variable name.
    pub fn var(&self) -> &str {
        &self.var
    }
}

impl Default for EnvDownloadSource {
    fn default() -> Self {
        Self::new(DOWNLOAD_ENV_VAR)
    }
}

impl DownloadUrlProvider for EnvDownloadSource {
    fn download_url(&self) -> Option<String> {
        std::env::var(self.var.as_ref())
            .ok()
            .filter(|value| !value.is_empty())
    }
}

/// Fixed location, mostly useful in tests.
#[derive(Debug, Clone, Default)]
pub struct StaticDownloadSource {
    url: Option<String>,
}

impl StaticDownloadSource {
    /// Creates a source that always returns `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
        }
    }

    /// Creates a source with nothing configured.
    pub fn unset() -> Self {
        Self::default()
    }
}

impl DownloadUrlProvider for StaticDownloadSource {
    fn download_url(&self) -> Option<String> {
        self.url.clone().filter(|value| !value.is_empty())
    }
}

/// Shared handle to the configured [`DownloadUrlProvider`].
#[derive(Clone)]
pub struct DownloadSource {
    inner: Arc<dyn DownloadUrlProvider>,
}

impl fmt::Debug for DownloadSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DownloadSource").finish_non_exhaustive()
    }
}

impl DownloadSource {
    /// Wraps a provider.
    pub fn new<P>(provider: P) -> Self
    where
        P: DownloadUrlProvider + 'static,
    {
        Self {
            inner: Arc::new(provider),
        }
    }

    /// Reads `DOWNLOAD` from the process environment on every call.
    pub fn from_env() -> Self {
        Self::new(EnvDownloadSource::default())
    }

    /// Always returns `url`.
    pub fn fixed(url: impl Into<String>) -> Self {
        Self::new(StaticDownloadSource::new(url))
    }

    /// Never returns a location.
    pub fn unset() -> Self {
        Self::new(StaticDownloadSource::unset())
    }

    /// Returns the configured location, or `None` when absent or empty.
    pub fn download_url(&self) -> Option<String> {
        self.inner.download_url()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_source_treats_empty_as_unset() {
        assert_eq!(DownloadSource::fixed("").download_url(), None);
        assert_eq!(DownloadSource::unset().download_url(), None);
        assert_eq!(
            DownloadSource::fixed("https://example.test/app.apk").download_url(),
            Some("https://example.test/app.apk".to_owned())
        );
    }

    #[test]
    fn env_source_reads_missing_variable_as_unset() {
        let source = EnvDownloadSource::new("ZAWIX_TEST_DOWNLOAD_NEVER_SET");
        assert_eq!(source.var(), "ZAWIX_TEST_DOWNLOAD_NEVER_SET");
        assert_eq!(source.download_url(), None);
    }

    #[test]
    fn env_source_defaults_to_download() {
        assert_eq!(EnvDownloadSource::default().var(), DOWNLOAD_ENV_VAR);
    }
}
