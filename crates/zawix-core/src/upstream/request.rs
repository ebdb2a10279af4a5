//! Outbound request description.

use url::Url;

use crate::Result;

/// A single GET against an upstream file location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRequest {
    /// Absolute location of the file.
    pub url: Url,
}

impl UpstreamRequest {
    /// Creates a request for an already parsed location.
    pub fn new(url: Url) -> Self {
        Self { url }
    }

    /// Parses a raw configured location.
    ///
    /// Fails with [`ErrorKind::InvalidInput`](crate::ErrorKind::InvalidInput)
    /// when `raw` is not an absolute URL.
    pub fn parse(raw: &str) -> Result<Self> {
        let url = Url::parse(raw.trim())?;
        Ok(Self::new(url))
    }

    /// Returns the host, if the URL has one.
    pub fn host(&self) -> Option<&str> {
        self.url.host_str()
    }
}
