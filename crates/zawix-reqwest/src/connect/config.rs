//! Reqwest client configuration.

use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

/// Default connect timeout: 10 seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default time allowed until response headers arrive: 20 seconds.
///
/// Kept below the server request timeout so a stalled upstream is reported
/// as a failed download rather than a timed-out request.
pub const DEFAULT_RESPONSE_TIMEOUT_SECS: u64 = 20;

/// Configuration for the upstream HTTP client.
///
/// Neither timeout covers the body transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct ReqwestConfig {
    /// Upstream connect timeout in seconds
    #[cfg_attr(
        feature = "config",
        arg(
            long = "upstream-connect-timeout",
            env = "UPSTREAM_CONNECT_TIMEOUT",
            default_value = "10"
        )
    )]
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout: u64,

    /// Seconds to wait for upstream response headers
    #[cfg_attr(
        feature = "config",
        arg(
            long = "upstream-response-timeout",
            env = "UPSTREAM_RESPONSE_TIMEOUT",
            default_value = "20"
        )
    )]
    #[serde(default = "default_response_timeout_secs")]
    pub response_timeout: u64,

    /// User-Agent header to send upstream
    #[cfg_attr(
        feature = "config",
        arg(long = "upstream-user-agent", env = "UPSTREAM_USER_AGENT")
    )]
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

fn default_response_timeout_secs() -> u64 {
    DEFAULT_RESPONSE_TIMEOUT_SECS
}

impl Default for ReqwestConfig {
    fn default() -> Self {
        Self {
            connect_timeout: default_connect_timeout_secs(),
            response_timeout: default_response_timeout_secs(),
            user_agent: None,
        }
    }
}

impl ReqwestConfig {
    /// Returns the effective connect timeout, using the default if zero.
    pub fn effective_connect_timeout(&self) -> Duration {
        match self.connect_timeout {
            0 => Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            secs => Duration::from_secs(secs),
        }
    }

    /// Returns the effective response timeout, using the default if zero.
    pub fn effective_response_timeout(&self) -> Duration {
        match self.response_timeout {
            0 => Duration::from_secs(DEFAULT_RESPONSE_TIMEOUT_SECS),
            secs => Duration::from_secs(secs),
        }
    }

    /// Returns the effective user agent, using default if not set.
    pub fn effective_user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(Self::default_user_agent)
    }

    fn default_user_agent() -> String {
        format!("zawix/{}", env!("CARGO_PKG_VERSION"))
    }

    /// Set the connect timeout in seconds.
    #[must_use]
    pub fn with_connect_timeout(mut self, secs: u64) -> Self {
        self.connect_timeout = secs;
        self
    }

    /// Set the response timeout in seconds.
    #[must_use]
    pub fn with_response_timeout(mut self, secs: u64) -> Self {
        self.response_timeout = secs;
        self
    }

    /// Set the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}
