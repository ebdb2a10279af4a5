//! Application state and dependency injection.

use zawix_core::UpstreamService;

use crate::service::DownloadSource;

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Debug, Clone)]
pub struct ServiceState {
    upstream: UpstreamService,
    download_source: DownloadSource,
}

impl ServiceState {
    /// Creates application state from its collaborators.
    pub fn new(upstream: UpstreamService, download_source: DownloadSource) -> Self {
        Self {
            upstream,
            download_source,
        }
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

impl_di!(upstream: UpstreamService);
impl_di!(download_source: DownloadSource);
