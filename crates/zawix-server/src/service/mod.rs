//! Application state and dependency injection.

mod source;
mod state;
mod transfer;

pub use crate::service::source::{
    DOWNLOAD_ENV_VAR, DownloadSource, DownloadUrlProvider, EnvDownloadSource,
    StaticDownloadSource,
};
pub use crate::service::state::ServiceState;
pub use crate::service::transfer::TransferStream;
