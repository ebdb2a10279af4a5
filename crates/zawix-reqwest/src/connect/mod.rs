//! Reqwest client module.
//!
//! Wraps the `reqwest` crate for fetching upstream files.

mod client;
mod config;

pub use client::{ReqwestClient, TRACING_TARGET};
pub use config::ReqwestConfig;
