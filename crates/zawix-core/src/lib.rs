#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod error;

#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub mod mock;
pub mod upstream;

pub use error::{BoxedError, Error, ErrorKind, Result};
pub use upstream::{
    ByteStream, UpstreamProvider, UpstreamRequest, UpstreamResponse, UpstreamService,
};
