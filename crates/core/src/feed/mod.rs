//! Release feed abstraction.
//!
//! This module provides a `ReleaseFeed` trait for enumerating installable
//! versions and serving their payloads, with local-directory and HTTP
//! backends.

mod http;
mod local;
mod types;

pub use http::HttpFeed;
pub use local::LocalFeed;
pub use types::*;
