//! Staged release application.
//!
//! This module provides an `Applier` trait for installing downloaded
//! release payloads, with a filesystem implementation.

mod config;
mod error;
mod fs;
mod traits;

pub use config::ApplierConfig;
pub use error::ApplyError;
pub use fs::FsApplier;
pub use traits::Applier;
