//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the external collaborator
//! traits, allowing the whole update lifecycle to be driven without real
//! network or filesystem side effects.
//!
//! # Example
//!
//! ```rust,ignore
//! use updraft_core::testing::{fixtures, MockApplier, MockFeed};
//!
//! let feed = MockFeed::new();
//! feed.set_releases(vec![fixtures::release("2.0.0")]).await;
//!
//! // Use as the orchestrator's feed...
//! ```

pub mod fixtures;

mod mock_applier;
mod mock_feed;
mod mock_shortcuts;

pub use mock_applier::MockApplier;
pub use mock_feed::MockFeed;
pub use mock_shortcuts::{BlockingShortcuts, RecordingShortcuts};
