//! The per-process update session.
//!
//! One `UpdateSession` exists per process, created `Idle` at startup with
//! the version read from the running binary. The orchestrator owns and
//! mutates it; the presentation layer observes cloned snapshots and never
//! mutates state directly.

mod types;

pub use types::{InstalledVersion, SessionState, UpdateSession};
