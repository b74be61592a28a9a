//! Update/lifecycle orchestration.
//!
//! Classifies each process launch as a headless installer lifecycle call
//! or a normal interactive one, and drives the interactive
//! check -> download -> apply -> restart sequence against a release feed:
//! - **Headless**: one bounded, synchronous hook, then terminate
//! - **Interactive**: async check and apply that never block the host

mod classify;
mod config;
mod runner;
mod types;

pub use classify::{classify, DISABLE_UPDATES_OPTION, OPTION_PREFIX, SETUP_ARG_PREFIX};
pub use config::{AutoApplyPreference, UpdateConfig};
pub use runner::{SessionUpdateCallback, UpdateOrchestrator};
pub use types::{ExitAction, InvocationMode, LifecycleEvent};
