//! Update/lifecycle engine for the Updraft desktop shell.
//!
//! Every process launch is classified as either a headless installer
//! lifecycle call (run one hook, terminate) or a normal interactive launch
//! (start the shell, check a release feed in the background, let the user
//! apply a downloaded update and restart). The engine keeps exactly one
//! update session per process and never lets a failed or slow update block
//! startup or shutdown.

pub mod applier;
pub mod config;
pub mod feed;
pub mod lifecycle;
pub mod orchestrator;
pub mod session;
pub mod testing;

pub use applier::{Applier, ApplierConfig, ApplyError, FsApplier};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, ShellConfig,
};
pub use feed::{
    FeedError, FeedManifest, HttpFeed, LocalFeed, Release, ReleaseFeed, StagedRelease,
};
pub use lifecycle::{HookError, LifecycleHookDispatcher, PlatformShortcuts, ShortcutManager};
pub use orchestrator::{
    classify, AutoApplyPreference, ExitAction, InvocationMode, LifecycleEvent, UpdateConfig,
    UpdateOrchestrator,
};
pub use session::{InstalledVersion, SessionState, UpdateSession};
