//! Types for the update orchestrator.

use semver::Version;
use serde::{Deserialize, Serialize};

/// A headless installer lifecycle event.
///
/// Exactly one is selected per headless invocation, carried with the
/// optional version the installer passed alongside the marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleEvent {
    /// First installation of the application.
    InitialInstall,
    /// The application was just updated to a new version.
    AppUpdate,
    /// The application is being uninstalled.
    AppUninstall,
    /// This version was superseded and its install is being retired.
    AppObsoleted,
    /// First launch after installation.
    FirstRun,
}

impl LifecycleEvent {
    /// Returns the event as a string (for logging).
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleEvent::InitialInstall => "initial_install",
            LifecycleEvent::AppUpdate => "app_update",
            LifecycleEvent::AppUninstall => "app_uninstall",
            LifecycleEvent::AppObsoleted => "app_obsoleted",
            LifecycleEvent::FirstRun => "first_run",
        }
    }
}

impl std::fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the process was invoked, derived once per launch from the raw
/// argument vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationMode {
    /// Installer-driven launch: run one lifecycle hook and terminate.
    Headless {
        event: LifecycleEvent,
        /// Version argument following the lifecycle marker, when present.
        version: Option<Version>,
    },
    /// Normal launch carrying the user's switch options, case-folded to
    /// uppercase with the switch prefix stripped.
    Interactive { options: Vec<String> },
}

impl InvocationMode {
    /// Returns true for a headless installer invocation.
    pub fn is_headless(&self) -> bool {
        matches!(self, InvocationMode::Headless { .. })
    }

    /// Returns true when update checking was disabled for this session.
    pub fn updates_disabled(&self) -> bool {
        match self {
            InvocationMode::Interactive { options } => options
                .iter()
                .any(|o| o == super::classify::DISABLE_UPDATES_OPTION),
            InvocationMode::Headless { .. } => false,
        }
    }
}

/// What the host should do once the orchestrator has handled the launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitAction {
    /// Terminate without starting the interactive shell. Every headless
    /// lifecycle invocation ends here.
    TerminateImmediately,
    /// Proceed to normal interactive startup.
    ContinueToInteractive,
}
