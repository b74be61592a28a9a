//! Update session data types.

use chrono::{DateTime, Utc};
use semver::Version;
use serde::{Deserialize, Serialize};

use crate::feed::{Release, StagedRelease};

/// The version this process is running, read from the binary's metadata.
/// `None` is a development/unpackaged run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledVersion(Option<Version>);

impl InstalledVersion {
    /// A development run with no packaged version.
    pub fn dev() -> Self {
        Self(None)
    }

    /// The packaged version, if any.
    pub fn version(&self) -> Option<&Version> {
        self.0.as_ref()
    }

    /// Returns true for a development/unpackaged run.
    pub fn is_dev(&self) -> bool {
        self.0.is_none()
    }
}

impl From<Version> for InstalledVersion {
    fn from(version: Version) -> Self {
        Self(Some(version))
    }
}

impl From<Option<Version>> for InstalledVersion {
    fn from(version: Option<Version>) -> Self {
        Self(version)
    }
}

impl std::fmt::Display for InstalledVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Some(version) => write!(f, "{version}"),
            None => f.write_str("dev"),
        }
    }
}

/// Current state of the update session.
///
/// State machine flow:
/// ```text
/// Idle -> Checking -> UpToDate
///            |
///            v
///     UpdateAvailable -> Downloading -> Downloaded -> Applying
///                                                        |
///                                                        v
///                                       Applied -> RestartPending
///
/// Checking, Downloading and Applying can transition to Failed.
/// A new check is accepted from Idle, UpToDate, Failed and RestartPending.
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionState {
    /// No update activity yet.
    Idle,
    /// Querying the release feed.
    Checking,
    /// The feed had nothing newer than the installed version.
    UpToDate,
    /// Newer releases were found; the pending list is populated.
    UpdateAvailable,
    /// Payloads are being staged.
    Downloading,
    /// All payloads staged; an apply may be requested.
    Downloaded,
    /// Staged payloads are being installed.
    Applying,
    /// The update was installed.
    Applied,
    /// The host should relaunch the process to pick up the new version.
    RestartPending,
    /// The last operation failed. Recoverable: a new check is accepted.
    Failed { reason: String },
}

impl SessionState {
    /// Returns true if a new update check is accepted from this state.
    pub fn can_check(&self) -> bool {
        matches!(
            self,
            SessionState::Idle
                | SessionState::UpToDate
                | SessionState::Failed { .. }
                | SessionState::RestartPending
        )
    }

    /// Returns true if an apply may be requested from this state.
    pub fn can_apply(&self) -> bool {
        matches!(self, SessionState::Downloaded)
    }

    /// Returns true once the session has applied an update; the running
    /// process is stale until it restarts.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Applied | SessionState::RestartPending)
    }

    /// Returns the state type as a string (for logging and filtering).
    pub fn state_type(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Checking => "checking",
            SessionState::UpToDate => "up_to_date",
            SessionState::UpdateAvailable => "update_available",
            SessionState::Downloading => "downloading",
            SessionState::Downloaded => "downloaded",
            SessionState::Applying => "applying",
            SessionState::Applied => "applied",
            SessionState::RestartPending => "restart_pending",
            SessionState::Failed { .. } => "failed",
        }
    }
}

/// The per-process update session.
///
/// Exactly one instance exists per process. The orchestrator owns and
/// mutates it; everything else observes cloned snapshots. The pending list
/// is ordered by version ascending and is non-empty exactly while the
/// session is between `UpdateAvailable` and `Applying`, plus after a
/// download failure, where it is retained so a retry can skip the feed
/// query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSession {
    state: SessionState,
    installed: InstalledVersion,
    pending: Vec<Release>,
    staged: Vec<StagedRelease>,
    last_error: Option<String>,
    last_checked: Option<DateTime<Utc>>,
    applied_from: Option<InstalledVersion>,
    applied_to: Option<Version>,
}

impl UpdateSession {
    pub(crate) fn new(installed: InstalledVersion) -> Self {
        Self {
            state: SessionState::Idle,
            installed,
            pending: Vec::new(),
            staged: Vec::new(),
            last_error: None,
            last_checked: None,
            applied_from: None,
            applied_to: None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn installed(&self) -> &InstalledVersion {
        &self.installed
    }

    /// Pending releases, ordered by version ascending.
    pub fn pending(&self) -> &[Release] {
        &self.pending
    }

    /// Staged payloads, in the same order as the pending list.
    pub fn staged(&self) -> &[StagedRelease] {
        &self.staged
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn last_checked(&self) -> Option<DateTime<Utc>> {
        self.last_checked
    }

    /// The version shown to the user: the maximum pending version, or the
    /// version an apply just installed.
    pub fn target_version(&self) -> Option<&Version> {
        self.pending
            .last()
            .map(|r| &r.version)
            .or(self.applied_to.as_ref())
    }

    /// True while an apply may be requested.
    pub fn can_apply(&self) -> bool {
        self.state.can_apply()
    }

    /// Human-readable status for the presentation layer.
    pub fn status_line(&self) -> String {
        match &self.state {
            SessionState::Idle => "Ready.".to_string(),
            SessionState::Checking => "Checking...".to_string(),
            SessionState::UpToDate => "You are running the latest version.".to_string(),
            SessionState::UpdateAvailable => {
                format!("Version {} available.", self.target_display())
            }
            SessionState::Downloading => {
                format!("Version {} available. Downloading...", self.target_display())
            }
            SessionState::Downloaded => {
                format!("Version {} ready to install.", self.target_display())
            }
            SessionState::Applying => {
                format!("Installing version {}...", self.target_display())
            }
            SessionState::Applied => format!(
                "Updated from {} to {}.",
                self.applied_from_display(),
                self.target_display()
            ),
            SessionState::RestartPending => format!(
                "Updated to version {}. Restart required.",
                self.target_display()
            ),
            SessionState::Failed { reason } => format!("Error while updating: {reason}"),
        }
    }

    fn target_display(&self) -> String {
        self.target_version()
            .map(|v| v.to_string())
            .unwrap_or_else(|| "?".to_string())
    }

    fn applied_from_display(&self) -> String {
        self.applied_from
            .as_ref()
            .map(|v| v.to_string())
            .unwrap_or_else(|| "?".to_string())
    }

    // ------------------------------------------------------------------
    // Transitions. Crate-internal: only the orchestrator drives these.
    // ------------------------------------------------------------------

    pub(crate) fn begin_check(&mut self) {
        self.state = SessionState::Checking;
        self.last_checked = Some(Utc::now());
        self.last_error = None;
    }

    pub(crate) fn mark_up_to_date(&mut self) {
        self.pending.clear();
        self.staged.clear();
        self.state = SessionState::UpToDate;
    }

    pub(crate) fn set_available(&mut self, mut releases: Vec<Release>) {
        releases.sort_by(|a, b| a.version.cmp(&b.version));
        self.pending = releases;
        self.state = SessionState::UpdateAvailable;
    }

    pub(crate) fn begin_download(&mut self) {
        self.staged.clear();
        self.state = SessionState::Downloading;
    }

    pub(crate) fn mark_downloaded(&mut self, staged: Vec<StagedRelease>) {
        self.staged = staged;
        self.state = SessionState::Downloaded;
    }

    pub(crate) fn begin_apply(&mut self) {
        self.state = SessionState::Applying;
    }

    pub(crate) fn mark_applied(&mut self) {
        self.applied_from = Some(self.installed.clone());
        self.applied_to = self.pending.last().map(|r| r.version.clone());
        self.pending.clear();
        self.staged.clear();
        self.state = SessionState::Applied;
    }

    pub(crate) fn mark_restart_pending(&mut self) {
        self.state = SessionState::RestartPending;
    }

    /// The feed query failed; nothing was pending yet.
    pub(crate) fn fail_check(&mut self, reason: String) {
        self.pending.clear();
        self.staged.clear();
        self.last_error = Some(reason.clone());
        self.state = SessionState::Failed { reason };
    }

    /// A payload download failed. The pending list is retained so a retry
    /// can resume without re-querying the feed.
    pub(crate) fn fail_download(&mut self, reason: String) {
        self.staged.clear();
        self.last_error = Some(reason.clone());
        self.state = SessionState::Failed { reason };
    }

    /// An apply failed. The pending plan is destroyed: a fresh check is
    /// required before any further apply attempt.
    pub(crate) fn fail_apply(&mut self, reason: String) {
        self.pending.clear();
        self.staged.clear();
        self.last_error = Some(reason.clone());
        self.state = SessionState::Failed { reason };
    }
}
