//! Update orchestrator implementation.
//!
//! Owns the single per-process update session and drives it through
//! check -> download -> apply, plus the bounded headless hook path.
//! Re-entrancy is enforced by the session's precondition gates, not by
//! locking: the only concurrent actor is the single host-triggered
//! command.

use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use once_cell::sync::OnceCell;
use tokio::sync::{watch, RwLock};
use tracing::{debug, info, warn};

use crate::applier::{Applier, FsApplier};
use crate::feed::{HttpFeed, LocalFeed, ReleaseFeed};
use crate::lifecycle::{LifecycleHookDispatcher, ShortcutManager};
use crate::session::{InstalledVersion, SessionState, UpdateSession};

use super::config::UpdateConfig;
use super::types::{ExitAction, LifecycleEvent};

/// Callback invoked after every session transition, in order and without
/// loss. The watch channel coalesces; hosts that need every step use this.
pub type SessionUpdateCallback = Arc<dyn Fn(&UpdateSession) + Send + Sync>;

/// Which feed source this session resolved to. Chosen once per session,
/// never re-evaluated mid-flight.
#[derive(Debug, Clone, PartialEq, Eq)]
enum FeedSource {
    Local(PathBuf),
    Remote(String),
}

/// The update orchestrator - classifies launches and drives the update
/// session.
pub struct UpdateOrchestrator {
    config: UpdateConfig,
    updates_disabled: bool,
    shortcuts: Arc<dyn ShortcutManager>,
    feed_override: Option<Arc<dyn ReleaseFeed>>,
    applier_override: Option<Arc<dyn Applier>>,
    feed_source: OnceCell<FeedSource>,
    session: RwLock<UpdateSession>,
    state_tx: watch::Sender<UpdateSession>,
    update_callback: Option<SessionUpdateCallback>,
}

impl UpdateOrchestrator {
    /// Create the orchestrator for this process.
    ///
    /// `updates_disabled` comes from entry classification (`/U`); it is
    /// fixed for the lifetime of the session.
    pub fn new(
        config: UpdateConfig,
        installed: InstalledVersion,
        updates_disabled: bool,
        shortcuts: Arc<dyn ShortcutManager>,
    ) -> Self {
        let session = UpdateSession::new(installed);
        let (state_tx, _) = watch::channel(session.clone());

        Self {
            config,
            updates_disabled,
            shortcuts,
            feed_override: None,
            applier_override: None,
            feed_source: OnceCell::new(),
            session: RwLock::new(session),
            state_tx,
            update_callback: None,
        }
    }

    /// Use a specific feed instead of resolving one from configuration.
    pub fn with_feed(mut self, feed: Arc<dyn ReleaseFeed>) -> Self {
        self.feed_override = Some(feed);
        self
    }

    /// Use a specific applier instead of the filesystem one.
    pub fn with_applier(mut self, applier: Arc<dyn Applier>) -> Self {
        self.applier_override = Some(applier);
        self
    }

    /// Invoke `callback` after every session transition.
    pub fn with_update_callback(mut self, callback: SessionUpdateCallback) -> Self {
        self.update_callback = Some(callback);
        self
    }

    /// Subscribe to session snapshots. The receiver always holds the
    /// latest state; intermediate transitions may coalesce.
    pub fn subscribe(&self) -> watch::Receiver<UpdateSession> {
        self.state_tx.subscribe()
    }

    /// A snapshot of the current session.
    pub async fn session(&self) -> UpdateSession {
        self.session.read().await.clone()
    }

    // ------------------------------------------------------------------
    // Headless path
    // ------------------------------------------------------------------

    /// Run the hook for a headless lifecycle invocation and decide the
    /// exit.
    ///
    /// Blocks the calling thread for at most `timeout`: headless mode has
    /// no UI to keep responsive and must guarantee termination either way.
    /// The hook runs on its own thread; on timeout it is orphaned rather
    /// than cancelled and may still finish in the background, where it
    /// only touches the filesystem and never the session. A hook failure,
    /// panic or timeout is logged and swallowed - nothing on this path may
    /// block process shutdown.
    pub fn run_headless(&self, event: &LifecycleEvent, timeout: Duration) -> ExitAction {
        info!(event = event.as_str(), "Headless lifecycle invocation");

        let dispatcher = LifecycleHookDispatcher::new(Arc::clone(&self.shortcuts));
        let (tx, rx) = mpsc::channel();
        let hook_event = *event;
        thread::spawn(move || {
            let _ = tx.send(dispatcher.run(&hook_event));
        });

        match rx.recv_timeout(timeout) {
            Ok(Ok(())) => {
                info!(event = event.as_str(), "Lifecycle hook completed");
            }
            Ok(Err(e)) => {
                warn!(event = event.as_str(), "Lifecycle hook failed: {}", e);
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                warn!(
                    event = event.as_str(),
                    timeout_ms = timeout.as_millis() as u64,
                    "Lifecycle hook timed out; continuing as if it succeeded"
                );
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                warn!(event = event.as_str(), "Lifecycle hook aborted before reporting");
            }
        }

        ExitAction::TerminateImmediately
    }

    // ------------------------------------------------------------------
    // Interactive path
    // ------------------------------------------------------------------

    /// Check the feed for newer releases and stage their payloads.
    ///
    /// Accepted from `Idle`, `UpToDate`, `Failed` and `RestartPending`;
    /// anywhere else the call is a no-op. With updates disabled the
    /// session goes straight to `UpToDate` and the feed is never touched.
    /// All failures end in `Failed` with a human-readable reason; none
    /// escape to the caller.
    pub async fn check_for_updates(&self) {
        let resume_download = {
            let mut session = self.session.write().await;
            if !session.state().can_check() {
                debug!(
                    state = session.state().state_type(),
                    "Update check ignored"
                );
                return;
            }

            if self.updates_disabled {
                info!("Update checks disabled for this session");
                session.mark_up_to_date();
                self.publish(&session);
                return;
            }

            // A download failure keeps the pending list; the retry skips
            // the feed query and resumes with the staged plan.
            let resume = matches!(session.state(), SessionState::Failed { .. })
                && !session.pending().is_empty();

            session.begin_check();
            self.publish(&session);
            resume
        };

        // The feed client only lives for this operation.
        let feed = self.open_feed();

        if !resume_download {
            let installed = self.session.read().await.installed().clone();
            let releases = match feed.releases_after(&installed).await {
                Ok(releases) => releases,
                Err(e) => {
                    warn!("Update check failed: {}", e);
                    self.transition(|s| s.fail_check(e.to_string())).await;
                    return;
                }
            };

            if releases.is_empty() {
                info!(installed = %installed, "No newer releases");
                self.transition(|s| s.mark_up_to_date()).await;
                return;
            }

            info!(
                count = releases.len(),
                installed = %installed,
                "Newer releases available"
            );
            self.transition(|s| s.set_available(releases)).await;
        }

        self.download_pending(feed.as_ref()).await;
    }

    /// Apply the downloaded update and request a restart.
    ///
    /// Accepted only from `Downloaded`; anywhere else the call is a no-op,
    /// which also guarantees at most one apply in flight (`Applying` fails
    /// the same gate). Payloads are applied in version order so delta
    /// releases land before the final target.
    pub async fn apply_update(&self) {
        let staged = {
            let mut session = self.session.write().await;
            if !session.state().can_apply() {
                debug!(state = session.state().state_type(), "Apply ignored");
                return;
            }
            session.begin_apply();
            self.publish(&session);
            session.staged().to_vec()
        };

        // The applier only lives for this call; every exit path drops it.
        let applier = self.open_applier();

        for item in &staged {
            if let Err(e) = applier.apply(item).await {
                warn!(version = %item.release.version, "Apply failed: {}", e);
                self.transition(|s| s.fail_apply(e.to_string())).await;
                return;
            }
        }

        self.transition(|s| s.mark_applied()).await;

        // Hand the restart request to the host: it observes this state
        // and relaunches the process.
        self.transition(|s| s.mark_restart_pending()).await;
        info!("Update applied; restart requested");
    }

    async fn download_pending(&self, feed: &dyn ReleaseFeed) {
        let pending = self.session.read().await.pending().to_vec();
        self.transition(|s| s.begin_download()).await;

        let staging = self.config.resolved_staging_dir();
        let mut staged = Vec::with_capacity(pending.len());
        for release in &pending {
            match feed.fetch_payload(release, &staging).await {
                Ok(item) => {
                    debug!(version = %release.version, "Payload staged");
                    staged.push(item);
                }
                Err(e) => {
                    warn!(version = %release.version, "Download failed: {}", e);
                    self.transition(|s| s.fail_download(e.to_string())).await;
                    return;
                }
            }
        }

        info!(count = staged.len(), "All payloads staged");
        self.transition(|s| s.mark_downloaded(staged)).await;
    }

    // ------------------------------------------------------------------
    // Collaborator scopes
    // ------------------------------------------------------------------

    fn open_feed(&self) -> Arc<dyn ReleaseFeed> {
        if let Some(feed) = &self.feed_override {
            return Arc::clone(feed);
        }

        let source = self.feed_source.get_or_init(|| self.resolve_feed_source());
        match source {
            FeedSource::Local(dir) => Arc::new(LocalFeed::new(dir.clone())),
            FeedSource::Remote(url) => {
                Arc::new(HttpFeed::new(url.clone(), self.config.request_timeout()))
            }
        }
    }

    fn resolve_feed_source(&self) -> FeedSource {
        if let Some(dir) = &self.config.local_feed_dir {
            if dir.is_dir() {
                info!(dir = %dir.display(), "Using local feed override");
                return FeedSource::Local(dir.clone());
            }
        }
        FeedSource::Remote(self.config.feed_url.clone())
    }

    fn open_applier(&self) -> Arc<dyn Applier> {
        match &self.applier_override {
            Some(applier) => Arc::clone(applier),
            None => Arc::new(FsApplier::new(self.config.applier.clone())),
        }
    }

    // ------------------------------------------------------------------
    // Publication
    // ------------------------------------------------------------------

    async fn transition<F: FnOnce(&mut UpdateSession)>(&self, f: F) {
        let mut session = self.session.write().await;
        f(&mut session);
        self.publish(&session);
    }

    fn publish(&self, session: &UpdateSession) {
        debug!(state = session.state().state_type(), "Session transition");
        self.state_tx.send_replace(session.clone());
        if let Some(callback) = &self.update_callback {
            callback(session);
        }
    }
}
