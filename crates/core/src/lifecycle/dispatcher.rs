//! Lifecycle hook dispatch.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::orchestrator::LifecycleEvent;

use super::shortcut::ShortcutManager;

/// Error from a lifecycle hook action. Reported to the caller, never
/// propagated as a panic: headless mode must not crash the installer's
/// outer process.
#[derive(Debug, Error)]
pub enum HookError {
    #[error("Hook action failed: {0}")]
    Action(String),
}

/// Maps one lifecycle event to one fast, idempotent, non-interactive
/// action.
pub struct LifecycleHookDispatcher {
    shortcuts: Arc<dyn ShortcutManager>,
}

impl LifecycleHookDispatcher {
    /// Create a dispatcher over the given shortcut backend.
    pub fn new(shortcuts: Arc<dyn ShortcutManager>) -> Self {
        Self { shortcuts }
    }

    /// Run the hook for `event`.
    ///
    /// Install and update refresh the launcher shortcut, uninstall removes
    /// it, the remaining events are no-ops. Each action is idempotent;
    /// failures surface as `Err` and nothing else.
    pub fn run(&self, event: &LifecycleEvent) -> Result<(), HookError> {
        debug!(
            event = event.as_str(),
            backend = self.shortcuts.name(),
            "Running lifecycle hook"
        );

        match event {
            LifecycleEvent::InitialInstall | LifecycleEvent::AppUpdate => {
                self.shortcuts.create_shortcut()
            }
            LifecycleEvent::AppUninstall => self.shortcuts.remove_shortcut(),
            LifecycleEvent::AppObsoleted | LifecycleEvent::FirstRun => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingShortcuts;

    #[test]
    fn test_install_and_update_create_shortcut() {
        let shortcuts = Arc::new(RecordingShortcuts::new());
        let dispatcher = LifecycleHookDispatcher::new(Arc::clone(&shortcuts) as _);

        dispatcher.run(&LifecycleEvent::InitialInstall).unwrap();
        dispatcher.run(&LifecycleEvent::AppUpdate).unwrap();

        assert_eq!(shortcuts.created(), 2);
        assert_eq!(shortcuts.removed(), 0);
    }

    #[test]
    fn test_uninstall_removes_shortcut() {
        let shortcuts = Arc::new(RecordingShortcuts::new());
        let dispatcher = LifecycleHookDispatcher::new(Arc::clone(&shortcuts) as _);

        dispatcher.run(&LifecycleEvent::AppUninstall).unwrap();

        assert_eq!(shortcuts.created(), 0);
        assert_eq!(shortcuts.removed(), 1);
    }

    #[test]
    fn test_obsolete_and_firstrun_are_noops() {
        let shortcuts = Arc::new(RecordingShortcuts::new());
        let dispatcher = LifecycleHookDispatcher::new(Arc::clone(&shortcuts) as _);

        dispatcher.run(&LifecycleEvent::AppObsoleted).unwrap();
        dispatcher.run(&LifecycleEvent::FirstRun).unwrap();

        assert_eq!(shortcuts.created(), 0);
        assert_eq!(shortcuts.removed(), 0);
    }

    #[test]
    fn test_repeated_install_is_idempotent() {
        let shortcuts = Arc::new(RecordingShortcuts::new());
        let dispatcher = LifecycleHookDispatcher::new(Arc::clone(&shortcuts) as _);

        // Running the same event twice is the same end state as once; the
        // backend just sees another refresh.
        dispatcher.run(&LifecycleEvent::InitialInstall).unwrap();
        dispatcher.run(&LifecycleEvent::InitialInstall).unwrap();
        assert_eq!(shortcuts.created(), 2);
    }

    #[test]
    fn test_action_failure_surfaces_as_err() {
        let shortcuts = Arc::new(RecordingShortcuts::failing());
        let dispatcher = LifecycleHookDispatcher::new(shortcuts as _);

        let err = dispatcher.run(&LifecycleEvent::InitialInstall).unwrap_err();
        assert!(err.to_string().contains("Hook action failed"));
    }
}
