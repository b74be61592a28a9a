//! Mock shortcut backends for testing.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use crate::lifecycle::{HookError, ShortcutManager};

/// Shortcut backend that records operations instead of touching the
/// filesystem.
pub struct RecordingShortcuts {
    created: AtomicUsize,
    removed: AtomicUsize,
    fail: bool,
}

impl Default for RecordingShortcuts {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingShortcuts {
    /// A backend where every operation succeeds.
    pub fn new() -> Self {
        Self {
            created: AtomicUsize::new(0),
            removed: AtomicUsize::new(0),
            fail: false,
        }
    }

    /// A backend where every operation fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    /// Number of create/refresh operations seen.
    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    /// Number of remove operations seen.
    pub fn removed(&self) -> usize {
        self.removed.load(Ordering::SeqCst)
    }
}

impl ShortcutManager for RecordingShortcuts {
    fn name(&self) -> &str {
        "recording"
    }

    fn create_shortcut(&self) -> Result<(), HookError> {
        if self.fail {
            return Err(HookError::Action("simulated shortcut failure".to_string()));
        }
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn remove_shortcut(&self) -> Result<(), HookError> {
        if self.fail {
            return Err(HookError::Action("simulated shortcut failure".to_string()));
        }
        self.removed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Shortcut backend that never returns, for exercising the headless
/// timeout policy. The hook thread running it is orphaned by the caller
/// and dies with the process.
pub struct BlockingShortcuts;

impl ShortcutManager for BlockingShortcuts {
    fn name(&self) -> &str {
        "blocking"
    }

    fn create_shortcut(&self) -> Result<(), HookError> {
        loop {
            thread::sleep(Duration::from_secs(60));
        }
    }

    fn remove_shortcut(&self) -> Result<(), HookError> {
        loop {
            thread::sleep(Duration::from_secs(60));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_counts() {
        let shortcuts = RecordingShortcuts::new();
        shortcuts.create_shortcut().unwrap();
        shortcuts.create_shortcut().unwrap();
        shortcuts.remove_shortcut().unwrap();

        assert_eq!(shortcuts.created(), 2);
        assert_eq!(shortcuts.removed(), 1);
    }

    #[test]
    fn test_failing_backend() {
        let shortcuts = RecordingShortcuts::failing();
        assert!(shortcuts.create_shortcut().is_err());
        assert!(shortcuts.remove_shortcut().is_err());
        assert_eq!(shortcuts.created(), 0);
    }
}
