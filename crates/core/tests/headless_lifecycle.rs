//! Headless lifecycle invocation tests: classification, hook dispatch and
//! the timeout policy.

use std::sync::Arc;
use std::time::{Duration, Instant};

use updraft_core::{
    classify,
    testing::{BlockingShortcuts, RecordingShortcuts},
    ExitAction, InstalledVersion, InvocationMode, LifecycleEvent, LifecycleHookDispatcher,
    UpdateConfig, UpdateOrchestrator,
};

fn args(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}

// =============================================================================
// Classification
// =============================================================================

#[test]
fn test_lifecycle_markers_always_classify_headless() {
    let markers = [
        "--setup-install",
        "--setup-updated",
        "--setup-uninstall",
        "--setup-obsolete",
        "--setup-firstrun",
    ];

    for marker in markers {
        // The marker wins no matter which switch options surround it.
        let argv = args(&["/U", marker, "1.0.0", "/Debug"]);
        assert!(
            classify(&argv).is_headless(),
            "expected headless for {marker}"
        );
    }
}

#[test]
fn test_no_marker_classifies_interactive() {
    let mode = classify(&args(&["/u", "some-document.txt"]));
    match mode {
        InvocationMode::Interactive { ref options } => {
            assert_eq!(options, &vec!["U".to_string()]);
        }
        other => panic!("expected interactive, got {other:?}"),
    }
    assert!(mode.updates_disabled());
}

// =============================================================================
// Hook execution
// =============================================================================

fn orchestrator_with(
    shortcuts: Arc<dyn updraft_core::ShortcutManager>,
) -> UpdateOrchestrator {
    UpdateOrchestrator::new(
        UpdateConfig::default(),
        InstalledVersion::dev(),
        false,
        shortcuts,
    )
}

#[test]
fn test_all_events_terminate_immediately() {
    let shortcuts = Arc::new(RecordingShortcuts::new());
    let orchestrator = orchestrator_with(Arc::clone(&shortcuts) as _);

    let events = [
        LifecycleEvent::InitialInstall,
        LifecycleEvent::AppUpdate,
        LifecycleEvent::AppUninstall,
        LifecycleEvent::AppObsoleted,
        LifecycleEvent::FirstRun,
    ];

    for event in &events {
        let action = orchestrator.run_headless(event, Duration::from_secs(1));
        assert_eq!(action, ExitAction::TerminateImmediately);
    }

    // install + update created, uninstall removed, the rest were no-ops.
    assert_eq!(shortcuts.created(), 2);
    assert_eq!(shortcuts.removed(), 1);
}

#[test]
fn test_blocking_hook_is_abandoned_within_timeout() {
    let orchestrator = orchestrator_with(Arc::new(BlockingShortcuts));
    let timeout = Duration::from_millis(200);

    let start = Instant::now();
    let action = orchestrator.run_headless(&LifecycleEvent::InitialInstall, timeout);
    let elapsed = start.elapsed();

    assert_eq!(action, ExitAction::TerminateImmediately);
    assert!(elapsed >= timeout, "returned before the timeout: {elapsed:?}");
    assert!(
        elapsed < timeout + Duration::from_secs(2),
        "blocked far past the timeout: {elapsed:?}"
    );
}

#[test]
fn test_hook_failure_does_not_block_termination() {
    let orchestrator = orchestrator_with(Arc::new(RecordingShortcuts::failing()));

    let action =
        orchestrator.run_headless(&LifecycleEvent::InitialInstall, Duration::from_secs(1));
    assert_eq!(action, ExitAction::TerminateImmediately);
}

#[test]
fn test_repeated_install_hook_is_idempotent() {
    let shortcuts = Arc::new(RecordingShortcuts::new());
    let dispatcher = LifecycleHookDispatcher::new(Arc::clone(&shortcuts) as _);

    // Running install twice leaves the same end state as running it once:
    // the shortcut exists.
    dispatcher.run(&LifecycleEvent::InitialInstall).unwrap();
    dispatcher.run(&LifecycleEvent::InitialInstall).unwrap();
    assert_eq!(shortcuts.created(), 2);

    // Removing twice is equally safe.
    dispatcher.run(&LifecycleEvent::AppUninstall).unwrap();
    dispatcher.run(&LifecycleEvent::AppUninstall).unwrap();
    assert_eq!(shortcuts.removed(), 2);
}
