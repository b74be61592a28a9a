//! Interactive host loop.
//!
//! Owns the single orchestrator for the lifetime of the process, logs
//! session status for the user, applies downloaded updates according to
//! the configured preference, and relaunches once an update is applied.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::signal;
use tracing::info;

use updraft_core::{
    AutoApplyPreference, Config, ExitAction, InstalledVersion, InvocationMode, LifecycleEvent,
    PlatformShortcuts, SessionState, ShortcutManager, UpdateOrchestrator,
};

use crate::relaunch;

fn build_orchestrator(
    config: &Config,
    installed: InstalledVersion,
    updates_disabled: bool,
) -> Result<UpdateOrchestrator> {
    let shortcuts: Arc<dyn ShortcutManager> =
        Arc::new(PlatformShortcuts::new(config.shell.app_name.clone())?);

    Ok(UpdateOrchestrator::new(
        config.update.clone(),
        installed,
        updates_disabled,
        shortcuts,
    ))
}

/// Run one installer lifecycle hook, bounded by the configured timeout.
pub fn run_headless(
    config: &Config,
    installed: InstalledVersion,
    event: &LifecycleEvent,
) -> Result<ExitAction> {
    let orchestrator = build_orchestrator(config, installed, false)?;
    Ok(orchestrator.run_headless(event, config.update.hook_timeout()))
}

/// Run the interactive shell until shutdown or restart.
pub async fn run_interactive(
    config: Config,
    installed: InstalledVersion,
    invocation: &InvocationMode,
) -> Result<()> {
    let orchestrator = Arc::new(build_orchestrator(
        &config,
        installed,
        invocation.updates_disabled(),
    )?);
    let mut updates = orchestrator.subscribe();

    // Kick off the update check in the background. The shell starts and
    // stays responsive regardless of its outcome.
    let checker = Arc::clone(&orchestrator);
    tokio::spawn(async move { checker.check_for_updates().await });

    info!("{} ready", config.shell.app_name);

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let session = updates.borrow_and_update().clone();
                info!("{}", session.status_line());

                match session.state() {
                    SessionState::Downloaded
                        if config.update.auto_apply == AutoApplyPreference::Always =>
                    {
                        let applier = Arc::clone(&orchestrator);
                        tokio::spawn(async move { applier.apply_update().await });
                    }
                    SessionState::RestartPending => {
                        relaunch::relaunch()?;
                        // Give the replacement a moment to come up before
                        // this process disappears from under it.
                        tokio::time::sleep(Duration::from_millis(100)).await;
                        break;
                    }
                    _ => {}
                }
            }
            _ = shutdown_signal() => {
                info!("Shutting down");
                break;
            }
        }
    }

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
