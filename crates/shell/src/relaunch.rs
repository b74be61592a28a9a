//! Process relaunch after a successful update.

use std::process::Command;

use anyhow::{Context, Result};
use tracing::info;

use updraft_core::orchestrator::{DISABLE_UPDATES_OPTION, OPTION_PREFIX, SETUP_ARG_PREFIX};

/// Spawn a fresh instance of the current executable; the caller exits
/// afterwards. Installer control arguments and the disable-updates switch
/// are dropped - the new instance must check for updates again - while
/// everything else is passed through unchanged.
pub fn relaunch() -> Result<()> {
    let exe = std::env::current_exe().context("cannot determine current executable")?;
    let args: Vec<String> = std::env::args()
        .skip(1)
        .filter(|a| !a.starts_with(SETUP_ARG_PREFIX))
        .filter(|a| !is_disable_updates(a))
        .collect();

    info!(exe = %exe.display(), "Relaunching after update");
    Command::new(&exe)
        .args(&args)
        .spawn()
        .with_context(|| format!("failed to relaunch {}", exe.display()))?;

    Ok(())
}

fn is_disable_updates(arg: &str) -> bool {
    arg.strip_prefix(OPTION_PREFIX)
        .map(|option| option.eq_ignore_ascii_case(DISABLE_UPDATES_OPTION))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disable_updates_switch_is_recognized() {
        assert!(is_disable_updates("/U"));
        assert!(is_disable_updates("/u"));
        assert!(!is_disable_updates("/Debug"));
        assert!(!is_disable_updates("U"));
        assert!(!is_disable_updates("--setup-install"));
    }
}
