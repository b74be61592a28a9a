//! Launcher shortcut management.

use std::path::PathBuf;

use tracing::debug;

use super::dispatcher::HookError;

/// Capability for managing the application's launcher shortcut.
///
/// Both operations are idempotent: creating an existing shortcut refreshes
/// it, removing a missing one succeeds.
pub trait ShortcutManager: Send + Sync {
    /// Returns the name of this backend.
    fn name(&self) -> &str;

    /// Create or refresh the launcher shortcut.
    fn create_shortcut(&self) -> Result<(), HookError>;

    /// Remove the launcher shortcut.
    fn remove_shortcut(&self) -> Result<(), HookError>;
}

/// Filesystem-backed shortcuts for the current platform: a `.desktop`
/// entry on unix-like systems, a `.url` file on Windows.
pub struct PlatformShortcuts {
    app_name: String,
    exe_path: PathBuf,
}

impl PlatformShortcuts {
    /// Create a shortcut manager for the running executable.
    pub fn new(app_name: impl Into<String>) -> Result<Self, HookError> {
        let exe_path = std::env::current_exe().map_err(|e| {
            HookError::Action(format!("cannot determine executable path: {e}"))
        })?;

        Ok(Self {
            app_name: app_name.into(),
            exe_path,
        })
    }

    fn shortcut_path(&self) -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        {
            dirs::desktop_dir().map(|d| d.join(format!("{}.url", self.app_name)))
        }
        #[cfg(not(target_os = "windows"))]
        {
            dirs::data_dir().map(|d| {
                d.join("applications")
                    .join(format!("{}.desktop", self.app_name.to_lowercase()))
            })
        }
    }

    fn shortcut_contents(&self) -> String {
        #[cfg(target_os = "windows")]
        {
            format!(
                "[InternetShortcut]\r\nURL=file:///{}\r\n",
                self.exe_path.display()
            )
        }
        #[cfg(not(target_os = "windows"))]
        {
            format!(
                "[Desktop Entry]\nType=Application\nName={}\nExec={}\nTerminal=false\n",
                self.app_name,
                self.exe_path.display()
            )
        }
    }
}

impl ShortcutManager for PlatformShortcuts {
    fn name(&self) -> &str {
        "platform"
    }

    fn create_shortcut(&self) -> Result<(), HookError> {
        let path = self.shortcut_path().ok_or_else(|| {
            HookError::Action("cannot determine shortcut directory".to_string())
        })?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                HookError::Action(format!(
                    "cannot create shortcut directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        std::fs::write(&path, self.shortcut_contents()).map_err(|e| {
            HookError::Action(format!("cannot write shortcut {}: {e}", path.display()))
        })?;

        debug!(path = %path.display(), "Shortcut written");
        Ok(())
    }

    fn remove_shortcut(&self) -> Result<(), HookError> {
        let path = self.shortcut_path().ok_or_else(|| {
            HookError::Action("cannot determine shortcut directory".to_string())
        })?;

        match std::fs::remove_file(&path) {
            Ok(()) => {
                debug!(path = %path.display(), "Shortcut removed");
                Ok(())
            }
            // Already gone: removal is idempotent.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(HookError::Action(format!(
                "cannot remove shortcut {}: {e}",
                path.display()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortcut_contents_reference_app_and_exe() {
        let shortcuts = PlatformShortcuts::new("TestApp").unwrap();
        let contents = shortcuts.shortcut_contents();

        #[cfg(not(target_os = "windows"))]
        {
            assert!(contents.starts_with("[Desktop Entry]"));
            assert!(contents.contains("Name=TestApp"));
            assert!(contents.contains("Exec="));
        }
        #[cfg(target_os = "windows")]
        {
            assert!(contents.starts_with("[InternetShortcut]"));
            assert!(contents.contains("URL=file:///"));
        }
    }

    #[test]
    fn test_shortcut_path_uses_app_name() {
        let shortcuts = PlatformShortcuts::new("TestApp").unwrap();
        if let Some(path) = shortcuts.shortcut_path() {
            let name = path.file_name().unwrap().to_string_lossy().to_lowercase();
            assert!(name.starts_with("testapp"));
        }
    }
}
