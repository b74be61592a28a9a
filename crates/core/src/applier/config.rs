//! Applier configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::error::ApplyError;

/// Configuration for payload installation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplierConfig {
    /// Directory payloads are installed into. Defaults to the running
    /// executable's directory.
    #[serde(default)]
    pub install_dir: Option<PathBuf>,
}

impl ApplierConfig {
    /// The effective install directory.
    pub fn resolved_install_dir(&self) -> Result<PathBuf, ApplyError> {
        if let Some(dir) = &self.install_dir {
            return Ok(dir.clone());
        }

        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|p| p.to_path_buf()))
            .ok_or_else(|| ApplyError::Io("cannot determine install directory".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_resolves_to_exe_dir() {
        let config = ApplierConfig::default();
        let dir = config.resolved_install_dir().unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn test_explicit_install_dir_wins() {
        let config = ApplierConfig {
            install_dir: Some(PathBuf::from("/opt/app")),
        };
        assert_eq!(
            config.resolved_install_dir().unwrap(),
            PathBuf::from("/opt/app")
        );
    }

    #[test]
    fn test_deserialize_empty_section() {
        let config: ApplierConfig = toml::from_str("").unwrap();
        assert!(config.install_dir.is_none());
    }
}
