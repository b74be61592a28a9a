use serde::{Deserialize, Serialize};

use crate::orchestrator::UpdateConfig;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub shell: ShellConfig,
    #[serde(default)]
    pub update: UpdateConfig,
}

/// Host shell configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ShellConfig {
    /// Display name used for the window title and the launcher shortcut.
    #[serde(default = "default_app_name")]
    pub app_name: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
        }
    }
}

fn default_app_name() -> String {
    "Updraft".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::AutoApplyPreference;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.shell.app_name, "Updraft");
        assert_eq!(
            config.update.feed_url,
            "https://releases.updraft.app/stable"
        );
        assert_eq!(config.update.auto_apply, AutoApplyPreference::Ask);
    }

    #[test]
    fn test_deserialize_shell_section() {
        let toml = r#"
[shell]
app_name = "My App"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.shell.app_name, "My App");
    }

    #[test]
    fn test_deserialize_update_section() {
        let toml = r#"
[update]
feed_url = "https://example.com/releases"
hook_timeout_secs = 5
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.update.feed_url, "https://example.com/releases");
        assert_eq!(config.update.hook_timeout_secs, 5);
    }

    #[test]
    fn test_config_serialization_round_trip() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let restored: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(restored.shell.app_name, config.shell.app_name);
        assert_eq!(restored.update.feed_url, config.update.feed_url);
    }
}
