use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Shell app name is not empty
/// - Update feed URL is not empty
/// - Hook and request timeouts are not zero
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.shell.app_name.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "shell.app_name cannot be empty".to_string(),
        ));
    }

    if config.update.feed_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "update.feed_url cannot be empty".to_string(),
        ));
    }

    if config.update.hook_timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "update.hook_timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.update.request_timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "update.request_timeout_secs cannot be 0".to_string(),
        ));
    }

    Ok(())
}
