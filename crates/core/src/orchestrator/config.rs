//! Update orchestrator configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::applier::ApplierConfig;

/// When a downloaded update is applied without an explicit command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoApplyPreference {
    /// Leave the apply decision to the host's own prompt (default).
    #[default]
    Ask,
    /// Apply as soon as the download completes.
    Always,
    /// Never apply automatically; only report availability.
    Never,
}

impl AutoApplyPreference {
    /// Returns the preference as a string (for logging).
    pub fn as_str(&self) -> &'static str {
        match self {
            AutoApplyPreference::Ask => "ask",
            AutoApplyPreference::Always => "always",
            AutoApplyPreference::Never => "never",
        }
    }
}

/// Configuration for the update orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateConfig {
    /// Remote release feed base URL.
    #[serde(default = "default_feed_url")]
    pub feed_url: String,

    /// Local feed override. When this directory exists on disk it is
    /// preferred over the remote feed for the whole session.
    #[serde(default)]
    pub local_feed_dir: Option<PathBuf>,

    /// Hard wall-clock budget for a headless lifecycle hook, in seconds.
    /// A hook that overruns is abandoned, not retried.
    #[serde(default = "default_hook_timeout")]
    pub hook_timeout_secs: u64,

    /// HTTP request timeout for the remote feed, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Where payloads are staged before applying. Defaults to a directory
    /// under the system temp dir.
    #[serde(default)]
    pub staging_dir: Option<PathBuf>,

    /// Whether a downloaded update is applied without an explicit command.
    #[serde(default)]
    pub auto_apply: AutoApplyPreference,

    /// Payload installation settings.
    #[serde(default)]
    pub applier: ApplierConfig,
}

fn default_feed_url() -> String {
    "https://releases.updraft.app/stable".to_string()
}

fn default_hook_timeout() -> u64 {
    15
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            feed_url: default_feed_url(),
            local_feed_dir: None,
            hook_timeout_secs: default_hook_timeout(),
            request_timeout_secs: default_request_timeout(),
            staging_dir: None,
            auto_apply: AutoApplyPreference::default(),
            applier: ApplierConfig::default(),
        }
    }
}

impl UpdateConfig {
    /// Headless hook timeout as a duration.
    pub fn hook_timeout(&self) -> Duration {
        Duration::from_secs(self.hook_timeout_secs)
    }

    /// Feed request timeout as a duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// The effective staging directory.
    pub fn resolved_staging_dir(&self) -> PathBuf {
        self.staging_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("updraft-staging"))
    }
}
