mod host;
mod relaunch;

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use updraft_core::{
    classify, load_config, validate_config, Config, ConfigError, ExitAction, InstalledVersion,
    InvocationMode,
};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("UPDRAFT_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration. A desktop shell must start without one; a
    // present-but-broken file is still fatal.
    let config = match load_config(&config_path) {
        Ok(config) => {
            info!("Loaded configuration from {:?}", config_path);
            config
        }
        Err(ConfigError::FileNotFound(_)) => {
            warn!("No configuration at {:?}; using defaults", config_path);
            Config::default()
        }
        Err(e) => {
            return Err(e)
                .with_context(|| format!("Failed to load config from {:?}", config_path))
        }
    };

    validate_config(&config).context("Configuration validation failed")?;

    // Classify this launch from the raw argument vector.
    let argv: Vec<String> = std::env::args().skip(1).collect();
    let invocation = classify(&argv);
    let installed = installed_version();

    info!(
        version = VERSION,
        installed = %installed,
        "Starting {}",
        config.shell.app_name
    );

    let action = match &invocation {
        InvocationMode::Headless { event, version } => {
            info!(event = event.as_str(), version = ?version, "Installer lifecycle launch");
            host::run_headless(&config, installed.clone(), event)?
        }
        InvocationMode::Interactive { .. } => ExitAction::ContinueToInteractive,
    };

    match action {
        ExitAction::TerminateImmediately => {
            info!("Headless invocation complete; terminating");
            Ok(())
        }
        ExitAction::ContinueToInteractive => {
            host::run_interactive(config, installed, &invocation).await
        }
    }
}

/// The version baked into this binary. An unparsable version string is a
/// development run.
fn installed_version() -> InstalledVersion {
    InstalledVersion::from(semver::Version::parse(VERSION).ok())
}
