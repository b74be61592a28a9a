//! Filesystem applier.
//!
//! Installs a staged payload into the install directory with a
//! backup-and-restore discipline: the existing file is renamed aside
//! before the new one is copied in, restored if the copy fails, and
//! removed once the install succeeds.

use std::path::Path;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::feed::StagedRelease;

use super::config::ApplierConfig;
use super::error::ApplyError;
use super::traits::Applier;

/// Applier that installs payloads as files in the install directory.
pub struct FsApplier {
    config: ApplierConfig,
}

impl FsApplier {
    /// Create a new applier with the given configuration.
    pub fn new(config: ApplierConfig) -> Self {
        Self { config }
    }

    async fn install_file(src: &Path, target: &Path) -> Result<(), ApplyError> {
        let backup = target.with_extension("old");

        if tokio::fs::metadata(target).await.is_ok() {
            tokio::fs::rename(target, &backup).await.map_err(|e| {
                ApplyError::Io(format!(
                    "cannot back up {}: {e}",
                    target.display()
                ))
            })?;
        }

        match tokio::fs::copy(src, target).await {
            Ok(_) => {
                let _ = tokio::fs::remove_file(&backup).await;
                Ok(())
            }
            Err(e) => {
                // Put the previous install back before reporting.
                if tokio::fs::metadata(&backup).await.is_ok() {
                    let _ = tokio::fs::rename(&backup, target).await;
                }
                Err(ApplyError::Io(format!(
                    "cannot install {}: {e}",
                    target.display()
                )))
            }
        }
    }
}

#[async_trait]
impl Applier for FsApplier {
    fn name(&self) -> &str {
        "fs"
    }

    async fn apply(&self, staged: &StagedRelease) -> Result<(), ApplyError> {
        if tokio::fs::metadata(&staged.path).await.is_err() {
            return Err(ApplyError::MissingPayload(
                staged.path.display().to_string(),
            ));
        }

        let install_dir = self.config.resolved_install_dir()?;
        tokio::fs::create_dir_all(&install_dir)
            .await
            .map_err(|e| ApplyError::Io(format!("cannot create install directory: {e}")))?;

        let file_name = staged.path.file_name().ok_or_else(|| {
            ApplyError::MissingPayload(staged.path.display().to_string())
        })?;
        let target = install_dir.join(file_name);

        debug!(
            version = %staged.release.version,
            target = %target.display(),
            "Installing staged payload"
        );
        Self::install_file(&staged.path, &target).await?;

        info!(version = %staged.release.version, "Payload installed");
        Ok(())
    }
}
