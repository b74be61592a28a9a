//! Local directory feed backend.
//!
//! A feed rooted at a directory containing `releases.json` and payload
//! files. Preferred over the remote feed when configured and present on
//! disk; used for development and side-loaded installs.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::session::InstalledVersion;

use super::types::{
    verify_sha256, FeedError, FeedManifest, Release, ReleaseFeed, StagedRelease, MANIFEST_FILE,
};

/// Feed backend reading releases from a local directory.
pub struct LocalFeed {
    root: PathBuf,
}

impl LocalFeed {
    /// Create a feed rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    async fn load_manifest(&self) -> Result<FeedManifest, FeedError> {
        let path = self.root.join(MANIFEST_FILE);
        let raw = tokio::fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                FeedError::ApiError(format!("manifest not found at {}", path.display()))
            } else {
                FeedError::Io(e.to_string())
            }
        })?;

        serde_json::from_slice(&raw).map_err(|e| FeedError::MalformedManifest(e.to_string()))
    }
}

#[async_trait]
impl ReleaseFeed for LocalFeed {
    fn name(&self) -> &str {
        "local"
    }

    async fn releases_after(
        &self,
        installed: &InstalledVersion,
    ) -> Result<Vec<Release>, FeedError> {
        let manifest = self.load_manifest().await?;
        debug!(
            root = %self.root.display(),
            total = manifest.releases.len(),
            "Loaded local release manifest"
        );
        Ok(manifest.releases_after(installed))
    }

    async fn fetch_payload(
        &self,
        release: &Release,
        dest_dir: &Path,
    ) -> Result<StagedRelease, FeedError> {
        let file_name = release.payload_file_name()?;
        let src = self.root.join(&release.payload);
        let dest = dest_dir.join(&file_name);

        tokio::fs::create_dir_all(dest_dir)
            .await
            .map_err(|e| FeedError::Io(format!("cannot create staging directory: {e}")))?;
        tokio::fs::copy(&src, &dest).await.map_err(|e| {
            FeedError::Io(format!(
                "cannot stage payload {}: {e}",
                src.display()
            ))
        })?;

        verify_sha256(&dest, release).await?;

        debug!(version = %release.version, path = %dest.display(), "Payload staged from local feed");
        Ok(StagedRelease {
            release: release.clone(),
            path: dest,
        })
    }
}
