//! Mock applier for testing.

use std::sync::Arc;

use async_trait::async_trait;
use semver::Version;
use tokio::sync::RwLock;

use crate::applier::{Applier, ApplyError};
use crate::feed::StagedRelease;

/// Mock implementation of the `Applier` trait.
///
/// Records applied versions and fails on demand for specific versions.
pub struct MockApplier {
    applied: Arc<RwLock<Vec<Version>>>,
    failing: Arc<RwLock<Vec<Version>>>,
}

impl Default for MockApplier {
    fn default() -> Self {
        Self::new()
    }
}

impl MockApplier {
    /// Create a new mock applier that succeeds for every release.
    pub fn new() -> Self {
        Self {
            applied: Arc::new(RwLock::new(Vec::new())),
            failing: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Make applying `version` fail.
    pub async fn fail_version(&self, version: Version) {
        self.failing.write().await.push(version);
    }

    /// Versions applied so far, in apply order.
    pub async fn applied(&self) -> Vec<Version> {
        self.applied.read().await.clone()
    }
}

#[async_trait]
impl Applier for MockApplier {
    fn name(&self) -> &str {
        "mock"
    }

    async fn apply(&self, staged: &StagedRelease) -> Result<(), ApplyError> {
        let version = staged.release.version.clone();

        if self.failing.read().await.contains(&version) {
            return Err(ApplyError::InstallFailed {
                version,
                reason: "simulated apply failure".to_string(),
            });
        }

        self.applied.write().await.push(version);
        Ok(())
    }
}
