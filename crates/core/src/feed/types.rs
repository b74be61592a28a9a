//! Types for the release feed system.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use semver::Version;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::session::InstalledVersion;

/// Name of the manifest document a feed serves.
pub const MANIFEST_FILE: &str = "releases.json";

/// Errors that can occur during feed operations.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Feed connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Feed error: {0}")]
    ApiError(String),

    #[error("Malformed release manifest: {0}")]
    MalformedManifest(String),

    #[error("Payload verification failed for {version}: {reason}")]
    Verification { version: Version, reason: String },

    #[error("Request timeout")]
    Timeout,

    #[error("I/O error: {0}")]
    Io(String),
}

/// One installable release as listed by a feed. Never mutated once
/// produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    /// Version this release installs.
    pub version: Version,
    /// Payload location: a file name relative to the feed root, or an
    /// absolute URL.
    pub payload: String,
    /// Whether this payload is a delta against the previous release.
    #[serde(default)]
    pub is_delta: bool,
    /// Hex SHA-256 of the payload, verified after download when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
    /// Payload size in bytes, if the feed knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
}

impl Release {
    /// File name the payload is staged under.
    pub fn payload_file_name(&self) -> Result<String, FeedError> {
        Path::new(&self.payload)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                FeedError::MalformedManifest(format!(
                    "release {} has no payload file name",
                    self.version
                ))
            })
    }
}

/// The feed manifest document (`releases.json`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedManifest {
    pub releases: Vec<Release>,
}

impl FeedManifest {
    /// Releases strictly newer than `installed`. A development run has no
    /// installed version, so every release applies.
    pub fn releases_after(&self, installed: &InstalledVersion) -> Vec<Release> {
        self.releases
            .iter()
            .filter(|r| match installed.version() {
                Some(v) => r.version > *v,
                None => true,
            })
            .cloned()
            .collect()
    }
}

/// A release whose payload has been downloaded to local staging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedRelease {
    pub release: Release,
    /// Where the payload was staged.
    pub path: PathBuf,
}

/// A source of releases: a directory or a remote endpoint serving a
/// manifest plus payload files.
#[async_trait]
pub trait ReleaseFeed: Send + Sync {
    /// Feed name for logging.
    fn name(&self) -> &str;

    /// Releases strictly newer than the installed version, in feed order.
    async fn releases_after(
        &self,
        installed: &InstalledVersion,
    ) -> Result<Vec<Release>, FeedError>;

    /// Download one release payload into `dest_dir`, verifying its checksum
    /// when the manifest provides one.
    async fn fetch_payload(
        &self,
        release: &Release,
        dest_dir: &Path,
    ) -> Result<StagedRelease, FeedError>;
}

/// Verify a staged payload against the manifest's SHA-256, when present.
pub(crate) async fn verify_sha256(path: &Path, release: &Release) -> Result<(), FeedError> {
    let Some(expected) = &release.sha256 else {
        return Ok(());
    };

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| FeedError::Io(format!("cannot read staged payload: {e}")))?;
    let digest = format!("{:x}", Sha256::digest(&bytes));

    if !digest.eq_ignore_ascii_case(expected) {
        return Err(FeedError::Verification {
            version: release.version.clone(),
            reason: format!("sha256 mismatch: expected {expected}, got {digest}"),
        });
    }

    Ok(())
}
