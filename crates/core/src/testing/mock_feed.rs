//! Mock release feed for testing.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use semver::Version;
use tokio::sync::RwLock;

use crate::feed::{FeedError, FeedManifest, Release, ReleaseFeed, StagedRelease};
use crate::session::InstalledVersion;

/// Mock implementation of the `ReleaseFeed` trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable releases
/// - Count queries and payload fetches for assertions
/// - Inject query errors and per-version download failures
/// - Simulate slow queries
pub struct MockFeed {
    releases: Arc<RwLock<Vec<Release>>>,
    query_count: Arc<AtomicUsize>,
    fetch_count: Arc<AtomicUsize>,
    next_query_error: Arc<RwLock<Option<FeedError>>>,
    failing_payloads: Arc<RwLock<Vec<Version>>>,
    query_delay: Arc<RwLock<Option<Duration>>>,
}

impl Default for MockFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFeed {
    /// Create a new mock feed with no releases.
    pub fn new() -> Self {
        Self {
            releases: Arc::new(RwLock::new(Vec::new())),
            query_count: Arc::new(AtomicUsize::new(0)),
            fetch_count: Arc::new(AtomicUsize::new(0)),
            next_query_error: Arc::new(RwLock::new(None)),
            failing_payloads: Arc::new(RwLock::new(Vec::new())),
            query_delay: Arc::new(RwLock::new(None)),
        }
    }

    /// Set the releases the feed lists.
    pub async fn set_releases(&self, releases: Vec<Release>) {
        *self.releases.write().await = releases;
    }

    /// Configure the next query to fail with the given error.
    pub async fn set_next_query_error(&self, error: FeedError) {
        *self.next_query_error.write().await = Some(error);
    }

    /// Make fetching the payload for `version` fail.
    pub async fn fail_payload(&self, version: Version) {
        self.failing_payloads.write().await.push(version);
    }

    /// Clear all payload failure injections.
    pub async fn clear_failing_payloads(&self) {
        self.failing_payloads.write().await.clear();
    }

    /// Delay each query by `delay` (for re-entrancy tests).
    pub async fn set_query_delay(&self, delay: Duration) {
        *self.query_delay.write().await = Some(delay);
    }

    /// Number of manifest queries performed.
    pub fn query_count(&self) -> usize {
        self.query_count.load(Ordering::SeqCst)
    }

    /// Number of payload fetches attempted.
    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReleaseFeed for MockFeed {
    fn name(&self) -> &str {
        "mock"
    }

    async fn releases_after(
        &self,
        installed: &InstalledVersion,
    ) -> Result<Vec<Release>, FeedError> {
        self.query_count.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = *self.query_delay.read().await {
            tokio::time::sleep(delay).await;
        }

        if let Some(error) = self.next_query_error.write().await.take() {
            return Err(error);
        }

        let releases = self.releases.read().await.clone();
        Ok(FeedManifest { releases }.releases_after(installed))
    }

    async fn fetch_payload(
        &self,
        release: &Release,
        dest_dir: &Path,
    ) -> Result<StagedRelease, FeedError> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);

        if self.failing_payloads.read().await.contains(&release.version) {
            return Err(FeedError::Io(format!(
                "simulated download failure for {}",
                release.version
            )));
        }

        // Nothing is written to disk; the staged path is synthetic.
        Ok(StagedRelease {
            release: release.clone(),
            path: dest_dir.join(format!("{}.payload", release.version)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[tokio::test]
    async fn test_counts_queries_and_fetches() {
        let feed = MockFeed::new();
        feed.set_releases(vec![fixtures::release("1.0.0")]).await;

        let releases = feed
            .releases_after(&InstalledVersion::dev())
            .await
            .unwrap();
        assert_eq!(releases.len(), 1);
        assert_eq!(feed.query_count(), 1);

        feed.fetch_payload(&releases[0], Path::new("/tmp"))
            .await
            .unwrap();
        assert_eq!(feed.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_query_error_is_consumed() {
        let feed = MockFeed::new();
        feed.set_next_query_error(FeedError::Timeout).await;

        assert!(feed.releases_after(&InstalledVersion::dev()).await.is_err());
        assert!(feed.releases_after(&InstalledVersion::dev()).await.is_ok());
    }

    #[tokio::test]
    async fn test_payload_failure_injection() {
        let feed = MockFeed::new();
        let release = fixtures::release("1.2.0");
        feed.fail_payload(release.version.clone()).await;

        let err = feed
            .fetch_payload(&release, Path::new("/tmp"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("1.2.0"));

        feed.clear_failing_payloads().await;
        assert!(feed.fetch_payload(&release, Path::new("/tmp")).await.is_ok());
    }

    #[test]
    fn test_filters_against_installed_version() {
        let feed = MockFeed::new();
        tokio_test::block_on(async {
            feed.set_releases(vec![
                fixtures::release("1.0.0"),
                fixtures::release("2.0.0"),
            ])
            .await;

            let releases = feed
                .releases_after(&fixtures::installed("1.0.0"))
                .await
                .unwrap();
            assert_eq!(releases.len(), 1);
            assert_eq!(releases[0].version, Version::new(2, 0, 0));
        });
    }
}
