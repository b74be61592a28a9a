//! HTTP feed backend.
//!
//! Fetches the release manifest and payloads from a remote endpoint.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::session::InstalledVersion;

use super::types::{
    verify_sha256, FeedError, FeedManifest, Release, ReleaseFeed, StagedRelease, MANIFEST_FILE,
};

/// Feed backend over a remote HTTP endpoint.
pub struct HttpFeed {
    client: Client,
    base_url: String,
}

impl HttpFeed {
    /// Create a feed for `base_url` with the given request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn manifest_url(&self) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), MANIFEST_FILE)
    }

    fn payload_url(&self, release: &Release) -> String {
        if release.payload.starts_with("http://") || release.payload.starts_with("https://") {
            release.payload.clone()
        } else {
            format!(
                "{}/{}",
                self.base_url.trim_end_matches('/'),
                urlencoding::encode(&release.payload)
            )
        }
    }

    fn map_request_error(e: reqwest::Error) -> FeedError {
        if e.is_timeout() {
            FeedError::Timeout
        } else if e.is_connect() {
            FeedError::ConnectionFailed(e.to_string())
        } else {
            FeedError::ApiError(e.to_string())
        }
    }

    async fn get_checked(&self, url: &str) -> Result<reqwest::Response, FeedError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(Self::map_request_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FeedError::ApiError(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        Ok(response)
    }
}

#[async_trait]
impl ReleaseFeed for HttpFeed {
    fn name(&self) -> &str {
        "http"
    }

    async fn releases_after(
        &self,
        installed: &InstalledVersion,
    ) -> Result<Vec<Release>, FeedError> {
        let url = self.manifest_url();
        debug!(url = %url, "Fetching release manifest");

        let manifest: FeedManifest = self
            .get_checked(&url)
            .await?
            .json()
            .await
            .map_err(|e| FeedError::MalformedManifest(e.to_string()))?;

        Ok(manifest.releases_after(installed))
    }

    async fn fetch_payload(
        &self,
        release: &Release,
        dest_dir: &Path,
    ) -> Result<StagedRelease, FeedError> {
        let file_name = release.payload_file_name()?;
        let url = self.payload_url(release);
        debug!(version = %release.version, url = %url, "Downloading release payload");

        let bytes = self
            .get_checked(&url)
            .await?
            .bytes()
            .await
            .map_err(|e| FeedError::Io(format!("payload download failed: {e}")))?;

        tokio::fs::create_dir_all(dest_dir)
            .await
            .map_err(|e| FeedError::Io(format!("cannot create staging directory: {e}")))?;
        let dest = dest_dir.join(&file_name);
        tokio::fs::write(&dest, &bytes)
            .await
            .map_err(|e| FeedError::Io(format!("cannot write staged payload: {e}")))?;

        verify_sha256(&dest, release).await?;

        debug!(version = %release.version, path = %dest.display(), "Payload staged from remote feed");
        Ok(StagedRelease {
            release: release.clone(),
            path: dest,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use semver::Version;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn release(version: &str, payload: &str) -> Release {
        Release {
            version: Version::parse(version).unwrap(),
            payload: payload.to_string(),
            is_delta: false,
            sha256: None,
            size_bytes: None,
        }
    }

    #[test]
    fn test_manifest_url_normalizes_trailing_slash() {
        let feed = HttpFeed::new("https://example.com/stable/", Duration::from_secs(5));
        assert_eq!(
            feed.manifest_url(),
            "https://example.com/stable/releases.json"
        );
    }

    #[test]
    fn test_payload_url_relative_and_absolute() {
        let feed = HttpFeed::new("https://example.com/stable", Duration::from_secs(5));

        let relative = release("1.0.0", "app 1.0.0.tar.gz");
        assert_eq!(
            feed.payload_url(&relative),
            "https://example.com/stable/app%201.0.0.tar.gz"
        );

        let absolute = release("1.0.0", "https://cdn.example.com/app.tar.gz");
        assert_eq!(
            feed.payload_url(&absolute),
            "https://cdn.example.com/app.tar.gz"
        );
    }

    #[tokio::test]
    async fn test_releases_after_parses_manifest() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/releases.json"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"releases":[
                    {"version":"1.1.0","payload":"a.tar.gz"},
                    {"version":"2.0.0","payload":"b.tar.gz"}
                ]}"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let feed = HttpFeed::new(server.uri(), Duration::from_secs(5));
        let releases = feed
            .releases_after(&InstalledVersion::from(Version::new(1, 1, 0)))
            .await
            .unwrap();

        assert_eq!(releases.len(), 1);
        assert_eq!(releases[0].version, Version::new(2, 0, 0));
    }

    #[tokio::test]
    async fn test_http_error_status_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/releases.json"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let feed = HttpFeed::new(server.uri(), Duration::from_secs(5));
        let err = feed
            .releases_after(&InstalledVersion::dev())
            .await
            .unwrap_err();
        assert!(matches!(err, FeedError::ApiError(_)));
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_manifest_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/releases.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let feed = HttpFeed::new(server.uri(), Duration::from_secs(5));
        let err = feed
            .releases_after(&InstalledVersion::dev())
            .await
            .unwrap_err();
        assert!(matches!(err, FeedError::MalformedManifest(_)));
    }

    #[tokio::test]
    async fn test_fetch_payload_downloads_and_stages() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/app.tar.gz"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"payload-bytes".to_vec()))
            .mount(&server)
            .await;

        let staging = tempfile::tempdir().unwrap();
        let feed = HttpFeed::new(server.uri(), Duration::from_secs(5));
        let staged = feed
            .fetch_payload(&release("1.0.0", "app.tar.gz"), staging.path())
            .await
            .unwrap();

        assert_eq!(std::fs::read(&staged.path).unwrap(), b"payload-bytes");
    }

    #[tokio::test]
    async fn test_fetch_payload_missing_is_error() {
        let server = MockServer::start().await;

        let staging = tempfile::tempdir().unwrap();
        let feed = HttpFeed::new(server.uri(), Duration::from_secs(5));
        let err = feed
            .fetch_payload(&release("1.0.0", "missing.tar.gz"), staging.path())
            .await
            .unwrap_err();
        assert!(matches!(err, FeedError::ApiError(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_maps_to_connection_failed() {
        // Nothing listens on this port.
        let feed = HttpFeed::new("http://127.0.0.1:1", Duration::from_secs(5));
        let err = feed
            .releases_after(&InstalledVersion::dev())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            FeedError::ConnectionFailed(_) | FeedError::ApiError(_)
        ));
    }
}
