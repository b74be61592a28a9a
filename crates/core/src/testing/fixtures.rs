//! Shared fixtures for tests.

use semver::Version;

use crate::feed::Release;
use crate::session::InstalledVersion;

/// A full (non-delta) release with no checksum.
pub fn release(version: &str) -> Release {
    Release {
        version: Version::parse(version).expect("valid fixture version"),
        payload: format!("app-{version}.tar.gz"),
        is_delta: false,
        sha256: None,
        size_bytes: None,
    }
}

/// A delta release relative to the previous version.
pub fn delta_release(version: &str) -> Release {
    Release {
        is_delta: true,
        payload: format!("app-{version}-delta.tar.gz"),
        ..release(version)
    }
}

/// An installed version parsed from a string.
pub fn installed(version: &str) -> InstalledVersion {
    InstalledVersion::from(Version::parse(version).expect("valid fixture version"))
}
