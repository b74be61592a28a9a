//! Error types for the applier module.

use semver::Version;
use thiserror::Error;

/// Errors that can occur while applying staged releases.
#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("Payload missing from staging: {0}")]
    MissingPayload(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Install failed for {version}: {reason}")]
    InstallFailed { version: Version, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApplyError::MissingPayload("/tmp/app.tar.gz".to_string());
        assert_eq!(
            err.to_string(),
            "Payload missing from staging: /tmp/app.tar.gz"
        );

        let err = ApplyError::InstallFailed {
            version: Version::new(2, 0, 0),
            reason: "disk full".to_string(),
        };
        assert_eq!(err.to_string(), "Install failed for 2.0.0: disk full");
    }
}
