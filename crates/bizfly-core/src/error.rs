//! Stage-specific errors for the install pipeline

use std::path::PathBuf;

use thiserror::Error;

use crate::io::download::DownloadError;
use crate::io::extract::ExtractError;

/// Every failure the pipeline can end with. Each variant names one stage.
#[derive(Error, Debug)]
pub enum InstallError {
    /// No table entry matches the host.
    #[error("no artifact published for platform {platform}")]
    UnsupportedPlatform {
        /// Host description, e.g. `linux-riscv64`
        platform: String,
    },

    /// Transport or HTTP failure.
    #[error("{0}")]
    Fetch(DownloadError),

    /// Downloaded bytes do not match the recorded digest.
    #[error("checksum mismatch: expected {expected}, got {actual}")]
    Integrity {
        /// Digest from the table
        expected: String,
        /// Digest of the received bytes
        actual: String,
    },

    /// Malformed archive or missing executable.
    #[error("{0}")]
    Archive(#[from] ExtractError),

    /// Filesystem failure at the destination.
    #[error("failed to write {}: {source}", .path.display())]
    Install {
        /// Destination being written
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },
}

impl InstallError {
    /// Host OS/arch pair that is not in the enums at all.
    pub fn unsupported_host() -> Self {
        Self::UnsupportedPlatform {
            platform: format!("{}-{}", std::env::consts::OS, std::env::consts::ARCH),
        }
    }

    /// Name of the stage that failed.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::UnsupportedPlatform { .. } => "resolve",
            Self::Fetch(_) => "fetch",
            Self::Integrity { .. } => "verify",
            Self::Archive(_) => "extract",
            Self::Install { .. } => "install",
        }
    }
}

impl From<DownloadError> for InstallError {
    fn from(err: DownloadError) -> Self {
        match err {
            DownloadError::HashMismatch { expected, actual } => Self::Integrity { expected, actual },
            other => Self::Fetch(other),
        }
    }
}
