//! Download and verification module.
//!
//! Streams the response body to disk while hashing it, so the digest always
//! covers exactly the bytes that were written.

use std::path::Path;
use std::time::Duration;

use bizfly_schema::Sha256Digest;
use futures::StreamExt;
use reqwest::{Client, StatusCode};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::Reporter;

/// Connect timeout applied to every client built by [`http_client`].
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default whole-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Fetch failures.
#[derive(Error, Debug)]
pub enum DownloadError {
    /// Transport-level failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-2xx status
    #[error("HTTP {status} for {url}")]
    Status {
        /// Response status
        status: StatusCode,
        /// Requested URL
        url: String,
    },

    /// Local I/O failure while staging the body
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Received bytes do not hash to the expected digest
    #[error("Hash mismatch: expected {expected}, got {actual}")]
    HashMismatch {
        /// Expected digest
        expected: String,
        /// Actual digest
        actual: String,
    },
}

/// Build the HTTP client used for artifact downloads.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialised.
pub fn http_client(timeout: Duration) -> Result<Client, DownloadError> {
    Ok(Client::builder()
        .user_agent(crate::USER_AGENT)
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(timeout)
        .build()?)
}

/// Downloads `url` into `dest` and verifies it against `expected`.
///
/// On mismatch `dest` is removed before returning. Returns the digest and
/// the number of bytes written.
///
/// # Errors
///
/// [`DownloadError::Status`] for non-2xx responses, [`DownloadError::Http`]
/// for transport failures, [`DownloadError::HashMismatch`] when the bytes do
/// not match.
pub async fn download_and_verify<R: Reporter + ?Sized>(
    client: &Client,
    url: &str,
    dest: &Path,
    expected: &Sha256Digest,
    reporter: &R,
) -> Result<(Sha256Digest, u64), DownloadError> {
    debug!(%url, dest = %dest.display(), "fetching artifact");

    let response = client.get(url).send().await?;
    if !response.status().is_success() {
        return Err(DownloadError::Status {
            status: response.status(),
            url: url.to_string(),
        });
    }

    let total_size = response.content_length();
    reporter.downloading(0, total_size);

    let mut file = File::create(dest).await?;
    let mut stream = response.bytes_stream();
    let mut hasher = Sha256::new();
    let mut downloaded: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        hasher.update(&chunk);
        downloaded += chunk.len() as u64;
        reporter.downloading(downloaded, total_size);
    }

    file.flush().await?;
    drop(file);

    let actual = Sha256Digest::from_hasher(hasher);
    debug!(bytes = downloaded, sha256 = %actual, "download complete");

    if &actual != expected {
        tokio::fs::remove_file(dest).await.ok();
        return Err(DownloadError::HashMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        });
    }

    Ok((actual, downloaded))
}

/// Compute SHA256 hash of a file (streaming)
///
/// # Errors
///
/// Returns an I/O error if the file cannot be read.
pub fn hash_file(path: &Path) -> std::io::Result<Sha256Digest> {
    use std::io::Read;

    let mut file = std::fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 65536];

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(Sha256Digest::from_hasher(hasher))
}
