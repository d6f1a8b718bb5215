//! Artifact installation.
//!
//! [`install`] runs resolve, fetch, verify, extract and install strictly in
//! that order, each stage awaited before the next starts. Nothing touches the
//! destination directory until the archive has been verified and the
//! executable found inside it.

use std::path::{Path, PathBuf};

use bizfly_schema::{ArtifactEntry, ArtifactTable, Platform, Sha256Digest};
use reqwest::Client;
use tracing::{debug, info};

use crate::io::{download, extract, install::install_executable};
use crate::{InstallError, Reporter};

/// Inputs for one installation.
pub struct InstallRequest<'a, R: Reporter + ?Sized> {
    /// Platform to install for
    pub platform: Platform,
    /// Table to resolve against
    pub table: &'a ArtifactTable,
    /// Directory receiving the executable
    pub dest_dir: &'a Path,
    /// Executable name inside the archive (and on disk)
    pub binary: &'a str,
    /// HTTP client
    pub client: &'a Client,
    /// Progress sink
    pub reporter: &'a R,
}

impl<R: Reporter + ?Sized> std::fmt::Debug for InstallRequest<'_, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstallRequest")
            .field("platform", &self.platform)
            .field("dest_dir", &self.dest_dir)
            .field("binary", &self.binary)
            .finish_non_exhaustive()
    }
}

impl<'a, R: Reporter + ?Sized> InstallRequest<'a, R> {
    /// Build a request.
    pub fn new(
        platform: Platform,
        table: &'a ArtifactTable,
        dest_dir: &'a Path,
        binary: &'a str,
        client: &'a Client,
        reporter: &'a R,
    ) -> Self {
        Self {
            platform,
            table,
            dest_dir,
            binary,
            client,
            reporter,
        }
    }

    /// Run the installation.
    ///
    /// # Errors
    ///
    /// See [`install`].
    pub async fn execute(self) -> Result<InstalledBinary, InstallError> {
        install(&self).await
    }
}

/// Result of a successful installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledBinary {
    /// Final path of the executable
    pub path: PathBuf,
    /// Verified digest of the downloaded archive
    pub archive_sha256: Sha256Digest,
    /// Size of the executable in bytes
    pub size: u64,
}

/// Select the table entry for `platform`.
///
/// # Errors
///
/// [`InstallError::UnsupportedPlatform`] when no entry matches.
pub fn resolve<'t>(
    table: &'t ArtifactTable,
    platform: &Platform,
) -> Result<&'t ArtifactEntry, InstallError> {
    table
        .resolve(platform)
        .ok_or_else(|| InstallError::UnsupportedPlatform {
            platform: platform.to_string(),
        })
}

/// Resolve, fetch, verify, extract and install the executable.
///
/// Nothing is retried. On failure the destination directory is unchanged
/// and the reporter receives the failing stage.
///
/// # Errors
///
/// One [`InstallError`] variant per stage.
pub async fn install<R: Reporter + ?Sized>(
    req: &InstallRequest<'_, R>,
) -> Result<InstalledBinary, InstallError> {
    let result = run(req).await;
    if let Err(e) = &result {
        req.reporter.failed(e.stage(), &e.to_string());
    }
    result
}

async fn run<R: Reporter + ?Sized>(
    req: &InstallRequest<'_, R>,
) -> Result<InstalledBinary, InstallError> {
    let reporter = req.reporter;

    let entry = resolve(req.table, &req.platform)?;
    info!(platform = %req.platform, url = %entry.url, "resolved artifact");
    reporter.resolved(&req.platform, entry);

    // Staging lives outside dest_dir so a failed verify leaves it untouched.
    let staging = tempfile::Builder::new()
        .prefix("bizfly-")
        .tempdir()
        .map_err(download::DownloadError::Io)?;
    let archive_path = staging.path().join(staging_name(entry));

    let (digest, archive_size) = download::download_and_verify(
        req.client,
        &entry.url,
        &archive_path,
        &entry.sha256,
        reporter,
    )
    .await?;
    debug!(bytes = archive_size, "archive verified");
    reporter.verified(&digest);

    reporter.extracting(entry.filename());
    let binary = extract::extract_binary(&archive_path, req.binary)?;
    if !binary.is_executable() {
        reporter.warning(&format!(
            "'{}' is not marked executable in the archive; setting 0755",
            binary.relative_path.display()
        ));
    }

    let target = req.dest_dir.join(req.binary);
    reporter.installing(&target);
    let path = install_executable(&binary.contents, req.dest_dir, req.binary).map_err(|source| {
        InstallError::Install {
            path: target,
            source,
        }
    })?;

    let size = binary.contents.len() as u64;
    info!(path = %path.display(), bytes = size, "installed");
    reporter.done(&path, size);

    Ok(InstalledBinary {
        path,
        archive_sha256: digest,
        size,
    })
}

fn staging_name(entry: &ArtifactEntry) -> &str {
    match entry.filename() {
        "" => "artifact.tar.gz",
        name => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NullReporter;
    use crate::io::download::{DEFAULT_TIMEOUT, http_client};
    use crate::io::extract::ExtractError;
    use bizfly_schema::{Arch, Os, PlatformMatch};
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use mockito::Server;

    const BINARY: &[u8] = b"\x7fELF bizfly 0.2.6";

    fn tar_gz(files: &[(&str, &[u8])]) -> Vec<u8> {
        let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
        for (path, data) in files {
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o755);
            header.set_cksum();
            builder.append_data(&mut header, path, *data).unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap()
    }

    fn table_for(base: &str, archive: &[u8]) -> ArtifactTable {
        ArtifactTable::new(vec![
            ArtifactEntry {
                target: PlatformMatch::AnyArch { os: Os::Macos },
                url: format!("{base}/bizflyctl_Darwin_all.tar.gz"),
                sha256: Sha256Digest::compute(archive),
            },
            ArtifactEntry {
                target: PlatformMatch::Exact {
                    os: Os::Linux,
                    arch: Arch::X86_64,
                },
                url: format!("{base}/bizflyctl_Linux_x86_64.tar.gz"),
                sha256: Sha256Digest::compute(archive),
            },
        ])
        .unwrap()
    }

    fn linux_x86() -> Platform {
        Platform::new(Os::Linux, Arch::X86_64)
    }

    #[tokio::test]
    async fn installs_verified_binary() {
        let archive = tar_gz(&[("README.md", b"docs"), ("bizfly", BINARY)]);
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/bizflyctl_Linux_x86_64.tar.gz")
            .with_status(200)
            .with_body(&archive)
            .expect(1)
            .create_async()
            .await;

        let table = table_for(&server.url(), &archive);
        let dest = tempfile::tempdir().unwrap();
        let client = http_client(DEFAULT_TIMEOUT).unwrap();

        let installed = InstallRequest::new(
            linux_x86(),
            &table,
            dest.path(),
            "bizfly",
            &client,
            &NullReporter,
        )
        .execute()
        .await
        .unwrap();

        m.assert_async().await;
        assert_eq!(installed.path, dest.path().join("bizfly"));
        assert_eq!(installed.archive_sha256, Sha256Digest::compute(&archive));
        assert_eq!(installed.size, BINARY.len() as u64);
        assert_eq!(std::fs::read(&installed.path).unwrap(), BINARY);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&installed.path)
                .unwrap()
                .permissions()
                .mode();
            assert_ne!(mode & 0o111, 0);
        }
    }

    #[tokio::test]
    async fn macos_uses_universal_archive_for_any_arch() {
        let archive = tar_gz(&[("bizfly", BINARY)]);
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/bizflyctl_Darwin_all.tar.gz")
            .with_status(200)
            .with_body(&archive)
            .expect(1)
            .create_async()
            .await;

        let table = table_for(&server.url(), &archive);
        let dest = tempfile::tempdir().unwrap();
        let client = http_client(DEFAULT_TIMEOUT).unwrap();
        let req = InstallRequest::new(
            Platform::new(Os::Macos, Arch::Arm64),
            &table,
            dest.path(),
            "bizfly",
            &client,
            &NullReporter,
        );

        install(&req).await.unwrap();
        m.assert_async().await;
    }

    #[tokio::test]
    async fn unsupported_platform_makes_no_request() {
        let archive = tar_gz(&[("bizfly", BINARY)]);
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", mockito::Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let table = table_for(&server.url(), &archive);
        let dest = tempfile::tempdir().unwrap();
        let client = http_client(DEFAULT_TIMEOUT).unwrap();
        let req = InstallRequest::new(
            Platform::new(Os::Linux, Arch::Armv6),
            &table,
            dest.path(),
            "bizfly",
            &client,
            &NullReporter,
        );

        let err = install(&req).await.unwrap_err();
        assert!(matches!(err, InstallError::UnsupportedPlatform { ref platform } if platform == "linux-armv6"));
        assert_eq!(err.stage(), "resolve");
        m.assert_async().await;
        assert_eq!(std::fs::read_dir(dest.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn flipped_byte_fails_integrity_and_writes_nothing() {
        let archive = tar_gz(&[("bizfly", BINARY)]);
        let mut corrupted = archive.clone();
        let mid = corrupted.len() / 2;
        corrupted[mid] ^= 0x01;

        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/bizflyctl_Linux_x86_64.tar.gz")
            .with_status(200)
            .with_body(&corrupted)
            .create_async()
            .await;

        let table = table_for(&server.url(), &archive);
        let dest = tempfile::tempdir().unwrap();
        std::fs::write(dest.path().join("bizfly"), b"previous").unwrap();
        let client = http_client(DEFAULT_TIMEOUT).unwrap();
        let req = InstallRequest::new(
            linux_x86(),
            &table,
            dest.path(),
            "bizfly",
            &client,
            &NullReporter,
        );

        let err = install(&req).await.unwrap_err();
        assert!(matches!(err, InstallError::Integrity { .. }));
        assert_eq!(err.stage(), "verify");
        assert_eq!(std::fs::read_dir(dest.path()).unwrap().count(), 1);
        assert_eq!(std::fs::read(dest.path().join("bizfly")).unwrap(), b"previous");
    }

    #[tokio::test]
    async fn http_error_is_fetch_failure() {
        let archive = tar_gz(&[("bizfly", BINARY)]);
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/bizflyctl_Linux_x86_64.tar.gz")
            .with_status(503)
            .create_async()
            .await;

        let table = table_for(&server.url(), &archive);
        let dest = tempfile::tempdir().unwrap();
        let client = http_client(DEFAULT_TIMEOUT).unwrap();
        let req = InstallRequest::new(
            linux_x86(),
            &table,
            dest.path(),
            "bizfly",
            &client,
            &NullReporter,
        );

        let err = install(&req).await.unwrap_err();
        assert!(matches!(err, InstallError::Fetch(_)));
        assert_eq!(err.stage(), "fetch");
        assert_eq!(std::fs::read_dir(dest.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn archive_without_binary_is_archive_error() {
        let archive = tar_gz(&[("README.md", b"no binary here")]);
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/bizflyctl_Linux_x86_64.tar.gz")
            .with_status(200)
            .with_body(&archive)
            .create_async()
            .await;

        let table = table_for(&server.url(), &archive);
        let dest = tempfile::tempdir().unwrap();
        let client = http_client(DEFAULT_TIMEOUT).unwrap();
        let req = InstallRequest::new(
            linux_x86(),
            &table,
            dest.path(),
            "bizfly",
            &client,
            &NullReporter,
        );

        let err = install(&req).await.unwrap_err();
        assert!(matches!(
            err,
            InstallError::Archive(ExtractError::MissingEntry(_))
        ));
        assert_eq!(err.stage(), "extract");
        assert_eq!(std::fs::read_dir(dest.path()).unwrap().count(), 0);
    }

    #[test]
    fn resolve_reports_platform() {
        let table = table_for("https://example.com", b"x");
        let err = resolve(&table, &Platform::new(Os::Linux, Arch::Arm64)).unwrap_err();
        assert_eq!(err.to_string(), "no artifact published for platform linux-arm64");
    }
}
