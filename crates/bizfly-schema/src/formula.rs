//! Baked-in release record for `bizflyctl`.
//!
//! A new upstream release means a new [`Formula`] constant with new URLs and
//! checksums; existing rows are never edited in place.

use crate::arch::{Arch, Os, PlatformMatch};
use crate::hash::Sha256Digest;
use crate::types::{ArtifactEntry, ArtifactTable, TableError};

/// One literal table row.
#[derive(Debug, Clone, Copy)]
pub struct ArtifactRow {
    /// Platform key
    pub target: PlatformMatch,
    /// Download URL
    pub url: &'static str,
    /// Expected SHA256 (lowercase hex)
    pub sha256: &'static str,
}

/// Static metadata and artifact rows for one released version.
#[derive(Debug, Clone, Copy)]
pub struct Formula {
    /// Package name
    pub name: &'static str,
    /// One-line description
    pub desc: &'static str,
    /// Project homepage
    pub homepage: &'static str,
    /// Released version
    pub version: &'static str,
    /// Name of the executable inside each archive
    pub binary: &'static str,
    /// Artifact rows, one per supported platform key
    pub artifacts: &'static [ArtifactRow],
}

impl Formula {
    /// Validate the rows into an [`ArtifactTable`].
    ///
    /// # Errors
    ///
    /// Returns [`TableError`] if a checksum is malformed or two rows overlap.
    pub fn artifact_table(&self) -> Result<ArtifactTable, TableError> {
        let entries = self
            .artifacts
            .iter()
            .map(|row| -> Result<ArtifactEntry, TableError> {
                Ok(ArtifactEntry {
                    target: row.target,
                    url: row.url.to_string(),
                    sha256: Sha256Digest::new(row.sha256).map_err(|source| {
                        TableError::Digest {
                            target: row.target,
                            source,
                        }
                    })?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        ArtifactTable::new(entries)
    }
}

/// bizflyctl v0.2.6
pub const BIZFLYCTL: Formula = Formula {
    name: "bizflyctl",
    desc: "Command Line for Bizfly Cloud.",
    homepage: "https://github.com/bizflycloud/bizflyctl",
    version: "0.2.6",
    binary: "bizfly",
    artifacts: &[
        ArtifactRow {
            target: PlatformMatch::AnyArch { os: Os::Macos },
            url: "https://github.com/bizflycloud/bizflyctl/releases/download/v0.2.6/bizflyctl_Darwin_all.tar.gz",
            sha256: "52546ffa3c257471a4d332afe67380450dbc5755296eef1bf255ac04b8689370",
        },
        ArtifactRow {
            target: PlatformMatch::Exact {
                os: Os::Linux,
                arch: Arch::Armv6,
            },
            url: "https://github.com/bizflycloud/bizflyctl/releases/download/v0.2.6/bizflyctl_Linux_armv6.tar.gz",
            sha256: "972acb2c3b9a2fa5ea9ec2f32b525d69089dc801797e13902eb5b945e3710921",
        },
        ArtifactRow {
            target: PlatformMatch::Exact {
                os: Os::Linux,
                arch: Arch::X86_64,
            },
            url: "https://github.com/bizflycloud/bizflyctl/releases/download/v0.2.6/bizflyctl_Linux_x86_64.tar.gz",
            sha256: "7388a38d9b5fee810a3c27ae0038c2753dbcbb3d8a7c2d56a937d6c815e3f64e",
        },
        ArtifactRow {
            target: PlatformMatch::Exact {
                os: Os::Linux,
                arch: Arch::Arm64,
            },
            url: "https://github.com/bizflycloud/bizflyctl/releases/download/v0.2.6/bizflyctl_Linux_arm64.tar.gz",
            sha256: "4d9704517a5e08f6f9595dc1b649f1e6b5a776774d64a1c48661a0e58e5c8c45",
        },
    ],
};
