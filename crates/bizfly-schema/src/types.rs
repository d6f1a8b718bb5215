use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::arch::{Platform, PlatformMatch};
use crate::hash::{DigestError, Sha256Digest};

/// One downloadable archive and the platform key it is authored for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactEntry {
    /// Platform key selecting this entry
    pub target: PlatformMatch,
    /// Download URL
    pub url: String,
    /// Expected SHA256 of the archive bytes
    pub sha256: Sha256Digest,
}

impl ArtifactEntry {
    /// Archive file name (last URL path segment).
    pub fn filename(&self) -> &str {
        crate::filename_from_url(&self.url)
    }
}

/// Errors raised when building an [`ArtifactTable`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// No entries were supplied.
    #[error("Artifact table is empty")]
    Empty,

    /// Two entries could match the same platform.
    #[error("Artifact table entries overlap: {first} and {second}")]
    Overlap {
        /// Earlier key
        first: PlatformMatch,
        /// Later key
        second: PlatformMatch,
    },

    /// A row carries a malformed checksum.
    #[error("Invalid checksum for {target}: {source}")]
    Digest {
        /// Key of the offending row
        target: PlatformMatch,
        /// Parse failure
        #[source]
        source: DigestError,
    },
}

/// Ordered, non-overlapping sequence of [`ArtifactEntry`].
///
/// Only constructible through [`ArtifactTable::new`], so at most one entry
/// can ever match a given [`Platform`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ArtifactTable {
    entries: Vec<ArtifactEntry>,
}

impl ArtifactTable {
    /// Validate and wrap `entries`.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Empty`] for an empty list and
    /// [`TableError::Overlap`] when two keys select a common platform.
    pub fn new(entries: Vec<ArtifactEntry>) -> Result<Self, TableError> {
        if entries.is_empty() {
            return Err(TableError::Empty);
        }

        for (i, a) in entries.iter().enumerate() {
            if let Some(b) = entries[i + 1..].iter().find(|b| a.target.overlaps(&b.target)) {
                return Err(TableError::Overlap {
                    first: a.target,
                    second: b.target,
                });
            }
        }

        Ok(Self { entries })
    }

    /// First entry whose key matches `platform`.
    pub fn resolve(&self, platform: &Platform) -> Option<&ArtifactEntry> {
        self.entries.iter().find(|e| e.target.matches(platform))
    }

    /// All entries, in authoring order.
    pub fn entries(&self) -> &[ArtifactEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`; tables are never empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'de> Deserialize<'de> for ArtifactTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let entries = Vec::<ArtifactEntry>::deserialize(deserializer)?;
        Self::new(entries).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arch::{Arch, Os};

    fn entry(target: PlatformMatch, name: &str) -> ArtifactEntry {
        ArtifactEntry {
            target,
            url: format!("https://example.com/{name}.tar.gz"),
            sha256: Sha256Digest::compute(name.as_bytes()),
        }
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(ArtifactTable::new(vec![]), Err(TableError::Empty));
    }

    #[test]
    fn rejects_overlapping_keys() {
        let err = ArtifactTable::new(vec![
            entry(
                PlatformMatch::Exact {
                    os: Os::Macos,
                    arch: Arch::Arm64,
                },
                "a",
            ),
            entry(PlatformMatch::AnyArch { os: Os::Macos }, "b"),
        ])
        .unwrap_err();
        assert!(matches!(err, TableError::Overlap { .. }));
    }

    #[test]
    fn resolves_exact_entry() {
        let table = ArtifactTable::new(vec![
            entry(PlatformMatch::AnyArch { os: Os::Macos }, "mac"),
            entry(
                PlatformMatch::Exact {
                    os: Os::Linux,
                    arch: Arch::X86_64,
                },
                "linux-x86",
            ),
        ])
        .unwrap();

        let hit = table
            .resolve(&Platform::new(Os::Linux, Arch::X86_64))
            .unwrap();
        assert_eq!(hit.filename(), "linux-x86.tar.gz");
        assert!(table.resolve(&Platform::new(Os::Linux, Arch::Arm64)).is_none());
    }

    #[test]
    fn deserialize_checks_overlap() {
        let json = r#"[
            {"target": {"kind": "any_arch", "os": "linux"},
             "url": "https://example.com/a.tar.gz",
             "sha256": "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"},
            {"target": {"kind": "exact", "os": "linux", "arch": "arm64"},
             "url": "https://example.com/b.tar.gz",
             "sha256": "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"}
        ]"#;
        assert!(serde_json::from_str::<ArtifactTable>(json).is_err());
    }
}
