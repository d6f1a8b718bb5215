//! Archive extraction module
//!
//! Release archives are tar.gz. Only one file is wanted from each: the
//! executable, located by its file name anywhere in the tree.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Component, Path, PathBuf};

use flate2::read::GzDecoder;
use thiserror::Error;
use tracing::debug;

/// Extraction failures.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The archive file could not be opened
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// gzip or tar stream is malformed
    #[error("Corrupt archive: {0}")]
    Corrupt(String),

    /// The named executable is not in the archive
    #[error("'{0}' not found in archive")]
    MissingEntry(String),

    /// The named executable appears more than once
    #[error("'{name}' found more than once in archive: {first} and {second}")]
    AmbiguousEntry {
        /// Executable name
        name: String,
        /// First occurrence
        first: String,
        /// Second occurrence
        second: String,
    },

    /// An entry path escapes the archive root
    #[error("Invalid path in archive: {0}")]
    UnsafePath(String),
}

/// The executable pulled out of an archive.
#[derive(Debug, Clone)]
pub struct ExtractedBinary {
    /// Path relative to the archive root
    pub relative_path: PathBuf,
    /// File contents
    pub contents: Vec<u8>,
    /// Unix mode recorded in the archive header
    pub mode: Option<u32>,
}

impl ExtractedBinary {
    /// Whether the archive header marks the file executable
    pub fn is_executable(&self) -> bool {
        self.mode.is_some_and(|m| m & 0o111 != 0)
    }
}

/// Extract the executable `name` from a tar.gz archive on disk.
///
/// # Errors
///
/// See [`find_in_tar_gz`]; additionally [`ExtractError::Io`] if the file
/// cannot be opened.
pub fn extract_binary(archive_path: &Path, name: &str) -> Result<ExtractedBinary, ExtractError> {
    let file = File::open(archive_path)?;
    find_in_tar_gz(BufReader::new(file), name)
}

/// Find the single regular file called `name` in a tar.gz stream.
///
/// # Errors
///
/// [`ExtractError::Corrupt`] for undecodable input,
/// [`ExtractError::UnsafePath`] for entries escaping the root,
/// [`ExtractError::MissingEntry`] / [`ExtractError::AmbiguousEntry`] when
/// `name` does not occur exactly once.
pub fn find_in_tar_gz<R: Read>(reader: R, name: &str) -> Result<ExtractedBinary, ExtractError> {
    let corrupt = |e: io::Error| ExtractError::Corrupt(e.to_string());

    let mut archive = tar::Archive::new(GzDecoder::new(reader));
    let mut found: Option<ExtractedBinary> = None;

    for entry in archive.entries().map_err(corrupt)? {
        let mut entry = entry.map_err(corrupt)?;
        let relative_path: PathBuf = entry.path().map_err(corrupt)?.into_owned();

        if relative_path
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)))
        {
            return Err(ExtractError::UnsafePath(relative_path.display().to_string()));
        }

        if !entry.header().entry_type().is_file() {
            continue;
        }

        if relative_path.file_name().and_then(|s| s.to_str()) != Some(name) {
            continue;
        }

        if let Some(first) = &found {
            return Err(ExtractError::AmbiguousEntry {
                name: name.to_string(),
                first: first.relative_path.display().to_string(),
                second: relative_path.display().to_string(),
            });
        }

        let mode = entry.header().mode().ok();
        let mut contents = Vec::new();
        entry.read_to_end(&mut contents).map_err(corrupt)?;

        debug!(path = %relative_path.display(), bytes = contents.len(), "found executable");
        found = Some(ExtractedBinary {
            relative_path,
            contents,
            mode,
        });
    }

    found.ok_or_else(|| ExtractError::MissingEntry(name.to_string()))
}
