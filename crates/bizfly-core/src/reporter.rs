//! Reporter trait for dependency injection
//!
//! Lets the install pipeline report progress without being coupled to a
//! specific terminal implementation.

use std::path::Path;

use bizfly_schema::{ArtifactEntry, Platform, Sha256Digest};

/// Receives stage-by-stage progress from the install pipeline.
pub trait Reporter: Send + Sync {
    /// A table entry was selected for `platform`.
    fn resolved(&self, platform: &Platform, entry: &ArtifactEntry);

    /// Updates the progress of the download.
    fn downloading(&self, current: u64, total: Option<u64>);

    /// The archive digest matched.
    fn verified(&self, digest: &Sha256Digest);

    /// Extraction of `archive` started.
    fn extracting(&self, archive: &str);

    /// The executable is being written to `dest`.
    fn installing(&self, dest: &Path);

    /// The executable is in place.
    fn done(&self, path: &Path, size: u64);

    /// The pipeline stopped at `stage`.
    fn failed(&self, stage: &str, reason: &str);

    /// Log a warning message.
    fn warning(&self, msg: &str);
}

impl<T: Reporter + ?Sized> Reporter for std::sync::Arc<T> {
    fn resolved(&self, platform: &Platform, entry: &ArtifactEntry) {
        (**self).resolved(platform, entry);
    }
    fn downloading(&self, current: u64, total: Option<u64>) {
        (**self).downloading(current, total);
    }
    fn verified(&self, digest: &Sha256Digest) {
        (**self).verified(digest);
    }
    fn extracting(&self, archive: &str) {
        (**self).extracting(archive);
    }
    fn installing(&self, dest: &Path) {
        (**self).installing(dest);
    }
    fn done(&self, path: &Path, size: u64) {
        (**self).done(path, size);
    }
    fn failed(&self, stage: &str, reason: &str) {
        (**self).failed(stage, reason);
    }
    fn warning(&self, msg: &str) {
        (**self).warning(msg);
    }
}

/// A no-op reporter for silent operations (e.g., testing).
#[derive(Debug, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn resolved(&self, _: &Platform, _: &ArtifactEntry) {}
    fn downloading(&self, _: u64, _: Option<u64>) {}
    fn verified(&self, _: &Sha256Digest) {}
    fn extracting(&self, _: &str) {}
    fn installing(&self, _: &Path) {}
    fn done(&self, _: &Path, _: u64) {}
    fn failed(&self, _: &str, _: &str) {}
    fn warning(&self, _: &str) {}
}
