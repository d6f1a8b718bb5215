//! Shared types for the bizflyctl installer: platform keys, digests and the
//! baked-in release table.

/// Host platform keys.
pub mod arch;
/// Release record for bizflyctl.
pub mod formula;
/// SHA256 digest newtype.
pub mod hash;
/// Artifact entries and the platform-keyed table.
pub mod types;

// Re-exports
pub use arch::*;
pub use formula::{ArtifactRow, BIZFLYCTL, Formula};
pub use hash::*;
pub use types::*;

/// Extract the filename from a URL.
///
/// # Example
///
/// ```
/// use bizfly_schema::filename_from_url;
///
/// assert_eq!(filename_from_url("https://example.com/path/to/file.tar.gz"), "file.tar.gz");
/// assert_eq!(filename_from_url(""), "");
/// ```
pub fn filename_from_url(url: &str) -> &str {
    url.split('/').next_back().unwrap_or("")
}
