//! IO modules - side effects (network, filesystem)

/// HTTP fetch with streaming verification.
pub mod download;
/// tar.gz extraction.
pub mod extract;
/// Atomic placement of the executable.
pub mod install;
