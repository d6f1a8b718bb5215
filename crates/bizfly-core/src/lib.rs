//! Core library for the bizflyctl installer: fetch, verification,
//! extraction and installation of release archives.

/// Installer error taxonomy.
pub mod error;
/// The resolve, fetch, verify, extract, install pipeline.
pub mod installer;
/// Side effects: network and filesystem.
pub mod io;
/// Installer home and binary directory.
pub mod paths;
/// Progress reporting seam.
pub mod reporter;

pub use error::InstallError;
pub use installer::{InstallRequest, InstalledBinary, install, resolve};
pub use paths::*;
pub use reporter::{NullReporter, Reporter};

/// User Agent string for core operations
pub const USER_AGENT: &str = concat!("bizfly-core/", env!("CARGO_PKG_VERSION"));
