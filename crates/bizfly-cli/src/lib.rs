//! bizfly-install - verified installer for bizflyctl
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
//!
//! Picks the `bizflyctl` release archive for the running machine, checks its
//! SHA256 against the digest baked into this binary, and installs the
//! `bizfly` executable.
//!
//! # Directory Layout
//!
//! ```text
//! ~/.bizfly/      # $BIZFLY_HOME
//! └── bin/        # $BIZFLY_BIN_DIR, receives `bizfly`
//! ```

pub mod cmd;
pub mod ui;

use std::path::PathBuf;

use bizfly_core::InstallError;
use bizfly_schema::{Arch, ArtifactTable, Os, Platform, PlatformMatch};
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "bizfly-install")]
#[command(author, version, about = "Install the bizflyctl command line for Bizfly Cloud")]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,

    // Install options used when no subcommand is given
    #[command(flatten)]
    pub install: InstallArgs,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Download, verify and install `bizfly` (default)
    Install(InstallArgs),
    /// Show which archive would be selected
    Resolve {
        #[command(flatten)]
        platform: PlatformArgs,
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// List every published archive
    Platforms {
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Show release metadata
    Info,
    /// Compute SHA256 hash of a file (for table authoring)
    Hash {
        /// Files to hash
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

#[derive(Debug, Clone, Args)]
pub struct InstallArgs {
    #[command(flatten)]
    pub platform: PlatformArgs,

    /// Directory receiving the executable
    #[arg(long, env = "BIZFLY_BIN_DIR")]
    pub bin_dir: Option<PathBuf>,

    /// Download timeout in seconds
    #[arg(long, env = "BIZFLY_FETCH_TIMEOUT", default_value_t = 300)]
    pub timeout: u64,

    /// Resolve and print the archive without downloading
    #[arg(long)]
    pub dry_run: bool,
}

/// Optional overrides for host detection.
#[derive(Debug, Clone, Default, Args)]
pub struct PlatformArgs {
    /// Target operating system (macos, linux)
    #[arg(long)]
    pub os: Option<Os>,

    /// Target architecture (x86_64, arm64, armv6)
    #[arg(long)]
    pub arch: Option<Arch>,
}

impl PlatformArgs {
    /// Overrides on top of the detected host.
    pub fn platform(&self, table: &ArtifactTable) -> Result<Platform, InstallError> {
        self.platform_on(table, Os::current(), Arch::current())
    }

    fn platform_on(
        &self,
        table: &ArtifactTable,
        host_os: Option<Os>,
        host_arch: Option<Arch>,
    ) -> Result<Platform, InstallError> {
        let os = self.os.or(host_os).ok_or_else(InstallError::unsupported_host)?;
        let arch = match self.arch.or(host_arch) {
            Some(arch) => arch,
            None => universal_arch(table, os).ok_or_else(InstallError::unsupported_host)?,
        };
        Ok(Platform::new(os, arch))
    }
}

/// An unknown architecture is fine when `os` ships one build for all of them.
fn universal_arch(table: &ArtifactTable, os: Os) -> Option<Arch> {
    let universal = table
        .entries()
        .iter()
        .any(|e| matches!(e.target, PlatformMatch::AnyArch { .. }) && e.target.os() == os);
    if !universal {
        return None;
    }
    Platform::all().find(|p| p.os == os).map(|p| p.arch)
}
