//! Subcommand implementations

pub mod hash;
pub mod info;
pub mod install;
pub mod platforms;
pub mod resolve;
