//! Hash command

use anyhow::{Context, Result};
use bizfly_core::io::download::hash_file;
use std::path::PathBuf;

/// Compute SHA256 hash of files
pub fn hash(files: &[PathBuf]) -> Result<()> {
    for file in files {
        let digest =
            hash_file(file).with_context(|| format!("Failed to read {}", file.display()))?;
        println!("{} {}", digest, file.display());
    }
    Ok(())
}
