use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

/// Write `contents` to `dest_dir/name` atomically with mode `0o755`.
///
/// The bytes land in a temp file inside `dest_dir` first and are renamed
/// over the target, so readers only ever see the old or the new binary.
/// The temp file is removed on every error path.
///
/// # Errors
///
/// Returns the underlying I/O error if the directory cannot be created or
/// any write, permission or rename step fails.
pub fn install_executable(contents: &[u8], dest_dir: &Path, name: &str) -> io::Result<PathBuf> {
    std::fs::create_dir_all(dest_dir)?;
    let target = dest_dir.join(name);

    let mut tmp = tempfile::Builder::new()
        .prefix(&format!(".{name}."))
        .suffix(".tmp")
        .tempfile_in(dest_dir)?;

    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(tmp.path(), std::fs::Permissions::from_mode(0o755))?;
    }

    tmp.persist(&target).map_err(|e| e.error)?;
    debug!(path = %target.display(), bytes = contents.len(), "installed executable");

    Ok(target)
}
