use dirs::home_dir;
use std::path::PathBuf;

/// Returns the installer home directory, or None if the user's home cannot be resolved.
pub fn try_bizfly_home() -> Option<PathBuf> {
    if let Ok(val) = std::env::var("BIZFLY_HOME") {
        return Some(PathBuf::from(val));
    }
    home_dir().map(|h| h.join(".bizfly"))
}

/// Binary installation target: `$BIZFLY_BIN_DIR`, else `~/.bizfly/bin`.
pub fn try_bin_path() -> Option<PathBuf> {
    if let Ok(val) = std::env::var("BIZFLY_BIN_DIR") {
        return Some(PathBuf::from(val));
    }
    try_bizfly_home().map(|h| h.join("bin"))
}
