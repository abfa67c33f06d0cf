//! PATH-based executable lookup with fallback locations.

use std::path::{Path, PathBuf};

/// System fallback paths to check if executable not found in PATH.
const FALLBACK_PATHS: &[&str] = &["/usr/local/bin", "/usr/bin"];

/// Find a probe program by name.
///
/// Tries the system PATH via the `which` crate first, then common system
/// directories, then user-local bin directories under `home`.
pub(crate) fn find_executable(name: &str, home: &Path) -> Option<PathBuf> {
    if let Ok(path) = which::which(name) {
        return Some(path);
    }

    FALLBACK_PATHS
        .iter()
        .map(PathBuf::from)
        .chain([home.join(".local/bin"), home.join("bin")])
        .map(|dir| dir.join(name))
        .find(|path| path.is_file())
}
