mod atomic;
mod hash;

pub use atomic::atomic_write;
pub use hash::{compute_hash, digest_matches};

use std::path::PathBuf;

/// Name of the per-user data folder
pub const ORDO_FOLDER: &str = ".ordo";

/// Environment variable overriding the data folder
pub const ORDO_HOME_ENV: &str = "ORDO_HOME";

/// Resolve the data directory: `$ORDO_HOME`, else `~/.ordo`, else `./.ordo`.
#[must_use]
pub fn data_dir() -> PathBuf {
    if let Some(home) = std::env::var_os(ORDO_HOME_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(home);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(ORDO_FOLDER)
}

/// Get current timestamp in ISO 8601 format
#[must_use]
pub fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Format a path for display, replacing home directory with ~/
#[must_use]
pub fn format_display_path(path: &str) -> String {
    replace_homedir::replace_homedir(path, "~")
}

#[cfg(test)]
#[path = "../utils_tests.rs"]
mod utils_tests;
