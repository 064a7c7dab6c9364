mod init;
pub use init::{init_logging, parse_rotation};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::Level;
use tracing_appender::rolling::Rotation;
/// Log filename written under the log directory.
pub const LOG_FILENAME: &str = "ordo.log";
/// Global log file path, set once at startup.
static LOG_FILE_PATH: OnceLock<String> = OnceLock::new();
/// Store the log file path for later retrieval (e.g., in structured error output).
pub fn set_log_file_path(path: String) {
    let _ = LOG_FILE_PATH.set(path);
}
/// Get the log file path set at startup.
pub fn get_log_file_path() -> &'static str {
    LOG_FILE_PATH.get().map_or("", |s| s.as_str())
}
/// Configuration for the logging system.
pub struct LogConfig {
    pub log_dir: PathBuf,
    pub log_level: Level,
    pub json_format: bool,
    pub rotation: Rotation,
}
impl LogConfig {
    /// Logs live in `<data_dir>/logs`.
    #[must_use]
    pub fn for_data_dir(data_dir: &Path) -> Self {
        Self {
            log_dir: data_dir.join("logs"),
            ..Self::default()
        }
    }
}
impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_dir: crate::utils::data_dir().join("logs"),
            log_level: Level::INFO,
            json_format: false,
            rotation: Rotation::DAILY,
        }
    }
}
#[cfg(test)]
#[path = "../logging_tests.rs"]
mod logging_tests;
