//! Atomic file writes: temp file in the target directory, then rename.

use std::io;
use std::path::Path;
use tempfile::NamedTempFile;

/// Write `content` to `path` so readers see either the old file or the new
/// one, never a torn write. The temp file is removed if any step fails.
pub async fn atomic_write(path: &Path, content: &str) -> io::Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Path has no parent directory"))?
        .to_path_buf();
    let target_path = path.to_path_buf();
    let content_owned = content.to_string();

    tokio::task::spawn_blocking(move || -> io::Result<()> {
        use std::io::Write;

        // Same directory as the target, rename must not cross filesystems
        let mut temp_file = NamedTempFile::new_in(&parent)?;
        temp_file.write_all(content_owned.as_bytes())?;
        temp_file.as_file().sync_all()?;
        temp_file.persist(&target_path).map_err(|e| e.error)?;
        Ok(())
    })
    .await
    .map_err(io::Error::other)?
}
