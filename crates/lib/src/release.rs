//! Release directory handling.
//!
//! Only the top level of the release directory is looked at: stale files are
//! removed before packaging and the package is picked from the files left
//! afterwards. Subdirectories are never touched.

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

/// Remove every regular file directly inside `dir`.
///
/// A missing directory is not an error. Returns the number of files removed.
pub async fn clean_release_dir(dir: &Path) -> io::Result<usize> {
  if !fs::try_exists(dir).await? {
    return Ok(0);
  }

  let mut removed = 0;
  let mut entries = fs::read_dir(dir).await?;
  while let Some(entry) = entries.next_entry().await? {
    let path = entry.path();
    if is_file(&path).await {
      debug!(path = %path.display(), "removing stale release file");
      fs::remove_file(&path).await?;
      removed += 1;
    }
  }

  Ok(removed)
}

/// Find the first regular file in `dir` whose name starts with `prefix`.
///
/// Entries are visited in directory listing order, which depends on the
/// filesystem. Names that are not valid UTF-8 never match.
pub async fn find_release_artifact(dir: &Path, prefix: &str) -> io::Result<Option<PathBuf>> {
  let mut entries = fs::read_dir(dir).await?;
  while let Some(entry) = entries.next_entry().await? {
    let path = entry.path();
    let file_name = entry.file_name();

    let Some(name) = file_name.to_str() else {
      debug!(path = %path.display(), "skipping release entry with a name that is not valid UTF-8");
      continue;
    };

    if name.starts_with(prefix) && is_file(&path).await {
      debug!(path = %path.display(), "found release package");
      return Ok(Some(path));
    }
  }

  Ok(None)
}

/// Follows symlinks, like `Path::is_file`.
async fn is_file(path: &Path) -> bool {
  fs::metadata(path).await.is_ok_and(|meta| meta.is_file())
}
