//! Upload archive writing.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{Datelike, Local, Timelike};
use thiserror::Error;
use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// Errors that can occur while writing the upload archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
  #[error("artifact has no usable file name: {}", .0.display())]
  InvalidName(PathBuf),

  #[error("io error: {0}")]
  Io(#[from] io::Error),

  #[error("zip error: {0}")]
  Zip(#[from] zip::result::ZipError),
}

/// Write `artifact` as the only entry of a new zip archive at `dest`.
///
/// Any existing file at `dest` is replaced. The entry is stored uncompressed
/// under the artifact's base name and keeps the artifact's modification time.
/// Returns the number of bytes stored.
pub fn write_upload_archive(artifact: &Path, dest: &Path) -> Result<u64, ArchiveError> {
  let name = artifact
    .file_name()
    .and_then(|name| name.to_str())
    .ok_or_else(|| ArchiveError::InvalidName(artifact.to_path_buf()))?;

  if dest.exists() {
    fs::remove_file(dest)?;
  }

  let mut source = File::open(artifact)?;
  let metadata = source.metadata()?;

  let options = SimpleFileOptions::default()
    .compression_method(CompressionMethod::Stored)
    .large_file(metadata.len() >= u64::from(u32::MAX))
    .last_modified_time(entry_timestamp(metadata.modified()?));

  #[cfg(unix)]
  let options = {
    use std::os::unix::fs::PermissionsExt;
    options.unix_permissions(metadata.permissions().mode())
  };

  let mut writer = ZipWriter::new(File::create(dest)?);
  writer.start_file(name, options)?;
  let bytes = io::copy(&mut source, &mut writer)?;
  writer.finish()?;

  info!(archive = %dest.display(), entry = name, bytes, "wrote upload archive");
  Ok(bytes)
}

/// Local wall-clock time of `modified` in zip's DOS format.
///
/// Zip cannot represent times before 1980; those fall back to 1980-01-01.
fn entry_timestamp(modified: SystemTime) -> DateTime {
  let local: chrono::DateTime<Local> = modified.into();
  let converted = u16::try_from(local.year()).ok().and_then(|year| {
    DateTime::from_date_and_time(
      year,
      local.month() as u8,
      local.day() as u8,
      local.hour() as u8,
      local.minute() as u8,
      local.second() as u8,
    )
    .ok()
  });

  converted.unwrap_or_else(|| {
    debug!(modified = %local, "modification time out of zip range, using 1980-01-01");
    DateTime::default()
  })
}
