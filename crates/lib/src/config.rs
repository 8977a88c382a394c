//! Resolved settings for one packaging run.

use std::path::{Path, PathBuf};

use crate::consts::{
  ARTIFACT_PREFIX, CONFIG_DIR_NAME, LEGACY_SOURCE_DIR, RELEASE_DIR, UPLOAD_ARCHIVE,
};

/// Where a packaging run reads and writes, and which commands it spawns.
///
/// `Default` yields the values a build-farm worker uses. Relative paths are
/// resolved against `work_dir`.
#[derive(Debug, Clone)]
pub struct PackConfig {
  /// Directory the worker was started in.
  pub work_dir: PathBuf,
  /// Release directory written by the packaging command.
  pub release_dir: PathBuf,
  /// File name prefix identifying the release package.
  pub artifact_prefix: String,
  /// Upload archive written by the generic path.
  pub upload_archive: PathBuf,
  /// Source checkout SCons runs in.
  pub legacy_source_dir: PathBuf,
  /// Directory holding SCons user configs.
  pub config_dir: PathBuf,
  /// Generic packaging command line.
  pub package_command: Vec<String>,
  /// SCons command line; build options are appended.
  pub legacy_command: Vec<String>,
  /// Strip command line; binary paths are appended.
  pub strip_command: Vec<String>,
}

impl Default for PackConfig {
  fn default() -> Self {
    Self {
      work_dir: PathBuf::from("."),
      release_dir: PathBuf::from(RELEASE_DIR),
      artifact_prefix: ARTIFACT_PREFIX.to_string(),
      upload_archive: PathBuf::from(UPLOAD_ARCHIVE),
      legacy_source_dir: PathBuf::from(LEGACY_SOURCE_DIR),
      config_dir: PathBuf::from(CONFIG_DIR_NAME),
      package_command: to_argv(&["make", "package_archive"]),
      legacy_command: to_argv(&["python", "scons/scons.py"]),
      strip_command: to_argv(&["strip", "--strip-all"]),
    }
  }
}

impl PackConfig {
  /// Use `config/` next to the given executable for SCons user configs.
  pub fn with_executable(mut self, exe: &Path) -> Self {
    let exe_dir = exe.parent().unwrap_or_else(|| Path::new("."));
    self.config_dir = exe_dir.join(CONFIG_DIR_NAME);
    self
  }

  pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
    self.work_dir = dir.into();
    self
  }

  pub fn release_path(&self) -> PathBuf {
    self.work_dir.join(&self.release_dir)
  }

  pub fn upload_archive_path(&self) -> PathBuf {
    self.work_dir.join(&self.upload_archive)
  }

  pub fn legacy_source_path(&self) -> PathBuf {
    self.work_dir.join(&self.legacy_source_dir)
  }
}

fn to_argv(parts: &[&str]) -> Vec<String> {
  parts.iter().map(|s| s.to_string()).collect()
}
