//! Packaging for one builder.
//!
//! SCons builders hand off to `legacy`. Every other builder runs the
//! packaging make target, picks the release package out of the release
//! directory, and wraps it in the upload archive.

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{info, warn};

use crate::archive::{ArchiveError, write_upload_archive};
use crate::builder::{Builder, BuilderKind};
use crate::config::PackConfig;
use crate::execute::{ExecuteError, run_command};
use crate::legacy::run_legacy;
use crate::release::{clean_release_dir, find_release_artifact};

/// Errors that end a packaging run.
#[derive(Debug, Error)]
pub enum PackError {
  /// No builder name was given.
  #[error("Not enough arguments, expecting builder name")]
  Usage,

  /// The packaging command could not be started.
  #[error("Make package release failed: {0}")]
  Launch(#[source] ExecuteError),

  /// SCons could not be started.
  #[error("SCons invocation failed: {0}")]
  LegacyLaunch(#[source] ExecuteError),

  /// The source checkout SCons runs in does not exist.
  #[error("Failed to find legacy source directory: {}", path.display())]
  MissingSourceDir { path: PathBuf },

  /// The release directory is absent after packaging.
  #[error("Failed to find release directory: {}", path.display())]
  MissingReleaseDir { path: PathBuf },

  /// No file in the release directory carries the package prefix.
  #[error("Failed to find release package: no '{prefix}*' file in {}", dir.display())]
  MissingArtifact { dir: PathBuf, prefix: String },

  /// The release directory could not be cleared or listed.
  #[error("Failed to read release directory {}: {source}", path.display())]
  ReleaseDir {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// Writing the upload archive failed.
  #[error("Create {} failed: {source}", path.display())]
  ArchiveWrite {
    path: PathBuf,
    #[source]
    source: ArchiveError,
  },
}

/// What a successful packaging run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackOutcome {
  /// SCons ran and exited with `code`, which the worker should exit with.
  Legacy { code: i32 },
  /// The upload archive was written.
  Uploaded(UploadSummary),
}

impl PackOutcome {
  pub fn exit_code(&self) -> i32 {
    match self {
      PackOutcome::Legacy { code } => *code,
      PackOutcome::Uploaded(_) => 0,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSummary {
  pub archive: PathBuf,
  pub artifact: PathBuf,
  pub bytes: u64,
}

/// Package the build for `builder`.
///
/// The packaging command's own exit code is not checked: a failed build
/// still proceeds to look for a release package.
pub async fn pack(builder: &Builder, config: &PackConfig) -> Result<PackOutcome, PackError> {
  match builder.kind() {
    BuilderKind::Legacy { .. } => {
      let code = run_legacy(builder, config).await?;
      Ok(PackOutcome::Legacy { code })
    }
    BuilderKind::Generic => pack_release(builder, config).await.map(PackOutcome::Uploaded),
  }
}

async fn pack_release(builder: &Builder, config: &PackConfig) -> Result<UploadSummary, PackError> {
  let release = config.release_path();
  let release_err = |source| PackError::ReleaseDir {
    path: release.clone(),
    source,
  };

  let removed = clean_release_dir(&release).await.map_err(release_err)?;
  info!(builder = %builder, removed, "cleared release directory");

  let status = run_command(&config.package_command, &[], &config.work_dir)
    .await
    .map_err(PackError::Launch)?;
  if !status.success() {
    warn!(code = ?status.code(), "packaging command failed, looking for a release package anyway");
  }

  if !tokio::fs::try_exists(&release).await.unwrap_or(false) {
    return Err(PackError::MissingReleaseDir { path: release.clone() });
  }

  let artifact = find_release_artifact(&release, &config.artifact_prefix)
    .await
    .map_err(release_err)?
    .ok_or_else(|| PackError::MissingArtifact {
      dir: release.clone(),
      prefix: config.artifact_prefix.clone(),
    })?;

  let archive = config.upload_archive_path();
  let bytes = write_upload_archive(&artifact, &archive).map_err(|source| PackError::ArchiveWrite {
    path: config.upload_archive.clone(),
    source,
  })?;

  Ok(UploadSummary {
    archive,
    artifact,
    bytes,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testutil::missing_cmd;
  use std::fs;
  use tempfile::TempDir;
  use tracing_test::traced_test;

  #[cfg(unix)]
  use crate::testutil::shell_cmd;

  fn generic() -> Builder {
    Builder::new("win64_cmake")
  }

  #[cfg(unix)]
  fn work_config(temp_dir: &TempDir, package_script: &str) -> PackConfig {
    let mut config = PackConfig::default().with_work_dir(temp_dir.path());
    config.package_command = shell_cmd(package_script);
    config
  }

  #[cfg(unix)]
  fn entry_names(archive: &std::path::Path) -> Vec<String> {
    let archive = zip::ZipArchive::new(fs::File::open(archive).unwrap()).unwrap();
    archive.file_names().map(str::to_string).collect()
  }

  #[tokio::test]
  #[cfg(unix)]
  async fn packages_release_artifact() {
    let temp_dir = TempDir::new().unwrap();
    let config = work_config(
      &temp_dir,
      "mkdir -p release && printf 'tarball' > release/blender-2.0.tar.gz && printf 'x' > release/notes.txt",
    );

    let outcome = pack(&generic(), &config).await.unwrap();

    let archive = temp_dir.path().join("buildbot_upload.zip");
    assert_eq!(
      outcome,
      PackOutcome::Uploaded(UploadSummary {
        archive: archive.clone(),
        artifact: temp_dir.path().join("release").join("blender-2.0.tar.gz"),
        bytes: 7,
      })
    );
    assert_eq!(outcome.exit_code(), 0);
    assert_eq!(entry_names(&archive), vec!["blender-2.0.tar.gz"]);
  }

  #[tokio::test]
  #[cfg(unix)]
  async fn stale_release_files_are_removed_before_packaging() {
    let temp_dir = TempDir::new().unwrap();
    let release = temp_dir.path().join("release");
    fs::create_dir_all(release.join("docs")).unwrap();
    fs::write(release.join("blender-old.tar.gz"), "stale").unwrap();
    fs::write(release.join("docs").join("manual.txt"), "kept").unwrap();
    let config = work_config(&temp_dir, "true");

    let result = pack(&generic(), &config).await;

    assert!(matches!(result, Err(PackError::MissingArtifact { .. })));
    assert!(!release.join("blender-old.tar.gz").exists());
    assert!(release.join("docs").join("manual.txt").exists());
    assert!(!temp_dir.path().join("buildbot_upload.zip").exists());
  }

  #[tokio::test]
  #[cfg(unix)]
  async fn missing_release_dir_creates_no_archive() {
    let temp_dir = TempDir::new().unwrap();
    let config = work_config(&temp_dir, "true");

    let err = pack(&generic(), &config).await.unwrap_err();

    assert!(matches!(err, PackError::MissingReleaseDir { .. }));
    assert!(err.to_string().starts_with("Failed to find release directory"));
    assert!(!temp_dir.path().join("buildbot_upload.zip").exists());
  }

  #[tokio::test]
  #[cfg(unix)]
  #[traced_test]
  async fn failed_packaging_command_is_not_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let config = work_config(&temp_dir, "mkdir -p release && printf 'tb' > release/blender.tar.bz2; exit 2");

    let outcome = pack(&generic(), &config).await.unwrap();

    assert_eq!(outcome.exit_code(), 0);
    assert!(logs_contain("packaging command failed"));
  }

  #[tokio::test]
  #[cfg(unix)]
  async fn rerun_overwrites_existing_archive() {
    let temp_dir = TempDir::new().unwrap();
    let archive = temp_dir.path().join("buildbot_upload.zip");
    fs::write(&archive, "previous upload").unwrap();
    let config = work_config(&temp_dir, "mkdir -p release && printf 'new' > release/blender-2.1.zip");

    pack(&generic(), &config).await.unwrap();
    pack(&generic(), &config).await.unwrap();

    assert_eq!(entry_names(&archive), vec!["blender-2.1.zip"]);
  }

  #[tokio::test]
  #[cfg(unix)]
  async fn directory_at_archive_path_is_archive_write_error() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir_all(temp_dir.path().join("buildbot_upload.zip")).unwrap();
    let config = work_config(&temp_dir, "mkdir -p release && printf 'tb' > release/blender-2.0.tar.gz");

    let err = pack(&generic(), &config).await.unwrap_err();

    assert!(matches!(err, PackError::ArchiveWrite { .. }));
    assert!(err.to_string().starts_with("Create buildbot_upload.zip failed"));
    assert!(temp_dir.path().join("buildbot_upload.zip").is_dir());
  }

  #[tokio::test]
  #[cfg(unix)]
  async fn release_path_that_is_a_file_is_release_dir_error() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("release"), "not a directory").unwrap();
    let config = work_config(&temp_dir, "true");

    let err = pack(&generic(), &config).await.unwrap_err();

    assert!(matches!(err, PackError::ReleaseDir { .. }));
    assert!(err.to_string().starts_with("Failed to read release directory"));
    assert!(!temp_dir.path().join("buildbot_upload.zip").exists());
  }

  #[tokio::test]
  async fn unlaunchable_packaging_command_is_launch_error() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = PackConfig::default().with_work_dir(temp_dir.path());
    config.package_command = missing_cmd();

    let err = pack(&generic(), &config).await.unwrap_err();

    assert!(matches!(err, PackError::Launch(_)));
    assert!(err.to_string().starts_with("Make package release failed"));
  }

  #[tokio::test]
  #[cfg(unix)]
  async fn legacy_builder_returns_scons_code() {
    let temp_dir = TempDir::new().unwrap();
    let work = temp_dir.path().join("work");
    fs::create_dir_all(&work).unwrap();
    fs::create_dir_all(temp_dir.path().join("blender")).unwrap();
    let mut config = PackConfig::default().with_work_dir(&work);
    config.legacy_command = shell_cmd("exit 4");
    config.package_command = missing_cmd();

    let outcome = pack(&Builder::new("mac_scons"), &config).await.unwrap();

    assert_eq!(outcome, PackOutcome::Legacy { code: 4 });
    assert_eq!(outcome.exit_code(), 4);
    assert!(!work.join("buildbot_upload.zip").exists());
  }
}
