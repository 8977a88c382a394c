//! Subprocess execution for build steps.
//!
//! Children inherit stdio so their output ends up in the buildbot log, and
//! each one is awaited before the next step starts.

use std::path::Path;
use std::process::ExitStatus;

use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info};

/// Errors that can occur while launching a build step.
#[derive(Debug, Error)]
pub enum ExecuteError {
  /// The configured command line has no program.
  #[error("empty command line")]
  EmptyCommand,

  /// The program could not be started (not found, not executable, bad cwd).
  #[error("failed to launch {program}: {source}")]
  Launch {
    program: String,
    #[source]
    source: std::io::Error,
  },
}

/// Run `argv` followed by `extra_args` in `cwd` and wait for it to exit.
///
/// A non-zero exit is not an error here; callers decide what it means.
pub async fn run_command(argv: &[String], extra_args: &[String], cwd: &Path) -> Result<ExitStatus, ExecuteError> {
  let (program, args) = argv.split_first().ok_or(ExecuteError::EmptyCommand)?;

  info!(cmd = %program, args = ?args, extra = ?extra_args, cwd = %cwd.display(), "running command");

  let status = Command::new(program)
    .args(args)
    .args(extra_args)
    .current_dir(cwd)
    .status()
    .await
    .map_err(|source| ExecuteError::Launch {
      program: program.clone(),
      source,
    })?;

  debug!(cmd = %program, code = ?status.code(), "command finished");

  Ok(status)
}

/// Exit code to propagate for a finished child. Signal deaths map to 1.
pub fn exit_code(status: ExitStatus) -> i32 {
  status.code().unwrap_or(1)
}
