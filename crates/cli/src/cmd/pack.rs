//! Implementation of the packaging run.
//!
//! Resolves the worker configuration, runs the packaging sequence for the
//! builder, and turns the outcome into the process exit code.

use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;

use buildbot_pack_lib::{Builder, PackConfig, PackOutcome, pack};

use crate::output::{print_error, print_upload_summary};

/// Package the build for the builder named on the command line.
///
/// Packaging failures are reported on stderr and mapped to exit code 1.
/// SCons builders exit with SCons' own code. Only setup failures (locating
/// the executable, starting the async runtime) are returned as errors.
pub fn cmd_pack(builder: Option<String>) -> Result<ExitCode> {
  let start = Instant::now();

  let builder = match Builder::from_arg(builder) {
    Ok(builder) => builder,
    Err(err) => {
      print_error(&err.to_string());
      return Ok(ExitCode::FAILURE);
    }
  };

  let exe = std::env::current_exe().context("Failed to locate the running executable")?;
  let exe = dunce::canonicalize(&exe).unwrap_or(exe);
  let config = PackConfig::default().with_executable(&exe);

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let outcome = match rt.block_on(pack(&builder, &config)) {
    Ok(outcome) => outcome,
    Err(err) => {
      print_error(&err.to_string());
      return Ok(ExitCode::FAILURE);
    }
  };

  if let PackOutcome::Uploaded(summary) = &outcome {
    print_upload_summary(builder.name(), summary, start.elapsed());
  }

  let code = outcome.exit_code();
  info!(builder = %builder, code, "packaging finished");
  Ok(ExitCode::from(exit_byte(code)))
}

/// Exit status byte for a child's exit code. Codes the OS cannot report
/// unchanged become 1.
fn exit_byte(code: i32) -> u8 {
  u8::try_from(code).unwrap_or(1)
}
