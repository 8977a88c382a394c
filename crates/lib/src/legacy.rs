//! SCons builders.
//!
//! SCons produces its own upload artifact, so this path only assembles the
//! build options, runs SCons in the source checkout, and strips the installed
//! binaries on Linux.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::builder::{Builder, BuilderKind};
use crate::config::PackConfig;
use crate::consts::{STRIPPED_BINARIES, USER_CONFIG_X86_64};
use crate::execute::{exit_code, run_command};
use crate::pack::PackError;

/// Options every SCons builder passes.
const BASE_OPTIONS: [&str; 2] = ["BF_QUICK=slnt", "buildslave"];

/// Arguments for one SCons run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyInvocation {
  /// `KEY=value` options in the order SCons receives them.
  pub options: Vec<String>,
  /// Install directory, relative to the source checkout. Set for Linux builders,
  /// whose binaries get stripped after a successful build.
  pub install_dir: Option<PathBuf>,
}

/// Assemble the SCons options for `builder`.
pub fn legacy_invocation(builder: &Builder, config_dir: &Path) -> LegacyInvocation {
  let mut options: Vec<String> = BASE_OPTIONS.iter().map(|s| s.to_string()).collect();

  if !matches!(builder.kind(), BuilderKind::Legacy { linux: true }) {
    return LegacyInvocation {
      options,
      install_dir: None,
    };
  }

  let build_dir = Path::new("..").join("build").join(builder.name());
  let install_dir = Path::new("..").join("install").join(builder.name());

  options.push("WITH_BF_NOBLENDER=True".to_string());
  options.push("WITH_BF_PLAYER=False".to_string());
  options.push(format!("BF_BUILDDIR={}", build_dir.display()));
  options.push(format!("BF_INSTALLDIR={}", install_dir.display()));

  if let Some(config) = user_config(builder.name()) {
    options.push(format!("BF_CONFIG={}", config_dir.join(config).display()));
  }

  LegacyInvocation {
    options,
    install_dir: Some(install_dir),
  }
}

/// SCons user config for builders that need one.
fn user_config(name: &str) -> Option<&'static str> {
  match name {
    // Both builders share the 64-bit config.
    "linux_x86_64_scons" | "linux_i386_scons" => Some(USER_CONFIG_X86_64),
    _ => None,
  }
}

/// Run SCons for `builder` and return its exit code.
///
/// The strip step after a successful Linux build is best-effort and never
/// changes the returned code.
pub async fn run_legacy(builder: &Builder, config: &PackConfig) -> Result<i32, PackError> {
  let source_dir = config.legacy_source_path();
  if !source_dir.is_dir() {
    return Err(PackError::MissingSourceDir { path: source_dir });
  }

  let invocation = legacy_invocation(builder, &config.config_dir);
  info!(builder = %builder, options = ?invocation.options, "running scons");

  let status = run_command(&config.legacy_command, &invocation.options, &source_dir)
    .await
    .map_err(PackError::LegacyLaunch)?;

  if status.success()
    && let Some(install_dir) = &invocation.install_dir
  {
    strip_binaries(config, &source_dir, install_dir).await;
  }

  let code = exit_code(status);
  info!(builder = %builder, code, "scons finished");
  Ok(code)
}

async fn strip_binaries(config: &PackConfig, source_dir: &Path, install_dir: &Path) {
  let binaries: Vec<String> = STRIPPED_BINARIES
    .iter()
    .map(|name| install_dir.join(name).display().to_string())
    .collect();

  match run_command(&config.strip_command, &binaries, source_dir).await {
    Ok(status) if !status.success() => {
      warn!(code = ?status.code(), binaries = ?binaries, "strip failed");
    }
    Ok(_) => {}
    Err(err) => warn!(error = %err, "could not run strip"),
  }
}
