//! Test utilities for buildbot-pack-lib.
//!
//! Shell one-liners stand in for make, SCons and strip so tests do not need
//! a real toolchain.

/// Returns a command line that runs `script` with `/bin/sh`.
///
/// Arguments appended by the caller land in `$1`, `$2`, ... (and `"$@"`).
#[cfg(unix)]
pub fn shell_cmd(script: &str) -> Vec<String> {
  vec![
    "/bin/sh".to_string(),
    "-c".to_string(),
    script.to_string(),
    "sh".to_string(),
  ]
}

/// Returns a command line naming a program that does not exist.
pub fn missing_cmd() -> Vec<String> {
  vec!["/nonexistent/buildbot-pack-test-tool".to_string()]
}
