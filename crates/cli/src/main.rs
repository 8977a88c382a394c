mod cmd;
mod output;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::output::print_error;

/// buildbot-pack - Package a build-farm release into buildbot_upload.zip
#[derive(Parser)]
#[command(name = "buildbot-pack")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Builder name, e.g. linux_x86_64_scons or win64_cmake
  builder: Option<String>,
}

fn main() -> ExitCode {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  // Every failure, including bad arguments, exits with 1.
  let cli = match Cli::try_parse() {
    Ok(cli) => cli,
    Err(err) => {
      let _ = err.print();
      return if err.use_stderr() {
        ExitCode::FAILURE
      } else {
        ExitCode::SUCCESS
      };
    }
  };

  match cmd::cmd_pack(cli.builder) {
    Ok(code) => code,
    Err(err) => {
      print_error(&format!("{:#}", err));
      ExitCode::FAILURE
    }
  }
}
