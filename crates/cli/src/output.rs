//! Terminal output for packaging runs.
//!
//! Errors are one line on stderr so buildbot shows them as the step's failure
//! reason. The upload summary goes to stdout as `label: value` lines.

use std::time::Duration;

use owo_colors::{OwoColorize, Stream};

use buildbot_pack_lib::UploadSummary;

const SUCCESS: &str = "✓";
const ERROR: &str = "✗";

/// Human-readable size of a release package, in binary units.
pub fn format_size(bytes: u64) -> String {
  const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

  if bytes < 1024 {
    return format!("{} B", bytes);
  }

  let mut value = bytes as f64 / 1024.0;
  let mut unit = 0;
  while value >= 1024.0 && unit < UNITS.len() - 1 {
    value /= 1024.0;
    unit += 1;
  }
  format!("{:.1} {}", value, UNITS[unit])
}

/// Wall-clock time of a packaging run. Runs that include a build take minutes,
/// so sub-second precision is only shown for short runs.
pub fn format_elapsed(elapsed: Duration) -> String {
  let secs = elapsed.as_secs();

  match secs {
    0..60 => format!("{:.1}s", elapsed.as_secs_f64()),
    60..3600 => format!("{}m {:02}s", secs / 60, secs % 60),
    _ => format!("{}h {:02}m", secs / 3600, (secs % 3600) / 60),
  }
}

/// Label/value pairs describing a written upload archive.
pub fn upload_summary_lines(builder: &str, summary: &UploadSummary, elapsed: Duration) -> Vec<(&'static str, String)> {
  let package = summary
    .artifact
    .file_name()
    .map(|name| name.to_string_lossy().into_owned())
    .unwrap_or_default();

  vec![
    ("Builder", builder.to_string()),
    ("Package", package),
    ("Size", format_size(summary.bytes)),
    ("Archive", summary.archive.display().to_string()),
    ("Duration", format_elapsed(elapsed)),
  ]
}

pub fn print_upload_summary(builder: &str, summary: &UploadSummary, elapsed: Duration) {
  println!(
    "{} Upload archive ready",
    SUCCESS.if_supports_color(Stream::Stdout, |s| s.green())
  );
  for (label, value) in upload_summary_lines(builder, summary, elapsed) {
    println!(
      "  {}: {}",
      label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
      value
    );
  }
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}
