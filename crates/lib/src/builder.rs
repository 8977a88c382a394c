//! Builder name classification.
//!
//! The builder name is opaque: only substring and prefix checks decide which
//! packaging path a worker takes.

use std::fmt;

use crate::consts::{LEGACY_MARKER, LINUX_PREFIX};
use crate::pack::PackError;

/// Packaging path selected by a builder name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderKind {
  /// SCons does its own packaging. `linux` builders get the build/install
  /// directory layout and a stripping step.
  Legacy { linux: bool },
  /// `make package_archive` followed by zipping the release package.
  Generic,
}

/// Name of the buildbot builder this worker runs for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Builder(String);

impl Builder {
  pub fn new(name: impl Into<String>) -> Self {
    Self(name.into())
  }

  /// Build from the first command-line argument, failing when it is absent.
  pub fn from_arg(arg: Option<String>) -> Result<Self, PackError> {
    arg.map(Self).ok_or(PackError::Usage)
  }

  pub fn name(&self) -> &str {
    &self.0
  }

  pub fn kind(&self) -> BuilderKind {
    if self.0.contains(LEGACY_MARKER) {
      BuilderKind::Legacy {
        linux: self.0.starts_with(LINUX_PREFIX),
      }
    } else {
      BuilderKind::Generic
    }
  }
}

impl fmt::Display for Builder {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}
