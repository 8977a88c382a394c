//! buildbot-pack-lib: release packaging for build-farm workers
//!
//! This crate provides the steps a worker runs after compiling:
//! - `Builder`: classifies the builder name into the SCons or generic path
//! - `legacy`: assembles SCons options and strips the installed binaries
//! - `release`: clears and scans the release directory
//! - `archive`: writes the single-entry upload archive
//! - `pack`: runs the whole sequence for one builder

pub mod archive;
pub mod builder;
pub mod config;
pub mod consts;
pub mod execute;
pub mod legacy;
pub mod pack;
pub mod release;

#[cfg(test)]
pub(crate) mod testutil;

pub use builder::{Builder, BuilderKind};
pub use config::PackConfig;
pub use pack::{PackError, PackOutcome, UploadSummary, pack};
