//! Types for build execution.

use thiserror::Error;

use crate::consts::FAILED_TIME;

/// Errors that can occur while building and hashing a package.
///
/// None of these abort a run; the executor turns them into a failed
/// [`BuildMeasurement`].
#[derive(Debug, Error)]
pub enum ExecuteError {
  /// An engine command exited unsuccessfully.
  #[error("command failed with exit code {code:?}: {cmd}")]
  CmdFailed { cmd: String, code: Option<i32> },

  /// The hash command printed nothing usable.
  #[error("no digest in output of hash command for image {tag}")]
  NoDigest { tag: String },

  /// I/O error while preparing the workspace, the log, or spawning the engine.
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

/// What one build attempt produced.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildMeasurement {
  /// Hex digest of the rebuilt artifact; empty when the build failed.
  pub hash: String,
  /// Wall-clock seconds around build and hash.
  pub wall_time: f64,
  /// CPU user seconds consumed meanwhile.
  pub cpu_user: f64,
  /// CPU system seconds consumed meanwhile.
  pub cpu_system: f64,
}

impl BuildMeasurement {
  /// Measurement of a build that did not produce a hash.
  pub fn failed() -> Self {
    Self {
      hash: String::new(),
      wall_time: FAILED_TIME,
      cpu_user: FAILED_TIME,
      cpu_system: FAILED_TIME,
    }
  }

  pub fn is_failed(&self) -> bool {
    self.hash.is_empty()
  }

  /// `(hash, wall, user, system)`.
  pub fn into_tuple(self) -> (String, f64, f64, f64) {
    (self.hash, self.wall_time, self.cpu_user, self.cpu_system)
  }
}

/// Round seconds to millisecond precision.
pub fn round_millis(seconds: f64) -> f64 {
  (seconds * 1000.0).round() / 1000.0
}
