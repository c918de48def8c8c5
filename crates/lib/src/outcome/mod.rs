//! Build outcomes.
//!
//! A rebuilt artifact either matches the published checksum, differs from it,
//! or could not be produced at all. Telling the last two apart matters: a
//! differing hash means the build works but is not reproducible, a failure
//! means the build itself is broken.

mod results;

use serde::{Deserialize, Serialize};

use crate::consts::FAILED_TIME;
use crate::execute::BuildMeasurement;

pub use results::{CSV_HEADER, Results, ResultsError};

/// Classification of one build attempt. Serialized as its one-letter tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
  #[serde(rename = "y")]
  Match,
  #[serde(rename = "n")]
  Differ,
  #[serde(rename = "f")]
  Failed,
}

impl Outcome {
  /// One-letter tag used in the CSV report.
  pub fn tag(self) -> char {
    match self {
      Outcome::Match => 'y',
      Outcome::Differ => 'n',
      Outcome::Failed => 'f',
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Outcome::Match => "match",
      Outcome::Differ => "differ",
      Outcome::Failed => "failed",
    }
  }
}

impl std::fmt::Display for Outcome {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Compare the published hash with the rebuilt one.
///
/// The checks run in a fixed order: a match needs a non-empty expected hash,
/// an empty computed hash is always a failure, anything else differs. An empty
/// expected hash therefore never matches.
pub fn classify(expected: &str, computed: &str) -> Outcome {
  if !expected.is_empty() && computed == expected {
    Outcome::Match
  } else if computed.is_empty() {
    Outcome::Failed
  } else {
    Outcome::Differ
  }
}

/// One row of the final report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcomeRecord {
  pub package: String,
  /// Artifact file name.
  pub binary: String,
  /// Published artifact size in bytes.
  pub size: Option<u64>,
  pub wall_time: f64,
  #[serde(rename = "cpu_user_time")]
  pub cpu_user: f64,
  #[serde(rename = "cpu_system_time")]
  pub cpu_system: f64,
  pub outcome: Outcome,
}

impl OutcomeRecord {
  /// Classify a measurement against the expected hash.
  ///
  /// Failed records always carry the sentinel times.
  pub fn from_measurement(
    package: &str,
    binary: &str,
    size: Option<u64>,
    expected: &str,
    measurement: &BuildMeasurement,
  ) -> Self {
    let outcome = classify(expected, &measurement.hash);
    let (wall_time, cpu_user, cpu_system) = match outcome {
      Outcome::Failed => (FAILED_TIME, FAILED_TIME, FAILED_TIME),
      _ => (measurement.wall_time, measurement.cpu_user, measurement.cpu_system),
    };

    Self {
      package: package.to_string(),
      binary: binary.to_string(),
      size,
      wall_time,
      cpu_user,
      cpu_system,
      outcome,
    }
  }

  /// Record for a package whose processing stopped before the build.
  pub fn failed(package: &str) -> Self {
    Self::from_measurement(package, "", None, "", &BuildMeasurement::failed())
  }
}
