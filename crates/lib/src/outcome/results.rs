//! Result aggregation and the CSV report.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use super::{Outcome, OutcomeRecord};

/// Column names of the report, in order.
pub const CSV_HEADER: [&str; 7] = [
  "package",
  "binary",
  "size",
  "wall_time",
  "cpu_user_time",
  "cpu_system_time",
  "outcome",
];

#[derive(Debug, Error)]
pub enum ResultsError {
  #[error("failed to create report '{path}': {source}")]
  Create {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to write report: {0}")]
  Csv(#[from] csv::Error),
}

/// Outcome records of a run, one bucket per outcome.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Results {
  matched: Vec<OutcomeRecord>,
  differ: Vec<OutcomeRecord>,
  failed: Vec<OutcomeRecord>,
}

impl Results {
  pub fn new() -> Self {
    Self::default()
  }

  /// File a record under its outcome.
  pub fn push(&mut self, record: OutcomeRecord) {
    match record.outcome {
      Outcome::Match => self.matched.push(record),
      Outcome::Differ => self.differ.push(record),
      Outcome::Failed => self.failed.push(record),
    }
  }

  pub fn matched(&self) -> &[OutcomeRecord] {
    &self.matched
  }

  pub fn differ(&self) -> &[OutcomeRecord] {
    &self.differ
  }

  pub fn failed(&self) -> &[OutcomeRecord] {
    &self.failed
  }

  pub fn bucket(&self, outcome: Outcome) -> &[OutcomeRecord] {
    match outcome {
      Outcome::Match => &self.matched,
      Outcome::Differ => &self.differ,
      Outcome::Failed => &self.failed,
    }
  }

  pub fn len(&self) -> usize {
    self.matched.len() + self.differ.len() + self.failed.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// All records: matched, then differing, then failed.
  pub fn records(&self) -> impl Iterator<Item = &OutcomeRecord> {
    self.matched.iter().chain(&self.differ).chain(&self.failed)
  }

  /// Write the report as CSV: a header row, then every record.
  pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), ResultsError> {
    let mut csv = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    csv.write_record(CSV_HEADER)?;
    for record in self.records() {
      csv.serialize(record)?;
    }
    csv.flush().map_err(csv::Error::from)?;
    Ok(())
  }

  /// Write the report to `path`, replacing any previous file.
  pub fn save(&self, path: &Path) -> Result<(), ResultsError> {
    let file = File::create(path).map_err(|source| ResultsError::Create {
      path: path.to_path_buf(),
      source,
    })?;
    self.write_csv(file)?;
    info!(path = %path.display(), records = self.len(), "report written");
    Ok(())
  }
}
