use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::util::html::HtmlError;

/// Format of snapshot timestamps on the listing page.
pub const SNAPSHOT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One entry of the snapshot archive listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRef {
  /// When the snapshot was taken.
  pub timestamp: NaiveDateTime,
  /// Path fragment below the archive root, e.g. `20171101T034813Z/`.
  pub path: String,
}

impl SnapshotRef {
  pub fn new(timestamp: NaiveDateTime, path: impl Into<String>) -> Self {
    Self {
      timestamp,
      path: path.into(),
    }
  }

  /// Full archive URL of this snapshot below `base_url`.
  pub fn url(&self, base_url: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), self.path.trim_start_matches('/'))
  }
}

impl std::fmt::Display for SnapshotRef {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{} ({})", self.timestamp.format(SNAPSHOT_TIME_FORMAT), self.path)
  }
}

/// Errors from reading a snapshot listing page.
#[derive(Debug, Error)]
pub enum ListingError {
  #[error(transparent)]
  Html(#[from] HtmlError),

  /// The page has no paragraph holding snapshot links.
  #[error("listing page has no snapshot list")]
  MissingList,
}
