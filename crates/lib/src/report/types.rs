use chrono::NaiveDateTime;
use serde::Serialize;
use thiserror::Error;

use crate::depends::DependencyBlock;
use crate::util::html::HtmlError;

/// Metadata read from a build info document.
///
/// Fields the document does not carry stay empty. In particular an empty
/// `expected_hash` means no known-good hash exists, and such a build can never
/// be classified as a match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildInfo {
  /// Full version, possibly epoch-qualified (`2:1.4-3`).
  pub version: String,
  /// Version with the epoch removed (`1.4-3`).
  pub short_version: String,
  /// Name the source is fetched by and the artifact is prefixed with.
  pub source_package: String,
  /// Directory prefix the unpacked source lands in.
  pub source_dir: String,
  /// Published SHA-256 of the artifact, lowercase hex.
  pub expected_hash: String,
  /// File name of the built `.deb`.
  pub artifact: String,
  /// Published artifact size in bytes.
  pub artifact_size: Option<u64>,
  /// Installed build dependencies, normalized.
  #[serde(skip)]
  pub dependencies: DependencyBlock,
}

impl BuildInfo {
  /// Upstream part of the short version: everything before the first `-`.
  pub fn upstream_version(&self) -> &str {
    self
      .short_version
      .split_once('-')
      .map(|(upstream, _)| upstream)
      .unwrap_or(&self.short_version)
  }

  /// Directory `dpkg-source` unpacks the source into.
  pub fn unpacked_dir(&self) -> String {
    format!("{}-{}", self.source_dir, self.upstream_version())
  }
}

/// Everything known about the original build of one package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildReport {
  /// Package name as queried.
  pub package: String,
  /// When the original build ran.
  pub build_time: NaiveDateTime,
  #[serde(flatten)]
  pub info: BuildInfo,
}

/// Errors from reading a report page.
#[derive(Debug, Error)]
pub enum ReportError {
  #[error(transparent)]
  Html(#[from] HtmlError),

  /// The page header has no build time.
  #[error("report page has no build time")]
  MissingBuildTime,

  /// The build time text could not be parsed.
  #[error("invalid build time '{text}': {source}")]
  InvalidBuildTime {
    text: String,
    #[source]
    source: chrono::ParseError,
  },

  /// The page header has no link to the build info.
  #[error("report page has no build info link")]
  MissingBuildInfoLink,
}
