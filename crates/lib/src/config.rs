//! Run configuration.
//!
//! Every setting has a default that reproduces builds from the Debian testing
//! reports against the public snapshot archive. A TOML file may override any
//! subset of them:
//!
//! ```toml
//! engine = "podman"
//! suites = ["buster", "sid"]
//! base_image = "debian:buster"
//! ```
//!
//! The file is taken from, in order: an explicit path, the `DEBREPRO_CONFIG`
//! environment variable, or `config.toml` in the platform config directory
//! when it exists.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::consts::{
  CONFIG_ENV_VAR, DEFAULT_BASE_IMAGE, DEFAULT_ENGINE, DEFAULT_HASH_COMMAND, DEFAULT_OUTPUT,
  DEFAULT_REPORT_BASE_URL, DEFAULT_REPORT_SITE_URL, DEFAULT_REPRODUCIBLE_INDEX_URL, DEFAULT_SNAPSHOT_BASE_URL,
  DEFAULT_SOURCE_MIRROR, DEFAULT_SUITES, DEFAULT_TAG_PREFIX,
};
use crate::paths;
use crate::recipe::RecipeOptions;

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read config '{path}': {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse config '{path}': {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: toml::de::Error,
  },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Per-package report pages, `<base>/<package>.html`.
  pub report_base_url: String,
  /// Site root that build info links resolve against.
  pub report_site_url: String,
  /// Page listing reproducible packages, sampled by the `random` set.
  pub reproducible_index_url: String,
  /// Root of the snapshot archive.
  pub snapshot_base_url: String,
  /// Live mirror the source packages are fetched from.
  pub source_mirror: String,
  /// Image the recipe starts from.
  pub base_image: String,
  /// Suites each selected snapshot is added for.
  pub suites: Vec<String>,
  /// Container engine binary (`docker`, `podman`).
  pub engine: String,
  /// Image tags are `<tag_prefix>:<package>`.
  pub tag_prefix: String,
  /// Digest command run against the artifact inside the image.
  pub hash_command: String,
  /// Parent directory of per-package workspaces.
  pub work_dir: PathBuf,
  /// Directory receiving `<package>.log` build logs.
  pub log_dir: PathBuf,
  /// CSV report written at the end of a run.
  pub output: PathBuf,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      report_base_url: DEFAULT_REPORT_BASE_URL.to_string(),
      report_site_url: DEFAULT_REPORT_SITE_URL.to_string(),
      reproducible_index_url: DEFAULT_REPRODUCIBLE_INDEX_URL.to_string(),
      snapshot_base_url: DEFAULT_SNAPSHOT_BASE_URL.to_string(),
      source_mirror: DEFAULT_SOURCE_MIRROR.to_string(),
      base_image: DEFAULT_BASE_IMAGE.to_string(),
      suites: DEFAULT_SUITES.iter().map(|s| s.to_string()).collect(),
      engine: DEFAULT_ENGINE.to_string(),
      tag_prefix: DEFAULT_TAG_PREFIX.to_string(),
      hash_command: DEFAULT_HASH_COMMAND.to_string(),
      work_dir: paths::work_dir(),
      log_dir: paths::logs_dir(),
      output: PathBuf::from(DEFAULT_OUTPUT),
    }
  }
}

impl Config {
  /// Load a config file. Missing keys take their defaults.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    Self::from_toml(&content).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })
  }

  pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
    toml::from_str(content)
  }

  /// Find and load the config for this run.
  ///
  /// An explicit path or `DEBREPRO_CONFIG` must exist; the default location
  /// is optional.
  pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
    if let Some(path) = explicit {
      debug!(path = %path.display(), "loading config");
      return Self::load(path);
    }

    if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
      let path = PathBuf::from(path);
      debug!(path = %path.display(), "loading config from environment");
      return Self::load(&path);
    }

    let default_path = paths::config_file();
    if default_path.is_file() {
      debug!(path = %default_path.display(), "loading config");
      return Self::load(&default_path);
    }

    debug!("no config file, using defaults");
    Ok(Self::default())
  }

  /// Settings the recipe builder needs.
  pub fn recipe_options(&self) -> RecipeOptions {
    RecipeOptions {
      base_image: self.base_image.clone(),
      suites: self.suites.clone(),
      source_mirror: self.source_mirror.clone(),
      snapshot_base_url: self.snapshot_base_url.clone(),
    }
  }
}
