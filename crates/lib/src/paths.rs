//! Platform directories for config, logs and build workspaces.

use std::path::PathBuf;

use crate::consts::{APP_NAME, CONFIG_FILENAME};

/// Returns the directory for configuration files for the application
pub fn config_dir() -> PathBuf {
  dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join(APP_NAME)
}

/// Returns the directory for data files for the application
pub fn data_dir() -> PathBuf {
  dirs::data_local_dir()
    .unwrap_or_else(|| PathBuf::from("."))
    .join(APP_NAME)
}

/// Returns the directory for cache files for the application
pub fn cache_dir() -> PathBuf {
  dirs::cache_dir().unwrap_or_else(|| PathBuf::from(".")).join(APP_NAME)
}

/// Default location of the config file.
pub fn config_file() -> PathBuf {
  config_dir().join(CONFIG_FILENAME)
}

/// Per-package build logs.
pub fn logs_dir() -> PathBuf {
  data_dir().join("logs")
}

/// Parent of the per-package build workspaces.
pub fn work_dir() -> PathBuf {
  cache_dir().join("work")
}
