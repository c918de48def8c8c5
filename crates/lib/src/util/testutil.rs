//! Test doubles for debrepro-lib.
//!
//! These stand in for the network and the container engine so the pipeline
//! can be exercised without either.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::consts::RECIPE_FILENAME;
use crate::execute::{ContainerEngine, CpuClock, CpuTimes, ExecuteError};
use crate::fetch::{FetchError, PageSource};

/// Serves pages from memory.
#[derive(Debug, Default)]
pub struct CannedSource {
  pages: HashMap<String, String>,
  fetched: Mutex<Vec<String>>,
}

impl CannedSource {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_page(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
    self.pages.insert(url.into(), body.into());
    self
  }

  /// URLs requested so far, in order.
  pub fn fetched(&self) -> Vec<String> {
    self.fetched.lock().unwrap().clone()
  }
}

impl PageSource for CannedSource {
  async fn fetch(&self, url: &str) -> Result<String, FetchError> {
    self.fetched.lock().unwrap().push(url.to_string());
    self
      .pages
      .get(url)
      .cloned()
      .ok_or_else(|| FetchError::NotFound(url.to_string()))
  }
}

/// A build the fake engine was asked to run.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedBuild {
  pub tag: String,
  /// Recipe found in the build context.
  pub recipe: String,
  pub log: PathBuf,
}

/// Container engine that records calls and answers with canned output.
#[derive(Debug, Default)]
pub struct FakeEngine {
  build_fails: bool,
  hash_fails: bool,
  hash_output: String,
  per_artifact: HashMap<String, String>,
  builds: Mutex<Vec<RecordedBuild>>,
  hashed: Mutex<Vec<(String, String)>>,
}

impl FakeEngine {
  /// Every build succeeds and the hash command prints `output`.
  pub fn hashing(output: &str) -> Self {
    Self {
      hash_output: output.to_string(),
      ..Self::default()
    }
  }

  pub fn failing_build() -> Self {
    Self {
      build_fails: true,
      ..Self::default()
    }
  }

  pub fn failing_hash() -> Self {
    Self {
      hash_fails: true,
      ..Self::default()
    }
  }

  /// Answer `output` when `artifact` is hashed.
  pub fn with_artifact(mut self, artifact: &str, output: &str) -> Self {
    self.per_artifact.insert(artifact.to_string(), output.to_string());
    self
  }

  pub fn builds(&self) -> Vec<RecordedBuild> {
    self.builds.lock().unwrap().clone()
  }

  /// `(tag, artifact)` pairs hashed so far.
  pub fn hashed(&self) -> Vec<(String, String)> {
    self.hashed.lock().unwrap().clone()
  }
}

impl ContainerEngine for FakeEngine {
  async fn build_image(&self, context: &Path, tag: &str, log: &Path) -> Result<(), ExecuteError> {
    let recipe = std::fs::read_to_string(context.join(RECIPE_FILENAME))?;
    std::fs::write(log, format!("building {}\n", tag))?;
    self.builds.lock().unwrap().push(RecordedBuild {
      tag: tag.to_string(),
      recipe,
      log: log.to_path_buf(),
    });

    if self.build_fails {
      return Err(ExecuteError::CmdFailed {
        cmd: format!("fake build {}", tag),
        code: Some(1),
      });
    }
    Ok(())
  }

  async fn hash_artifact(&self, tag: &str, artifact: &str) -> Result<String, ExecuteError> {
    self
      .hashed
      .lock()
      .unwrap()
      .push((tag.to_string(), artifact.to_string()));

    if self.hash_fails {
      return Err(ExecuteError::CmdFailed {
        cmd: format!("fake run {}", tag),
        code: Some(1),
      });
    }
    Ok(
      self
        .per_artifact
        .get(artifact)
        .cloned()
        .unwrap_or_else(|| self.hash_output.clone()),
    )
  }
}

/// Clock that advances by a fixed step on every sample.
#[derive(Debug, Default)]
pub struct SteppingClock {
  step: CpuTimes,
  samples: AtomicU32,
}

impl SteppingClock {
  pub fn new(step: CpuTimes) -> Self {
    Self {
      step,
      samples: AtomicU32::new(0),
    }
  }
}

impl CpuClock for SteppingClock {
  fn sample(&self) -> CpuTimes {
    let n = f64::from(self.samples.fetch_add(1, Ordering::SeqCst) + 1);
    CpuTimes {
      user: self.step.user * n,
      system: self.step.system * n,
    }
  }
}
