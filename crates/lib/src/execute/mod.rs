//! Build execution.
//!
//! [`BuildExecutor`] takes a finished recipe through the container engine and
//! reports the digest of the rebuilt artifact together with how long it took.
//! Failures never propagate: a build that cannot produce a digest yields
//! [`BuildMeasurement::failed`] and the run moves on to the next package.

pub mod clock;
pub mod engine;
pub mod types;
pub mod workspace;

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use tracing::{info, warn};

use crate::config::Config;
use crate::recipe::BuildRecipe;

pub use clock::{CpuClock, CpuTimes, ProcessCpuClock};
pub use engine::{ContainerEngine, EngineCli, extract_digest};
pub use types::{BuildMeasurement, ExecuteError, round_millis};
pub use workspace::PackageWorkspace;

/// Image tag for `package`: `<prefix>:<package>`, with characters image
/// references do not allow replaced by `_`.
pub fn image_tag(prefix: &str, package: &str) -> String {
  let name: String = package
    .chars()
    .map(|c| {
      if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
        c.to_ascii_lowercase()
      } else {
        '_'
      }
    })
    .collect();
  format!("{}:{}", prefix, name)
}

pub struct BuildExecutor<E, C> {
  engine: E,
  clock: C,
  work_dir: PathBuf,
  log_dir: PathBuf,
  tag_prefix: String,
}

impl BuildExecutor<EngineCli, ProcessCpuClock> {
  /// Executor driving the configured engine CLI.
  pub fn from_config(config: &Config) -> Self {
    Self::new(
      EngineCli::new(&config.engine, &config.hash_command),
      ProcessCpuClock,
      config,
    )
  }
}

impl<E: ContainerEngine, C: CpuClock> BuildExecutor<E, C> {
  pub fn new(engine: E, clock: C, config: &Config) -> Self {
    Self {
      engine,
      clock,
      work_dir: config.work_dir.clone(),
      log_dir: config.log_dir.clone(),
      tag_prefix: config.tag_prefix.clone(),
    }
  }

  pub fn engine(&self) -> &E {
    &self.engine
  }

  /// Where the build output of `package` is logged.
  pub fn log_path(&self, package: &str) -> PathBuf {
    self.log_dir.join(format!("{}.log", package))
  }

  /// Build `recipe` and hash `artifact` inside the resulting image.
  ///
  /// `artifact` is resolved relative to the image's final working directory.
  pub async fn execute(&self, recipe: &BuildRecipe, package: &str, artifact: &str) -> BuildMeasurement {
    match self.try_execute(recipe, package, artifact).await {
      Ok(measurement) => measurement,
      Err(e) => {
        warn!(package = %package, error = %e, "error while building");
        BuildMeasurement::failed()
      }
    }
  }

  async fn try_execute(
    &self,
    recipe: &BuildRecipe,
    package: &str,
    artifact: &str,
  ) -> Result<BuildMeasurement, ExecuteError> {
    let workspace = PackageWorkspace::create(&self.work_dir, package, recipe)?;
    fs::create_dir_all(&self.log_dir)?;
    let log = self.log_path(package);
    let tag = image_tag(&self.tag_prefix, package);

    let wall_start = Instant::now();
    let cpu_start = self.clock.sample();

    self.engine.build_image(workspace.path(), &tag, &log).await?;
    let stdout = self.engine.hash_artifact(&tag, artifact).await?;
    let hash = extract_digest(&stdout).ok_or_else(|| ExecuteError::NoDigest { tag: tag.clone() })?;

    let cpu = self.clock.sample().since(cpu_start);
    let wall = wall_start.elapsed().as_secs_f64();

    info!(package = %package, hash = %hash, wall_time = wall, "artifact hashed");

    Ok(BuildMeasurement {
      hash,
      wall_time: round_millis(wall),
      cpu_user: round_millis(cpu.user),
      cpu_system: round_millis(cpu.system),
    })
  }
}
