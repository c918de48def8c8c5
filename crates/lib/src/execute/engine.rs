//! Container engine boundary.
//!
//! Two engine invocations make up a build:
//!
//! - `<engine> build --tag=<tag> --force-rm <context>` with all output sent
//!   to the package log
//! - `<engine> run --rm <tag> <hash command> <artifact>` with stdout captured
//!
//! Only the exit status of the first and the stdout of the second matter.

use std::fs::File;
use std::future::Future;
use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info};

use super::ExecuteError;

pub trait ContainerEngine {
  /// Build the image in `context`, tagged `tag`, writing engine output to `log`.
  fn build_image(&self, context: &Path, tag: &str, log: &Path) -> impl Future<Output = Result<(), ExecuteError>> + Send;

  /// Run the hash command on `artifact` inside `tag` and return its stdout.
  fn hash_artifact(&self, tag: &str, artifact: &str) -> impl Future<Output = Result<String, ExecuteError>> + Send;
}

/// Drives a docker-compatible CLI.
#[derive(Debug, Clone)]
pub struct EngineCli {
  binary: String,
  hash_command: String,
}

impl EngineCli {
  pub fn new(binary: impl Into<String>, hash_command: impl Into<String>) -> Self {
    Self {
      binary: binary.into(),
      hash_command: hash_command.into(),
    }
  }
}

impl ContainerEngine for EngineCli {
  async fn build_image(&self, context: &Path, tag: &str, log: &Path) -> Result<(), ExecuteError> {
    info!(tag = %tag, context = %context.display(), "building image");

    let stdout = File::create(log)?;
    let stderr = stdout.try_clone()?;

    let status = Command::new(&self.binary)
      .arg("build")
      .arg(format!("--tag={}", tag))
      .arg("--force-rm")
      .arg(context)
      .stdin(Stdio::null())
      .stdout(Stdio::from(stdout))
      .stderr(Stdio::from(stderr))
      .status()
      .await?;

    if !status.success() {
      return Err(ExecuteError::CmdFailed {
        cmd: format!("{} build --tag={}", self.binary, tag),
        code: status.code(),
      });
    }

    debug!(tag = %tag, log = %log.display(), "image built");
    Ok(())
  }

  async fn hash_artifact(&self, tag: &str, artifact: &str) -> Result<String, ExecuteError> {
    info!(tag = %tag, artifact = %artifact, "hashing artifact");

    let output = Command::new(&self.binary)
      .args(["run", "--rm", tag, &self.hash_command, artifact])
      .stdin(Stdio::null())
      .output()
      .await?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if !stderr.is_empty() {
        debug!(stderr = %stderr, "hash command stderr");
      }
      return Err(ExecuteError::CmdFailed {
        cmd: format!("{} run --rm {} {} {}", self.binary, tag, self.hash_command, artifact),
        code: output.status.code(),
      });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
  }
}

/// First whitespace-delimited field of hash command output.
pub fn extract_digest(stdout: &str) -> Option<String> {
  stdout.split_whitespace().next().map(str::to_string)
}
