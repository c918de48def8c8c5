//! Build recipes.
//!
//! A recipe is the Dockerfile that recreates the original build environment of
//! one package. Its instructions always come in the same order:
//!
//! 1. bootstrap: base image and `deb-src` entries
//! 2. snapshot-pinned `deb` entries
//! 3. apt update and the exact dependency install
//! 4. `apt-get source` of the exact version
//! 5. `dpkg-buildpackage`
//!
//! Reordering would change what gets installed and when, so the order is fixed
//! by [`build_recipe`] and not configurable.

pub mod templates;

use serde::{Deserialize, Serialize};

use crate::consts::PROJECT_DIR;
use crate::report::BuildReport;
use crate::snapshot::SnapshotRef;
use crate::util::hash::{ContentHash, hash_bytes};

use templates::{APT_INSTALL, BOOTSTRAP_ENV, BUILD_COMMAND, BUILD_TOOLS, CLOSER, NO_CHECK_VALID_UNTIL, SOURCES_LIST};

/// Settings that shape every recipe of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeOptions {
  pub base_image: String,
  /// Each snapshot is added once per suite, in this order.
  pub suites: Vec<String>,
  /// Live mirror used for `deb-src` entries.
  pub source_mirror: String,
  pub snapshot_base_url: String,
}

/// One line-level Dockerfile instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
  From(String),
  Env { key: String, value: String },
  /// Shell commands joined with `&&` in a single layer.
  Run(Vec<String>),
  Workdir(String),
}

impl std::fmt::Display for Instruction {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Instruction::From(image) => write!(f, "FROM {}", image),
      Instruction::Env { key, value } => write!(f, "ENV {}={}", key, value),
      Instruction::Run(commands) => write!(f, "RUN {}", commands.join(" \\\n && ")),
      Instruction::Workdir(dir) => write!(f, "WORKDIR {}", dir),
    }
  }
}

/// The complete, ordered recipe for one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRecipe {
  instructions: Vec<Instruction>,
}

impl BuildRecipe {
  pub fn instructions(&self) -> &[Instruction] {
    &self.instructions
  }

  /// Render as Dockerfile text.
  pub fn render(&self) -> String {
    let mut out = String::new();
    for instruction in &self.instructions {
      out.push_str(&instruction.to_string());
      out.push('\n');
    }
    out
  }

  /// SHA-256 of the rendered recipe.
  pub fn digest(&self) -> ContentHash {
    hash_bytes(self.render().as_bytes())
  }
}

impl std::fmt::Display for BuildRecipe {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.render())
  }
}

fn append_source(kind: &str, url: &str, suite: &str) -> String {
  format!("echo '{} {} {} main' >> {}", kind, url, suite, SOURCES_LIST)
}

/// Source instructions for the selected snapshots, two per snapshot.
pub fn snapshot_sources(options: &RecipeOptions, snapshots: &[SnapshotRef]) -> Vec<String> {
  snapshots
    .iter()
    .flat_map(|snapshot| {
      let url = snapshot.url(&options.snapshot_base_url);
      options
        .suites
        .iter()
        .map(move |suite| append_source("deb", &url, suite))
    })
    .collect()
}

/// Assemble the recipe for `report`, pinned to `snapshots`.
///
/// With no snapshots the recipe still builds, but against whatever the live
/// mirror serves, so the result is best-effort only.
pub fn build_recipe(options: &RecipeOptions, report: &BuildReport, snapshots: &[SnapshotRef]) -> BuildRecipe {
  let info = &report.info;
  let mut instructions = vec![Instruction::From(options.base_image.clone())];

  for (key, value) in BOOTSTRAP_ENV {
    instructions.push(Instruction::Env {
      key: key.to_string(),
      value: value.to_string(),
    });
  }

  instructions.push(Instruction::Run(
    options
      .suites
      .iter()
      .map(|suite| append_source("deb-src", &options.source_mirror, suite))
      .collect(),
  ));

  let pinned = snapshot_sources(options, snapshots);
  if !pinned.is_empty() {
    instructions.push(Instruction::Run(pinned));
  }

  let mut install = vec![
    NO_CHECK_VALID_UNTIL.to_string(),
    "apt-get update".to_string(),
    format!("{} {}", APT_INSTALL, BUILD_TOOLS.join(" ")),
  ];
  if !info.dependencies.is_empty() {
    install.push(format!("{} {}", APT_INSTALL, info.dependencies));
  }
  instructions.push(Instruction::Run(install));
  instructions.push(Instruction::Run(vec![CLOSER.to_string()]));

  instructions.push(Instruction::Workdir(PROJECT_DIR.to_string()));
  instructions.push(Instruction::Run(vec![format!(
    "apt-get source {}={}",
    info.source_package, info.version
  )]));
  instructions.push(Instruction::Workdir(format!("{}/{}/", PROJECT_DIR, info.unpacked_dir())));
  instructions.push(Instruction::Run(vec![BUILD_COMMAND.to_string()]));
  instructions.push(Instruction::Workdir(PROJECT_DIR.to_string()));

  BuildRecipe { instructions }
}
