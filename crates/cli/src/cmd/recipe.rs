//! Implementation of the `debrepro recipe` command.

use anyhow::{Context, Result};
use serde::Serialize;

use debrepro_lib::config::Config;
use debrepro_lib::verify::{PreparedBuild, Verifier};

use crate::output::{OutputFormat, format_bytes, print_info, print_json, print_stat, print_warning, truncate_hash};

#[derive(Debug, Serialize)]
struct RecipeOutput<'a> {
  package: &'a str,
  build_time: String,
  version: &'a str,
  artifact: &'a str,
  expected_hash: &'a str,
  size: Option<u64>,
  snapshots: Vec<String>,
  digest: String,
  recipe: String,
}

/// Fetch everything about `package` and print its recipe without building.
pub fn cmd_recipe(config: &Config, package: &str, output: OutputFormat) -> Result<()> {
  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let verifier = Verifier::from_config(config).context("Failed to set up verifier")?;

  let prepared = rt
    .block_on(verifier.prepare(package))
    .with_context(|| format!("Failed to prepare recipe for {}", package))?;

  if output.is_json() {
    print_json(&recipe_output(&prepared, &config.snapshot_base_url))?;
    return Ok(());
  }

  let report = &prepared.report;
  let info = &report.info;
  print_info(&format!("{} {} (built {})", report.package, info.version, report.build_time));
  print_stat("Artifact", &info.artifact);
  print_stat("Expected hash", truncate_hash(&info.expected_hash));
  if let Some(size) = info.artifact_size {
    print_stat("Size", &format_bytes(size));
  }
  print_stat("Dependencies", &info.dependencies.tokens().count().to_string());
  print_stat("Recipe digest", prepared.recipe.digest().short());
  if prepared.snapshots.is_empty() {
    print_warning("No snapshot precedes the build time; sources are not pinned");
  }
  for snapshot in &prepared.snapshots {
    print_stat("Snapshot", &snapshot.url(&config.snapshot_base_url));
  }

  println!();
  print!("{}", prepared.recipe.render());
  Ok(())
}

fn recipe_output<'a>(prepared: &'a PreparedBuild, snapshot_base_url: &str) -> RecipeOutput<'a> {
  let info = &prepared.report.info;
  RecipeOutput {
    package: &prepared.report.package,
    build_time: prepared.report.build_time.to_string(),
    version: &info.version,
    artifact: &info.artifact,
    expected_hash: &info.expected_hash,
    size: info.artifact_size,
    snapshots: prepared
      .snapshots
      .iter()
      .map(|snapshot| snapshot.url(snapshot_base_url))
      .collect(),
    digest: prepared.recipe.digest().to_string(),
    recipe: prepared.recipe.render(),
  }
}
