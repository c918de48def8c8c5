//! Implementation of the `debrepro verify` command.
//!
//! Rebuilds every requested package, writes the CSV report and prints which
//! packages matched, differed or failed.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::ValueEnum;
use tracing::info;

use debrepro_lib::config::Config;
use debrepro_lib::outcome::{Outcome, OutcomeRecord, Results};
use debrepro_lib::packages::{PackageSet, resolve};
use debrepro_lib::verify::Verifier;

use crate::output::{
  OutputFormat, format_seconds, print_info, print_json, print_stat, print_success, print_warning, symbols,
};

/// Package set selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SetArg {
  /// Packages of priority required
  Required,
  /// Widely installed packages
  Popular,
  /// A sample of packages listed as reproducible
  Random,
}

impl From<SetArg> for PackageSet {
  fn from(arg: SetArg) -> Self {
    match arg {
      SetArg::Required => PackageSet::Required,
      SetArg::Popular => PackageSet::Popular,
      SetArg::Random => PackageSet::Random,
    }
  }
}

/// Execute the verify command.
///
/// Explicit packages take precedence over the package set. The report is
/// written to `report`, or to the configured output path.
pub fn cmd_verify(
  config: &Config,
  packages: Vec<String>,
  set: SetArg,
  sample: usize,
  report: Option<PathBuf>,
  output: OutputFormat,
) -> Result<()> {
  let start = Instant::now();

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let verifier = Verifier::from_config(config).context("Failed to set up verifier")?;

  let packages = if packages.is_empty() {
    let set = PackageSet::from(set);
    rt.block_on(resolve(set, verifier.source(), &config.reproducible_index_url, sample))
      .with_context(|| format!("Failed to resolve package set '{}'", set))?
  } else {
    packages
  };

  if packages.is_empty() {
    print_warning("No packages to verify");
    return Ok(());
  }
  info!(count = packages.len(), "verifying packages");

  let results = rt.block_on(verifier.run(&packages));

  let path = report.unwrap_or_else(|| config.output.clone());
  results
    .save(&path)
    .with_context(|| format!("Failed to write report to {}", path.display()))?;

  if output.is_json() {
    print_json(&results)?;
  } else {
    print_summary(&results, &path, start.elapsed());
  }

  Ok(())
}

fn print_summary(results: &Results, report: &Path, elapsed: Duration) {
  println!();
  print_success(&format!("Verified {} package(s)", results.len()));
  print_stat("Matched", &results.matched().len().to_string());
  print_stat("Differ", &results.differ().len().to_string());
  print_stat("Failed", &results.failed().len().to_string());
  print_stat("Report", &report.display().to_string());
  print_stat(
    "Duration",
    &humantime::format_duration(Duration::from_secs(elapsed.as_secs())).to_string(),
  );

  for outcome in [Outcome::Match, Outcome::Differ, Outcome::Failed] {
    let records = results.bucket(outcome);
    if records.is_empty() {
      continue;
    }
    println!();
    print_info(&format!("{} ({}):", heading(outcome), records.len()));
    for record in records {
      println!("  {}", summary_line(record));
    }
  }
}

fn heading(outcome: Outcome) -> &'static str {
  match outcome {
    Outcome::Match => "Reproducible",
    Outcome::Differ => "Not reproducible",
    Outcome::Failed => "Failed to build",
  }
}

fn summary_line(record: &OutcomeRecord) -> String {
  let symbol = match record.outcome {
    Outcome::Match => symbols::SUCCESS,
    Outcome::Differ => symbols::ERROR,
    Outcome::Failed => symbols::WARNING,
  };

  if record.binary.is_empty() {
    return format!("{} {}", symbol, record.package);
  }
  format!(
    "{} {} {} {} ({})",
    symbol,
    record.package,
    symbols::ARROW,
    record.binary,
    format_seconds(record.wall_time)
  )
}
