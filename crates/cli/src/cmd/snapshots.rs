//! Implementation of the `debrepro snapshots` command.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;

use debrepro_lib::config::Config;
use debrepro_lib::report::page::BUILD_TIME_FORMAT;
use debrepro_lib::snapshot::SNAPSHOT_TIME_FORMAT;
use debrepro_lib::verify::Verifier;

use crate::output::{OutputFormat, print_info, print_json, print_stat, print_warning};

/// Parse a timestamp given on the command line, with or without seconds.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, String> {
  NaiveDateTime::parse_from_str(value, SNAPSHOT_TIME_FORMAT)
    .or_else(|_| NaiveDateTime::parse_from_str(value, BUILD_TIME_FORMAT))
    .map_err(|_| format!("expected 'YYYY-MM-DD HH:MM[:SS]', got '{}'", value))
}

/// Show which snapshots a build at `timestamp` would be pinned to.
pub fn cmd_snapshots(config: &Config, timestamp: NaiveDateTime, output: OutputFormat) -> Result<()> {
  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let verifier = Verifier::from_config(config).context("Failed to set up verifier")?;

  let selected = rt
    .block_on(verifier.find_snapshots(timestamp))
    .context("Failed to read snapshot listing")?;

  if output.is_json() {
    let urls: Vec<_> = selected
      .iter()
      .map(|snapshot| {
        serde_json::json!({
          "timestamp": snapshot.timestamp.to_string(),
          "url": snapshot.url(&config.snapshot_base_url),
        })
      })
      .collect();
    print_json(&urls)?;
    return Ok(());
  }

  if selected.is_empty() {
    print_warning(&format!("No snapshot precedes {}", timestamp));
    return Ok(());
  }

  print_info(&format!("Snapshots before {}:", timestamp));
  for snapshot in &selected {
    print_stat(&snapshot.timestamp.to_string(), &snapshot.url(&config.snapshot_base_url));
  }
  Ok(())
}
