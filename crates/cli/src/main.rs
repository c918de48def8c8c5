//! debrepro: rebuild Debian packages and check that they are reproducible.

mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use debrepro_lib::config::Config;
use debrepro_lib::consts::DEFAULT_RANDOM_SAMPLE;

use cmd::{SetArg, cmd_recipe, cmd_snapshots, cmd_verify, parse_timestamp};
use output::OutputFormat;

/// Rebuild Debian packages from source and compare against published checksums
#[derive(Parser)]
#[command(name = "debrepro")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Config file (default: ~/.config/debrepro/config.toml)
  #[arg(short, long, global = true)]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Rebuild packages and classify each against its published hash
  Verify {
    /// Packages to verify (default: the packages of --set)
    packages: Vec<String>,

    /// Package set used when no packages are given
    #[arg(short, long, value_enum, default_value = "required")]
    set: SetArg,

    /// Number of packages drawn from the random set
    #[arg(long, default_value_t = DEFAULT_RANDOM_SAMPLE)]
    sample: usize,

    /// Where to write the CSV report (overrides the config)
    #[arg(long)]
    report: Option<PathBuf>,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },

  /// Print the recipe that would rebuild a package, without building it
  Recipe {
    /// Package to prepare
    package: String,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },

  /// Show the snapshots that would be pinned for a build time
  Snapshots {
    /// Build time, "YYYY-MM-DD HH:MM[:SS]"
    #[arg(value_parser = parse_timestamp)]
    timestamp: NaiveDateTime,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },
}

fn init_tracing(verbose: bool) {
  let default = if verbose {
    "debrepro=debug,debrepro_lib=debug"
  } else {
    "debrepro=info,debrepro_lib=info"
  };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}

fn main() -> Result<()> {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let config = Config::discover(cli.config.as_deref()).context("Failed to load config")?;

  match cli.command {
    Commands::Verify {
      packages,
      set,
      sample,
      report,
      output,
    } => cmd_verify(&config, packages, set, sample, report, output),
    Commands::Recipe { package, output } => cmd_recipe(&config, &package, output),
    Commands::Snapshots { timestamp, output } => cmd_snapshots(&config, timestamp, output),
  }
}
