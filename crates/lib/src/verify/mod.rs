//! The verification pipeline.
//!
//! For every package: read the report page, pick the snapshots preceding the
//! original build, read the build info, assemble the recipe, rebuild, hash
//! and classify. Packages are processed one after another and each one ends
//! up as exactly one [`OutcomeRecord`], whatever goes wrong along the way.

use chrono::NaiveDateTime;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::execute::{BuildExecutor, ContainerEngine, CpuClock, EngineCli, ProcessCpuClock};
use crate::fetch::{FetchError, HttpSource, PageSource};
use crate::outcome::{OutcomeRecord, Results};
use crate::recipe::{BuildRecipe, RecipeOptions, build_recipe};
use crate::report::{
  BuildReport, ReportError, build_info_text, build_info_url, parse_build_info, parse_report_page, report_url,
};
use crate::snapshot::{ListingError, SnapshotRef, listing_url, parse_listing, select_snapshots};

/// Errors that stop the processing of a single package.
#[derive(Debug, Error)]
pub enum VerifyError {
  #[error(transparent)]
  Fetch(#[from] FetchError),

  #[error("failed to read report page: {0}")]
  Report(#[from] ReportError),

  #[error("failed to read snapshot listing: {0}")]
  Listing(#[from] ListingError),
}

/// Everything needed to rebuild one package, before building it.
#[derive(Debug, Clone)]
pub struct PreparedBuild {
  pub report: BuildReport,
  pub snapshots: Vec<SnapshotRef>,
  pub recipe: BuildRecipe,
}

/// Drives packages through the pipeline.
pub struct Verifier<S, E, C> {
  source: S,
  executor: BuildExecutor<E, C>,
  options: RecipeOptions,
  report_base_url: String,
  report_site_url: String,
  snapshot_base_url: String,
}

impl Verifier<HttpSource, EngineCli, ProcessCpuClock> {
  /// Verifier fetching over HTTP and building with the configured engine.
  pub fn from_config(config: &Config) -> Result<Self, VerifyError> {
    Ok(Self::new(HttpSource::new()?, BuildExecutor::from_config(config), config))
  }
}

impl<S: PageSource, E: ContainerEngine, C: CpuClock> Verifier<S, E, C> {
  pub fn new(source: S, executor: BuildExecutor<E, C>, config: &Config) -> Self {
    Self {
      source,
      executor,
      options: config.recipe_options(),
      report_base_url: config.report_base_url.clone(),
      report_site_url: config.report_site_url.clone(),
      snapshot_base_url: config.snapshot_base_url.clone(),
    }
  }

  pub fn source(&self) -> &S {
    &self.source
  }

  pub fn executor(&self) -> &BuildExecutor<E, C> {
    &self.executor
  }

  /// Read the report page and build info of `package`.
  pub async fn fetch_report(&self, package: &str) -> Result<BuildReport, VerifyError> {
    let page = self.source.fetch(&report_url(&self.report_base_url, package)).await?;
    let page = parse_report_page(&page)?;
    debug!(package = %package, build_time = %page.build_time, "report page parsed");

    let url = build_info_url(&self.report_site_url, &page.build_info_href);
    let body = self.source.fetch(&url).await?;
    let info = parse_build_info(package, &build_info_text(&body));
    debug!(
      package = %package,
      version = %info.version,
      artifact = %info.artifact,
      dependencies = info.dependencies.tokens().count(),
      "build info parsed"
    );

    Ok(BuildReport {
      package: package.to_string(),
      build_time: page.build_time,
      info,
    })
  }

  /// Snapshots to pin for a build that ran at `build_time`.
  ///
  /// Only the listing of the build's own month is consulted, so a build early
  /// in the month may get fewer than two snapshots or none at all.
  pub async fn find_snapshots(&self, build_time: NaiveDateTime) -> Result<Vec<SnapshotRef>, VerifyError> {
    let page = self
      .source
      .fetch(&listing_url(&self.snapshot_base_url, build_time))
      .await?;
    let entries = parse_listing(&page)?;
    let selected = select_snapshots(build_time, &entries);

    if selected.is_empty() {
      warn!(
        build_time = %build_time,
        "build predates the first snapshot of the month, building without pinned sources"
      );
    }
    Ok(selected)
  }

  /// Fetch everything about `package` and assemble its recipe.
  pub async fn prepare(&self, package: &str) -> Result<PreparedBuild, VerifyError> {
    let report = self.fetch_report(package).await?;
    let snapshots = self.find_snapshots(report.build_time).await?;
    let recipe = build_recipe(&self.options, &report, &snapshots);
    info!(
      package = %package,
      snapshots = snapshots.len(),
      recipe = %recipe.digest().short(),
      "recipe assembled"
    );

    Ok(PreparedBuild {
      report,
      snapshots,
      recipe,
    })
  }

  /// Rebuild `package` and classify the result.
  pub async fn verify_package(&self, package: &str) -> OutcomeRecord {
    let prepared = match self.prepare(package).await {
      Ok(prepared) => prepared,
      Err(e) => {
        warn!(package = %package, error = %e, "could not prepare build");
        return OutcomeRecord::failed(package);
      }
    };

    let info = &prepared.report.info;
    let measurement = self.executor.execute(&prepared.recipe, package, &info.artifact).await;
    let record = OutcomeRecord::from_measurement(
      package,
      &info.artifact,
      info.artifact_size,
      &info.expected_hash,
      &measurement,
    );
    info!(package = %package, outcome = %record.outcome, "package verified");
    record
  }

  /// Verify every package in order.
  pub async fn run(&self, packages: &[String]) -> Results {
    let mut results = Results::new();
    for (index, package) in packages.iter().enumerate() {
      info!(package = %package, "[{}/{}] verifying", index + 1, packages.len());
      results.push(self.verify_package(package).await);
    }
    results
  }
}
