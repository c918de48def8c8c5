//! Package sets to verify.
//!
//! Two fixed sets cover the base system: the `required` priority packages and
//! a selection of widely installed ones. The `random` set samples packages the
//! reproducible-builds index already lists as reproducible.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use rand::seq::SliceRandom;
use scraper::Html;
use thiserror::Error;
use tracing::{debug, info};

use crate::fetch::{FetchError, PageSource};
use crate::util::html::{HtmlError, selector, text_of};

/// Source packages of priority `required`.
pub const REQUIRED: &[&str] = &[
  "attr",
  "base-files",
  "base-passwd",
  "coreutils",
  "debconf",
  "debianutils",
  "diffutils",
  "dpkg",
  "findutils",
  "grep",
  "gzip",
  "init-system-helpers",
  "libselinux",
  "libsepol",
  "lsb",
  "mawk",
  "pam",
  "sed",
  "sysvinit",
  "pcre3",
  "perl",
  "tar",
  "util-linux",
  "zlib",
];

/// Frequently installed source packages.
pub const POPULAR: &[&str] = &[
  "hostname",
  "netbase",
  "adduser",
  "tzdata",
  "bsdmainutils",
  "cpio",
  "logrotate",
  "debian-archive-keyring",
  "liblocale-gettext-perl",
  "net-tools",
  "ucf",
  "popularity-contest",
  "cron",
  "manpages",
  "libtext-wrapi18n-perl",
  "iptables",
  "ifupdown",
  "man-db",
  "mime-support",
  "pciutils",
  "libxml2",
  "initramfs-tools",
  "libcap2",
  "dmidecode",
  "busybox",
  "file",
  "less",
  "ca-certificates",
  "psmisc",
  "nano",
  "tasksel",
  "insserv",
  "installation-report",
  "laptop-detect",
  "linux-base",
  "xml-core",
  "aptitude",
  "bzip2",
  "os-prober",
  "acpid",
  "discover-data",
  "bash-completion",
  "dictionaries-common",
  "eject",
];

#[derive(Debug, Error)]
pub enum PackagesError {
  #[error("failed to fetch package index: {0}")]
  Fetch(#[from] FetchError),

  #[error(transparent)]
  Html(#[from] HtmlError),

  #[error("package index lists no packages")]
  EmptyIndex,

  #[error("unknown package set '{0}' (expected required, popular or random)")]
  UnknownSet(String),
}

/// A named group of packages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageSet {
  Required,
  Popular,
  Random,
}

impl PackageSet {
  pub fn as_str(self) -> &'static str {
    match self {
      PackageSet::Required => "required",
      PackageSet::Popular => "popular",
      PackageSet::Random => "random",
    }
  }

  /// Members of a fixed set; `None` for the random set.
  pub fn fixed(self) -> Option<&'static [&'static str]> {
    match self {
      PackageSet::Required => Some(REQUIRED),
      PackageSet::Popular => Some(POPULAR),
      PackageSet::Random => None,
    }
  }
}

impl fmt::Display for PackageSet {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for PackageSet {
  type Err = PackagesError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "required" => Ok(PackageSet::Required),
      "popular" => Ok(PackageSet::Popular),
      "random" => Ok(PackageSet::Random),
      other => Err(PackagesError::UnknownSet(other.to_string())),
    }
  }
}

/// Package names linked from the reproducible index page, in page order.
pub fn parse_package_index(html: &str) -> Result<Vec<String>, PackagesError> {
  let document = Html::parse_document(html);
  let names = document
    .select(&selector("code a.package")?)
    .map(|anchor| text_of(&anchor))
    .filter(|name| !name.is_empty())
    .collect();
  Ok(names)
}

/// Pick up to `count` distinct names.
pub fn sample<R: Rng + ?Sized>(names: &[String], count: usize, rng: &mut R) -> Vec<String> {
  names.choose_multiple(rng, count).cloned().collect()
}

/// Resolve a set into package names.
///
/// Only the random set touches the network: it fetches `index_url` and samples
/// `count` names from it.
pub async fn resolve<S: PageSource>(
  set: PackageSet,
  source: &S,
  index_url: &str,
  count: usize,
) -> Result<Vec<String>, PackagesError> {
  if let Some(fixed) = set.fixed() {
    return Ok(fixed.iter().map(|name| name.to_string()).collect());
  }

  let page = source.fetch(index_url).await?;
  let all = parse_package_index(&page)?;
  if all.is_empty() {
    return Err(PackagesError::EmptyIndex);
  }
  debug!(available = all.len(), "package index parsed");

  let picked = sample(&all, count, &mut rand::thread_rng());
  info!(set = %set, packages = ?picked, "sampled packages");
  Ok(picked)
}
