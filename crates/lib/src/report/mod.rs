//! Published build reports.
//!
//! Every package tested by reproducible-builds.org has a report page carrying
//! the time of the last build and a link to the `.buildinfo` document of that
//! build. The page gives us *when*; the build info gives us *what*: version,
//! source package, the checksum of each produced `.deb` and the exact set of
//! installed build dependencies.
//!
//! - [`page`] reads the report page
//! - [`parse`] scans the build info text

pub mod page;
pub mod parse;
mod types;

pub use page::{build_info_text, build_info_url, parse_report_page};
pub use parse::{BuildInfoParser, parse_build_info};
pub use types::*;

/// URL of the report page for `package`.
pub fn report_url(base_url: &str, package: &str) -> String {
  format!("{}/{}.html", base_url.trim_end_matches('/'), package)
}
