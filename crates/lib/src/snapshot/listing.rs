//! Monthly snapshot listing page.
//!
//! `http://snapshot.debian.org/archive/debian/?year=2017;month=11` lists every
//! snapshot of the month as links inside the first paragraph of the body:
//!
//! ```html
//! <p><a href="20171101T034813Z/">2017-11-01 03:48:13</a><br /> ...</p>
//! ```

use chrono::{Datelike, NaiveDateTime};
use scraper::Html;
use tracing::debug;

use super::{ListingError, SNAPSHOT_TIME_FORMAT, SnapshotRef};
use crate::util::html::{selector, text_of};

/// URL of the listing page covering the month of `build_time`.
pub fn listing_url(base_url: &str, build_time: NaiveDateTime) -> String {
  format!(
    "{}/?year={:04};month={:02}",
    base_url.trim_end_matches('/'),
    build_time.year(),
    build_time.month()
  )
}

/// Parse the listing page into snapshot references, in page order.
///
/// Links whose text is not a snapshot timestamp, or that have no `href`, are
/// skipped.
pub fn parse_listing(html: &str) -> Result<Vec<SnapshotRef>, ListingError> {
  let document = Html::parse_document(html);
  let list = document
    .select(&selector("body p")?)
    .next()
    .ok_or(ListingError::MissingList)?;

  let link = selector("a")?;
  let mut entries = Vec::new();

  for anchor in list.select(&link) {
    let text = text_of(&anchor);
    let Ok(timestamp) = NaiveDateTime::parse_from_str(&text, SNAPSHOT_TIME_FORMAT) else {
      debug!(text = %text, "skipping non-snapshot link");
      continue;
    };
    let Some(href) = anchor.value().attr("href") else {
      continue;
    };
    entries.push(SnapshotRef::new(timestamp, href));
  }

  Ok(entries)
}
