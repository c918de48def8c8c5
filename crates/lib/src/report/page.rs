//! Report page scraping.

use chrono::NaiveDateTime;
use scraper::Html;

use super::ReportError;
use crate::util::html::{selector, text_of};

/// Format of the build time shown in the report header.
pub const BUILD_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// What the report page says about the last build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPage {
  pub build_time: NaiveDateTime,
  /// Link to the build info document, usually relative to the site root.
  pub build_info_href: String,
}

/// Read build time and build info link from a report page.
///
/// The header carries `<span class="build-time">built 2017-11-02 12:34 in
/// 5min</span>`; the date and time are its second and third words.
pub fn parse_report_page(html: &str) -> Result<ReportPage, ReportError> {
  let document = Html::parse_document(html);

  let span = document
    .select(&selector("header span.build-time")?)
    .next()
    .ok_or(ReportError::MissingBuildTime)?;
  let text = text_of(&span);
  let stamp = text.split_whitespace().skip(1).take(2).collect::<Vec<_>>().join(" ");
  let build_time = NaiveDateTime::parse_from_str(&stamp, BUILD_TIME_FORMAT)
    .map_err(|source| ReportError::InvalidBuildTime { text, source })?;

  let build_info_href = document
    .select(&selector(r#"header a[title="Show: build info"]"#)?)
    .next()
    .and_then(|link| link.value().attr("href"))
    .ok_or(ReportError::MissingBuildInfoLink)?
    .to_string();

  Ok(ReportPage {
    build_time,
    build_info_href,
  })
}

/// Resolve a build info link against the site root.
pub fn build_info_url(site_url: &str, href: &str) -> String {
  if href.starts_with("http://") || href.starts_with("https://") {
    return href.to_string();
  }
  format!("{}/{}", site_url.trim_end_matches('/'), href.trim_start_matches('/'))
}

/// Plain text of a build info response.
///
/// Build info documents are normally served as text. When a server wraps them
/// in HTML, the text of the first `<pre>` (or of the whole page) is used.
pub fn build_info_text(body: &str) -> String {
  if !body.trim_start().starts_with('<') {
    return body.to_string();
  }

  let document = Html::parse_document(body);
  if let Ok(pre) = selector("pre") {
    if let Some(block) = document.select(&pre).next() {
      return block.text().collect();
    }
  }
  document.root_element().text().collect()
}
