//! Thin helpers over `scraper` for the few page queries debrepro needs.

use scraper::{ElementRef, Selector};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HtmlError {
  /// A CSS selector failed to compile.
  #[error("invalid selector '{selector}': {message}")]
  Selector { selector: String, message: String },
}

/// Compile a CSS selector.
pub fn selector(css: &str) -> Result<Selector, HtmlError> {
  Selector::parse(css).map_err(|e| HtmlError::Selector {
    selector: css.to_string(),
    message: e.to_string(),
  })
}

/// Concatenated text content of an element, trimmed.
pub fn text_of(element: &ElementRef<'_>) -> String {
  element.text().collect::<String>().trim().to_string()
}
