//! Page retrieval.
//!
//! Report pages, build info documents and snapshot listings are all fetched
//! as text through [`PageSource`], so the pipeline can run against canned
//! pages in tests.

use std::future::Future;

use thiserror::Error;
use tracing::debug;

/// Errors that can occur while fetching a page.
#[derive(Debug, Error)]
pub enum FetchError {
  /// The HTTP client could not be constructed.
  #[error("failed to create HTTP client: {0}")]
  Client(#[source] reqwest::Error),

  /// The request failed before a response arrived, or the body was unreadable.
  #[error("request to {url} failed: {source}")]
  Request {
    url: String,
    #[source]
    source: reqwest::Error,
  },

  /// The server answered with a non-success status.
  #[error("request to {url} returned HTTP {status}")]
  Status { url: String, status: u16 },

  /// No page is known for the URL (canned sources only).
  #[error("no page for {0}")]
  NotFound(String),
}

/// Anything that can turn a URL into page text.
pub trait PageSource {
  fn fetch(&self, url: &str) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// Fetches pages over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSource {
  client: reqwest::Client,
}

impl HttpSource {
  pub fn new() -> Result<Self, FetchError> {
    let client = reqwest::Client::builder()
      .user_agent(concat!("debrepro/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(FetchError::Client)?;
    Ok(Self { client })
  }
}

impl PageSource for HttpSource {
  async fn fetch(&self, url: &str) -> Result<String, FetchError> {
    debug!(url = %url, "fetching page");

    let response = self.client.get(url).send().await.map_err(|source| FetchError::Request {
      url: url.to_string(),
      source,
    })?;

    let status = response.status();
    if !status.is_success() {
      return Err(FetchError::Status {
        url: url.to_string(),
        status: status.as_u16(),
      });
    }

    let body = response.text().await.map_err(|source| FetchError::Request {
      url: url.to_string(),
      source,
    })?;

    debug!(url = %url, bytes = body.len(), "page fetched");
    Ok(body)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn fetches_page_body() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
      .mock("GET", "/attr.html")
      .with_status(200)
      .with_body("<html>attr</html>")
      .create_async()
      .await;

    let source = HttpSource::new().unwrap();
    let body = source.fetch(&format!("{}/attr.html", server.url())).await.unwrap();

    assert_eq!(body, "<html>attr</html>");
    mock.assert_async().await;
  }

  #[tokio::test]
  async fn non_success_status_is_an_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server.mock("GET", "/missing.html").with_status(404).create_async().await;

    let source = HttpSource::new().unwrap();
    let result = source.fetch(&format!("{}/missing.html", server.url())).await;

    assert!(matches!(result, Err(FetchError::Status { status: 404, .. })));
  }

  #[tokio::test]
  async fn unreachable_host_is_a_request_error() {
    let source = HttpSource::new().unwrap();
    let result = source.fetch("http://127.0.0.1:1/nothing").await;

    assert!(matches!(result, Err(FetchError::Request { .. })));
  }
}
