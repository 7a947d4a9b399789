use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
  pub title: String,
  pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageDetails {
  pub title: String,
  pub description: String,
  /// Absolute URLs of downloadable resources (images) on the page.
  pub resources: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Download {
  pub url: String,
  pub content_type: Option<String>,
  pub bytes: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum WebError {
  #[error("invalid URL '{url}': {source}")]
  InvalidUrl {
    url: String,
    #[source]
    source: url::ParseError,
  },

  #[error("request to '{url}' failed: {source}")]
  Request {
    url: String,
    #[source]
    source: reqwest::Error,
  },

  #[error("'{url}' answered HTTP {status}")]
  Status { url: String, status: u16 },

  #[error("'{url}' is not an image (content type: {content_type})")]
  NotAnImage { url: String, content_type: String },

  #[error("hash mismatch for '{url}': expected {expected}, got {actual}")]
  HashMismatch {
    url: String,
    expected: String,
    actual: String,
  },

  #[error("failed to build HTTP client: {0}")]
  Client(#[source] reqwest::Error),
}
