use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, info};
use url::Url;

use super::html;
use super::types::{Download, PageDetails, SearchResult, WebError};

/// DuckDuckGo's script-free results page.
pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://duckduckgo.com/html/";

const USER_AGENT: &str =
  "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Placeholder when a page has no meta description.
pub const NO_DESCRIPTION: &str = "No Description";

/// Search, page summaries and downloads.
pub trait FetchService {
  fn search(&self, query: &str) -> Result<Vec<SearchResult>, WebError>;
  fn fetch_page(&self, url: &str) -> Result<PageDetails, WebError>;
  fn download(&self, url: &str) -> Result<Download, WebError>;
}

/// Blocking HTTP implementation of [`FetchService`].
#[derive(Debug, Clone)]
pub struct HttpFetcher {
  client: Client,
  search_endpoint: Url,
}

impl HttpFetcher {
  pub fn new() -> Result<Self, WebError> {
    let client = Client::builder()
      .user_agent(USER_AGENT)
      .timeout(REQUEST_TIMEOUT)
      .build()
      .map_err(WebError::Client)?;
    Ok(Self::with_client(client))
  }

  pub fn with_client(client: Client) -> Self {
    Self {
      client,
      search_endpoint: Url::parse(DEFAULT_SEARCH_ENDPOINT).expect("default search endpoint is a valid URL"),
    }
  }

  pub fn with_search_endpoint(mut self, endpoint: Url) -> Self {
    self.search_endpoint = endpoint;
    self
  }

  fn get(&self, url: &Url) -> Result<Response, WebError> {
    let response = self.client.get(url.as_str()).send().map_err(|source| WebError::Request {
      url: url.to_string(),
      source,
    })?;

    if !response.status().is_success() {
      return Err(WebError::Status {
        url: url.to_string(),
        status: response.status().as_u16(),
      });
    }

    Ok(response)
  }
}

impl FetchService for HttpFetcher {
  fn search(&self, query: &str) -> Result<Vec<SearchResult>, WebError> {
    let mut url = self.search_endpoint.clone();
    url.query_pairs_mut().append_pair("q", query);
    info!(query = %query, "searching");

    let body = self.get(&url)?.text().map_err(|source| WebError::Request {
      url: url.to_string(),
      source,
    })?;

    let results = parse_search_results(&body);
    debug!(count = results.len(), "parsed search results");
    Ok(results)
  }

  fn fetch_page(&self, url: &str) -> Result<PageDetails, WebError> {
    let url = parse_url(url)?;
    info!(url = %url, "fetching page");

    let response = self.get(&url)?;
    let base = response.url().clone();
    let body = response.text().map_err(|source| WebError::Request {
      url: url.to_string(),
      source,
    })?;

    Ok(parse_page(&base, &body))
  }

  fn download(&self, url: &str) -> Result<Download, WebError> {
    let url = parse_url(url)?;
    info!(url = %url, "downloading");

    let response = self.get(&url)?;
    let content_type = response
      .headers()
      .get(CONTENT_TYPE)
      .and_then(|v| v.to_str().ok())
      .map(str::to_string);
    let bytes = response.bytes().map_err(|source| WebError::Request {
      url: url.to_string(),
      source,
    })?;

    info!(url = %url, size = bytes.len(), "download complete");
    Ok(Download {
      url: url.to_string(),
      content_type,
      bytes: bytes.to_vec(),
    })
  }
}

/// Extract `(title, url)` pairs from a DuckDuckGo results page.
pub fn parse_search_results(body: &str) -> Vec<SearchResult> {
  html::anchors_with_class(body, "result__a")
    .into_iter()
    .map(|(title, href)| SearchResult {
      title,
      url: unwrap_result_link(&href),
    })
    .collect()
}

/// Summarize a page: title, description and absolute image URLs.
pub fn parse_page(base: &Url, body: &str) -> PageDetails {
  let title = html::title(body)
    .or_else(|| html::first_text_line(body))
    .unwrap_or_default();
  let description = html::meta_description(body).unwrap_or_else(|| NO_DESCRIPTION.to_string());

  let mut resources: Vec<String> = Vec::new();
  for src in html::image_sources(body) {
    if let Some(resolved) = resolve_resource(base, &src)
      && !resources.contains(&resolved)
    {
      resources.push(resolved);
    }
  }

  PageDetails {
    title,
    description,
    resources,
  }
}

/// Turn a result link into the destination URL.
///
/// DuckDuckGo wraps results in a redirect whose `uddg` parameter holds the
/// real target. Scheme-relative and scheme-less links get `https://`.
pub fn unwrap_result_link(href: &str) -> String {
  let href = with_scheme(href);

  if let Ok(parsed) = Url::parse(&href)
    && parsed.host_str().is_some_and(|h| h == "duckduckgo.com" || h.ends_with(".duckduckgo.com"))
    && let Some((_, target)) = parsed.query_pairs().find(|(k, _)| k == "uddg")
  {
    return with_scheme(&target);
  }

  href
}

/// Resolve an `<img src>` against the page URL. `data:` URIs are skipped.
pub fn resolve_resource(base: &Url, src: &str) -> Option<String> {
  let src = src.trim();
  if src.starts_with("data:") {
    return None;
  }
  if let Some(rest) = src.strip_prefix("//") {
    return Some(format!("{}://{}", base.scheme(), rest));
  }
  base.join(src).ok().map(String::from)
}

fn with_scheme(url: &str) -> String {
  if let Some(rest) = url.strip_prefix("//") {
    format!("https://{}", rest)
  } else if url.starts_with("http://") || url.starts_with("https://") {
    url.to_string()
  } else {
    format!("https://{}", url)
  }
}

fn parse_url(url: &str) -> Result<Url, WebError> {
  let normalized = with_scheme(url.trim());
  Url::parse(&normalized).map_err(|source| WebError::InvalidUrl {
    url: url.to_string(),
    source,
  })
}

/// Whether a TCP connection to `host:port` can be opened within `timeout`.
pub fn check_connectivity(host: &str, port: u16, timeout: Duration) -> bool {
  let addrs = match (host, port).to_socket_addrs() {
    Ok(addrs) => addrs,
    Err(e) => {
      debug!(host = %host, error = %e, "could not resolve host");
      return false;
    }
  };

  for addr in addrs {
    match TcpStream::connect_timeout(&addr, timeout) {
      Ok(_) => return true,
      Err(e) => debug!(addr = %addr, error = %e, "connection attempt failed"),
    }
  }
  false
}
