//! Browser mode: web search, page scraping and downloads.
//!
//! Network access sits behind the [`FetchService`] trait. [`HttpFetcher`]
//! is the blocking `reqwest` implementation; everything that interprets
//! HTML lives in [`html`] and is tested without a network.

pub mod download;
pub mod fetcher;
pub mod html;
pub mod types;

pub use download::{ensure_image, url_to_filename, verify_sha256};
pub use fetcher::{FetchService, HttpFetcher, check_connectivity};
pub use types::{Download, PageDetails, SearchResult, WebError};
