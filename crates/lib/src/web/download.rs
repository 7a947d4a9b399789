//! Checks applied to downloads before they are stored in memory.

use sha2::{Digest, Sha256};

use super::types::{Download, WebError};

/// Reject downloads whose content type is not `image/*`.
pub fn ensure_image(download: &Download) -> Result<(), WebError> {
  match download.content_type.as_deref() {
    Some(content_type) if content_type.trim().to_ascii_lowercase().starts_with("image/") => Ok(()),
    other => Err(WebError::NotAnImage {
      url: download.url.clone(),
      content_type: other.unwrap_or("unknown").to_string(),
    }),
  }
}

/// Verify the SHA256 of the downloaded bytes (lowercase or uppercase hex).
pub fn verify_sha256(download: &Download, expected: &str) -> Result<(), WebError> {
  let actual = sha256_hex(&download.bytes);
  if actual.eq_ignore_ascii_case(expected.trim()) {
    Ok(())
  } else {
    Err(WebError::HashMismatch {
      url: download.url.clone(),
      expected: expected.to_string(),
      actual,
    })
  }
}

pub fn sha256_hex(bytes: &[u8]) -> String {
  let mut hasher = Sha256::new();
  hasher.update(bytes);
  hex::encode(hasher.finalize())
}

/// Convert a URL to a safe entry name.
///
/// Takes the last path component and sanitizes it. Falls back to hash of URL
/// if no suitable name can be extracted.
pub fn url_to_filename(url: &str) -> String {
  let without_query = url.split(['?', '#']).next().unwrap_or(url);

  if let Some(filename) = without_query.rsplit('/').next() {
    // Sanitize: only allow alphanumeric, dash, underscore, dot
    let sanitized: String = filename
      .chars()
      .map(|c| {
        if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
          c
        } else {
          '_'
        }
      })
      .collect();

    if !sanitized.is_empty() && sanitized != "." && sanitized != ".." {
      return sanitized;
    }
  }

  format!("download_{}", &sha256_hex(url.as_bytes())[..16])
}
