use std::fmt;
use std::io;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;
use zip::CompressionMethod;
use zip::result::ZipError;

/// Compression applied to entries written by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
  /// Raw bytes, no compression.
  Stored,
  /// Deflate, the zip default.
  #[default]
  Deflated,
}

impl Compression {
  pub(crate) fn method(self) -> CompressionMethod {
    match self {
      Compression::Stored => CompressionMethod::Stored,
      Compression::Deflated => CompressionMethod::Deflated,
    }
  }
}

/// One named blob held in memory while the container is rewritten.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
  pub name: String,
  pub content: Vec<u8>,
  /// Method the entry was (or will be) written with.
  pub compression: Compression,
}

/// Listing metadata for an entry, read from the central directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryInfo {
  pub name: String,
  pub size: u64,
  pub compressed_size: u64,
  pub compression: String,
}

/// A rewrite that was interrupted before the atomic swap.
///
/// The container is stale but intact. Recorded and logged, never returned as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurabilityRisk {
  /// Temporary container that never replaced the real one.
  pub leftover: PathBuf,
}

impl fmt::Display for DurabilityRisk {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "interrupted rewrite left {} behind; memory kept its previous contents",
      self.leftover.display()
    )
  }
}

#[derive(Debug, Error)]
pub enum ArchiveError {
  #[error("no entry named '{0}' in memory")]
  NotFound(String),

  #[error("an entry named '{0}' already exists in memory")]
  AlreadyExists(String),

  #[error("entry names must be non-empty and must not end with '/' or '\\'")]
  InvalidName,

  #[error("'{path}' is not a valid memory container: {source}")]
  InvalidContainer {
    path: PathBuf,
    #[source]
    source: ZipError,
  },

  #[error("memory I/O failed: {0}")]
  Io(#[from] io::Error),

  #[error("memory container error: {0}")]
  Zip(#[from] ZipError),

  #[error("failed to replace '{path}' with the rewritten container: {source}")]
  Persist {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

impl ArchiveError {
  /// True for a missing entry; every other variant is an I/O-class failure.
  pub fn is_not_found(&self) -> bool {
    matches!(self, ArchiveError::NotFound(_))
  }
}
/// Names ending in `/` or `\` are directory markers to zip readers and
/// Names ending in `/` or `\\` are directory markers to zip readers and
/// would vanish from the container.
pub(crate) fn validate_name(name: &str) -> Result<(), ArchiveError> {
  if name.is_empty() || name.ends_with(['/', '\\']) {
    return Err(ArchiveError::InvalidName);
  }
  Ok(())
}
