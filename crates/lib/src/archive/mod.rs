//! The memory: a zip-backed store of named blobs.
//!
//! Shared by the file manager, the programmer and the browser's download
//! step. See [`storage`] for the on-disk layout and the rewrite discipline.

pub mod storage;
pub mod types;

pub use storage::ArchiveStore;
pub use types::{ArchiveError, Compression, DurabilityRisk, Entry, EntryInfo};
