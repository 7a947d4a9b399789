//! Memory container storage.
//!
//! All entries live in a single zip file. The zip format only supports
//! appending, so every mutation reads the current entries, edits them in
//! memory and writes a brand-new container that atomically replaces the old
//! one.
//!
//! # Storage Layout
//!
//! ```text
//! {data_dir}/
//! ├── memory.zip               # the container
//! └── .memory.zip.<rand>.tmp   # only while a rewrite is in flight
//! ```
//!
//! Each mutation costs O(total size). That is fine for the few small files a
//! memory holds and is the ceiling of this design.

use std::fs::{self, File};
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use super::types::{ArchiveError, Compression, DurabilityRisk, Entry, EntryInfo, validate_name};

/// Suffix of temporary containers written during a rewrite.
const TEMP_SUFFIX: &str = ".tmp";

/// Entries at least this large need zip64 headers.
const LARGE_FILE_THRESHOLD: u64 = u32::MAX as u64;

/// Upper bound on buffer space reserved from a size declared in the zip
/// header. Larger entries grow the buffer as they are read.
const MAX_PREALLOC: usize = 1 << 20;

/// Handle to a memory container on disk.
///
/// No file handle is held between calls: each operation opens, reads or
/// replaces, and closes the container.
#[derive(Debug)]
pub struct ArchiveStore {
  path: PathBuf,
  compression: Compression,
  risks: Vec<DurabilityRisk>,
}

impl ArchiveStore {
  /// Open the container at `path`, creating an empty one if it is missing.
  ///
  /// Leftover temporary containers from an interrupted rewrite are removed
  /// and reported through [`ArchiveStore::durability_risks`].
  pub fn open_or_create(path: impl Into<PathBuf>) -> Result<Self, ArchiveError> {
    let mut store = Self {
      path: path.into(),
      compression: Compression::default(),
      risks: Vec::new(),
    };

    store.risks = store.sweep_leftovers()?;

    match fs::metadata(&store.path) {
      Ok(_) => {
        let archive = store.open_archive()?;
        debug!(path = ?store.path, entries = archive.len(), "opened memory");
      }
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        fs::create_dir_all(store.container_dir())?;
        store.write_container(&[])?;
        info!(path = ?store.path, "created empty memory");
      }
      Err(e) => return Err(e.into()),
    }

    Ok(store)
  }

  /// Use `compression` for entries added or updated through this handle.
  pub fn with_compression(mut self, compression: Compression) -> Self {
    self.compression = compression;
    self
  }

  /// Path of the container file.
  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Interrupted rewrites detected when the store was opened.
  pub fn durability_risks(&self) -> &[DurabilityRisk] {
    &self.risks
  }

  /// All entry names in insertion order.
  pub fn list(&self) -> Result<Vec<String>, ArchiveError> {
    Ok(self.entries()?.into_iter().map(|info| info.name).collect())
  }

  /// All entries with size and compression metadata, in insertion order.
  pub fn entries(&self) -> Result<Vec<EntryInfo>, ArchiveError> {
    let mut archive = self.open_archive()?;
    let mut infos = Vec::with_capacity(archive.len());

    for index in 0..archive.len() {
      let file = archive.by_index_raw(index)?;
      if file.is_dir() {
        continue;
      }
      infos.push(EntryInfo {
        name: file.name().to_string(),
        size: file.size(),
        compressed_size: file.compressed_size(),
        compression: format!("{:?}", file.compression()),
      });
    }

    Ok(infos)
  }

  pub fn contains(&self, name: &str) -> Result<bool, ArchiveError> {
    Ok(self.list()?.iter().any(|n| n == name))
  }

  /// Sum of the uncompressed sizes of all entries.
  pub fn total_size(&self) -> Result<u64, ArchiveError> {
    Ok(self.entries()?.iter().map(|info| info.size).sum())
  }

  /// Read an entry's content. Never touches the container.
  pub fn read(&self, name: &str) -> Result<Vec<u8>, ArchiveError> {
    let mut archive = self.open_archive()?;
    let mut file = match archive.by_name(name) {
      Ok(file) => file,
      Err(ZipError::FileNotFound) => return Err(ArchiveError::NotFound(name.to_string())),
      Err(e) => return Err(e.into()),
    };

    if file.is_dir() {
      return Err(ArchiveError::NotFound(name.to_string()));
    }

    let mut content = Vec::with_capacity(prealloc_len(file.size()));
    file.read_to_end(&mut content)?;
    Ok(content)
  }

  /// Add a new entry. Fails with `AlreadyExists` if the name is taken.
  pub fn add(&mut self, name: &str, content: &[u8]) -> Result<(), ArchiveError> {
    validate_name(name)?;

    let mut entries = self.load_entries()?;
    if entries.iter().any(|e| e.name == name) {
      return Err(ArchiveError::AlreadyExists(name.to_string()));
    }

    entries.push(self.new_entry(name, content));
    self.write_container(&entries)?;

    info!(name = %name, size = content.len(), "added entry");
    Ok(())
  }

  /// Replace an existing entry's content, keeping its position.
  pub fn update(&mut self, name: &str, content: &[u8]) -> Result<(), ArchiveError> {
    let mut entries = self.load_entries()?;
    let Some(entry) = entries.iter_mut().find(|e| e.name == name) else {
      return Err(ArchiveError::NotFound(name.to_string()));
    };

    entry.content = content.to_vec();
    entry.compression = self.compression;
    self.write_container(&entries)?;

    info!(name = %name, size = content.len(), "updated entry");
    Ok(())
  }

  /// Update `name` if present, add it otherwise.
  pub fn put(&mut self, name: &str, content: &[u8]) -> Result<(), ArchiveError> {
    validate_name(name)?;

    let mut entries = self.load_entries()?;
    match entries.iter_mut().find(|e| e.name == name) {
      Some(entry) => {
        entry.content = content.to_vec();
        entry.compression = self.compression;
      }
      None => entries.push(self.new_entry(name, content)),
    }
    self.write_container(&entries)?;

    info!(name = %name, size = content.len(), "stored entry");
    Ok(())
  }

  /// Remove an entry. Fails with `NotFound` if it does not exist.
  pub fn remove(&mut self, name: &str) -> Result<(), ArchiveError> {
    let mut entries = self.load_entries()?;
    let Some(position) = entries.iter().position(|e| e.name == name) else {
      return Err(ArchiveError::NotFound(name.to_string()));
    };

    entries.remove(position);
    self.write_container(&entries)?;

    info!(name = %name, "removed entry");
    Ok(())
  }

  /// Remove every entry. The container file itself stays.
  pub fn wipe(&mut self) -> Result<(), ArchiveError> {
    self.write_container(&[])?;
    info!(path = ?self.path, "wiped memory");
    Ok(())
  }

  /// Write an entry's content to a file inside `dest_dir`.
  ///
  /// Returns the path of the written file.
  pub fn extract(&self, name: &str, dest_dir: &Path) -> Result<PathBuf, ArchiveError> {
    let content = self.read(name)?;

    fs::create_dir_all(dest_dir)?;
    let dest = dest_dir.join(extracted_file_name(name));
    fs::write(&dest, &content)?;

    debug!(name = %name, path = ?dest, "extracted entry");
    Ok(dest)
  }

  /// End the handle's lifetime.
  pub fn close(self) {
    debug!(path = ?self.path, "closed memory");
  }

  fn new_entry(&self, name: &str, content: &[u8]) -> Entry {
    Entry {
      name: name.to_string(),
      content: content.to_vec(),
      compression: self.compression,
    }
  }

  fn open_archive(&self) -> Result<ZipArchive<BufReader<File>>, ArchiveError> {
    let file = File::open(&self.path)?;
    ZipArchive::new(BufReader::new(file)).map_err(|source| ArchiveError::InvalidContainer {
      path: self.path.clone(),
      source,
    })
  }

  /// Read every entry into memory, in container order.
  ///
  /// Directory markers are dropped.
  fn load_entries(&self) -> Result<Vec<Entry>, ArchiveError> {
    let mut archive = self.open_archive()?;
    let mut entries = Vec::with_capacity(archive.len());

    for index in 0..archive.len() {
      let mut file = archive.by_index(index)?;
      if file.is_dir() {
        debug!(name = %file.name(), "dropping directory marker");
        continue;
      }

      let mut content = Vec::with_capacity(prealloc_len(file.size()));
      file.read_to_end(&mut content)?;
      entries.push(Entry {
        name: file.name().to_string(),
        content,
        compression: Compression::from_method(file.compression()),
      });
    }

    Ok(entries)
  }

  /// Write `entries` as a new container and swap it in with a rename.
  ///
  /// The old container is untouched until the rename succeeds.
  fn write_container(&self, entries: &[Entry]) -> Result<(), ArchiveError> {
    let dir = self.container_dir();
    let mut temp = tempfile::Builder::new()
      .prefix(&self.temp_prefix())
      .suffix(TEMP_SUFFIX)
      .tempfile_in(&dir)?;

    if let Err(e) = encode(temp.as_file_mut(), entries) {
      warn!(path = ?self.path, error = %e, "rewrite interrupted before swap; memory left unchanged");
      return Err(e);
    }

    if let Err(e) = temp.persist(&self.path) {
      warn!(path = ?self.path, error = %e.error, "rewrite interrupted before swap; memory left unchanged");
      return Err(ArchiveError::Persist {
        path: self.path.clone(),
        source: e.error,
      });
    }

    // The new container is in place from here on; a failed directory sync
    // must not report the change as lost.
    log_dir_sync(&self.path, sync_dir(&dir));
    debug!(path = ?self.path, entries = entries.len(), "rewrote memory");
    Ok(())
  }

  /// Remove temporary containers left behind by a killed rewrite.
  fn sweep_leftovers(&self) -> Result<Vec<DurabilityRisk>, ArchiveError> {
    let dir = self.container_dir();
    let read_dir = match fs::read_dir(&dir) {
      Ok(read_dir) => read_dir,
      Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
      Err(e) => return Err(e.into()),
    };

    let prefix = self.temp_prefix();
    let mut risks = Vec::new();

    for dir_entry in read_dir {
      let dir_entry = dir_entry?;
      let file_name = dir_entry.file_name();
      let file_name = file_name.to_string_lossy();
      if !file_name.starts_with(&prefix) || !file_name.ends_with(TEMP_SUFFIX) || !dir_entry.file_type()?.is_file() {
        continue;
      }

      let risk = DurabilityRisk {
        leftover: dir_entry.path(),
      };
      warn!(path = ?self.path, "{}", risk);
      if let Err(e) = fs::remove_file(&risk.leftover) {
        warn!(leftover = ?risk.leftover, error = %e, "could not remove leftover container");
      }
      risks.push(risk);
    }

    Ok(risks)
  }

  fn container_dir(&self) -> PathBuf {
    match self.path.parent() {
      Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
      _ => PathBuf::from("."),
    }
  }

  fn temp_prefix(&self) -> String {
    let file_name = self
      .path
      .file_name()
      .map(|n| n.to_string_lossy().into_owned())
      .unwrap_or_else(|| "memory".to_string());
    format!(".{}.", file_name)
  }
}

impl Compression {
  /// Stored entries stay stored; anything else is rewritten as Deflate.
  fn from_method(method: zip::CompressionMethod) -> Self {
    match method {
      zip::CompressionMethod::Stored => Compression::Stored,
      _ => Compression::Deflated,
    }
  }
}

fn encode(file: &mut File, entries: &[Entry]) -> Result<(), ArchiveError> {
  let mut writer = ZipWriter::new(&mut *file);

  for entry in entries {
    let options = SimpleFileOptions::default()
      .compression_method(entry.compression.method())
      .large_file(entry.content.len() as u64 >= LARGE_FILE_THRESHOLD);
    writer.start_file(entry.name.as_str(), options)?;
    writer.write_all(&entry.content)?;
  }

  writer.finish()?;
  file.flush()?;
  file.sync_all()?;
  Ok(())
}

fn prealloc_len(declared: u64) -> usize {
  usize::try_from(declared).unwrap_or(usize::MAX).min(MAX_PREALLOC)
}

fn log_dir_sync(path: &Path, result: io::Result<()>) {
  if let Err(e) = result {
    warn!(path = ?path, error = %e, "directory sync after swap failed; change is applied but may not survive power loss");
  }
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> io::Result<()> {
  File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> io::Result<()> {
  Ok(())
}

/// Host file name for an extracted entry: the last name segment, or `entry`.
fn extracted_file_name(name: &str) -> String {
  match name.rsplit(['/', '\\']).next() {
    Some(last) if !last.is_empty() && last != "." && last != ".." => last.to_string(),
    _ => "entry".to_string(),
  }
}
