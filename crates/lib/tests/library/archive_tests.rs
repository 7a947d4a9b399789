//! Tests for the memory store through its public API.

use std::fs;

use sussyos_lib::archive::{ArchiveError, ArchiveStore};
use tempfile::TempDir;

fn memory_in(temp: &TempDir) -> std::path::PathBuf {
  temp.path().join("memory.zip")
}

#[test]
fn contents_survive_reopen() -> Result<(), ArchiveError> {
  let temp = TempDir::new().unwrap();

  let mut store = ArchiveStore::open_or_create(memory_in(&temp))?;
  store.add("a.txt", b"alpha")?;
  store.add("img/cat.png", &[0x89, b'P', b'N', b'G', 0x00])?;
  store.add("empty", b"")?;
  store.close();

  let store = ArchiveStore::open_or_create(memory_in(&temp))?;
  assert_eq!(store.list()?, vec!["a.txt", "img/cat.png", "empty"]);
  assert_eq!(store.read("img/cat.png")?, vec![0x89, b'P', b'N', b'G', 0x00]);
  assert_eq!(store.read("empty")?, b"");
  Ok(())
}

#[test]
fn container_is_a_plain_zip() -> Result<(), Box<dyn std::error::Error>> {
  let temp = TempDir::new()?;

  let mut store = ArchiveStore::open_or_create(memory_in(&temp))?;
  store.add("hello.txt", b"hello")?;
  store.close();

  let mut archive = zip::ZipArchive::new(fs::File::open(memory_in(&temp))?)?;
  assert_eq!(archive.len(), 1);
  let mut file = archive.by_name("hello.txt")?;
  let mut content = String::new();
  std::io::Read::read_to_string(&mut file, &mut content)?;
  assert_eq!(content, "hello");
  Ok(())
}

#[test]
fn zips_from_other_tools_are_readable() -> Result<(), Box<dyn std::error::Error>> {
  use std::io::Write;
  use zip::write::SimpleFileOptions;

  let temp = TempDir::new()?;
  {
    let mut writer = zip::ZipWriter::new(fs::File::create(memory_in(&temp))?);
    writer.add_directory("docs/", SimpleFileOptions::default())?;
    writer.start_file(
      "docs/readme.txt",
      SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored),
    )?;
    writer.write_all(b"read me")?;
    writer.finish()?;
  }

  let mut store = ArchiveStore::open_or_create(memory_in(&temp))?;
  assert_eq!(store.list()?, vec!["docs/readme.txt"]);

  store.add("new.txt", b"new")?;
  let entries = store.entries()?;
  assert_eq!(entries[0].name, "docs/readme.txt");
  assert_eq!(entries[0].compression, "Stored");
  assert_eq!(store.read("docs/readme.txt")?, b"read me");
  Ok(())
}

#[test]
fn failed_operations_leave_memory_unchanged() -> Result<(), ArchiveError> {
  let temp = TempDir::new().unwrap();
  let mut store = ArchiveStore::open_or_create(memory_in(&temp))?;
  store.add("keep", b"1")?;
  let before = fs::read(memory_in(&temp))?;

  assert!(matches!(store.add("keep", b"2"), Err(ArchiveError::AlreadyExists(_))));
  assert!(matches!(store.update("ghost", b"2"), Err(ArchiveError::NotFound(_))));
  assert!(matches!(store.remove("ghost"), Err(ArchiveError::NotFound(_))));
  assert!(matches!(store.add("", b"x"), Err(ArchiveError::InvalidName)));

  assert_eq!(fs::read(memory_in(&temp))?, before);
  assert!(
    fs::read_dir(temp.path())?
      .filter_map(Result::ok)
      .all(|e| !e.file_name().to_string_lossy().ends_with(".tmp"))
  );
  Ok(())
}

#[test]
fn names_read_as_directories_are_refused() -> Result<(), ArchiveError> {
  let temp = TempDir::new().unwrap();
  let mut store = ArchiveStore::open_or_create(memory_in(&temp))?;

  for name in ["notes\\", "\\", "docs/"] {
    assert!(matches!(store.add(name, b"precious"), Err(ArchiveError::InvalidName)));
  }
  assert!(store.list()?.is_empty());
  Ok(())
}
