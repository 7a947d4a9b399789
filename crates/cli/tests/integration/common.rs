//! Shared test helpers for CLI integration tests.

use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Isolated test environment.
///
/// Each test gets its own temporary directory holding the data dir (where the
/// default memory lives), the cache dir and any host files it writes.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  pub fn new() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  /// Write a host file relative to the temp directory and return its path.
  pub fn write_file(&self, relative_path: &str, content: impl AsRef<[u8]>) -> PathBuf {
    let path = self.temp.path().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
  }

  /// Data path (isolated per test).
  pub fn data_path(&self) -> PathBuf {
    let p = self.temp.path().join("data");
    std::fs::create_dir_all(&p).unwrap();
    dunce::canonicalize(&p).unwrap_or(p)
  }

  /// Cache path for opened files.
  pub fn cache_path(&self) -> PathBuf {
    let p = self.temp.path().join("cache");
    std::fs::create_dir_all(&p).unwrap();
    dunce::canonicalize(&p).unwrap_or(p)
  }

  /// Where the binary puts the memory when no override is given.
  pub fn memory_path(&self) -> PathBuf {
    self.data_path().join("sussyos").join("memory.zip")
  }

  /// Get a pre-configured Command for the sussy binary.
  ///
  /// Sets environment variables for isolated testing:
  /// - `XDG_DATA_HOME`: Isolated data path (memory container)
  /// - `XDG_CACHE_HOME`: Isolated cache path
  /// - `APPDATA`: Isolated data path (for Windows)
  /// - `LOCALAPPDATA`: Isolated cache path (for Windows)
  ///
  /// `SUSSYOS_MEMORY` is cleared so the default location is used.
  pub fn sussy_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("sussy");
    cmd.env("XDG_DATA_HOME", self.data_path());
    cmd.env("XDG_CACHE_HOME", self.cache_path());
    cmd.env("APPDATA", self.data_path()); // For Windows
    cmd.env("LOCALAPPDATA", self.cache_path()); // For Windows cache
    cmd.env_remove("SUSSYOS_MEMORY");
    cmd
  }
}
