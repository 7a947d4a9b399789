//! The open memory for one `sussy` invocation or shell session.

use std::path::PathBuf;

use anyhow::{Context, Result};
use sussyos_lib::archive::ArchiveStore;
use tracing::debug;

use crate::output::print_warning;

pub struct Session {
  pub store: ArchiveStore,
  /// Whether the container existed before this session opened it.
  pub memory_existed: bool,
}

impl Session {
  /// Open (or create) the memory at `path`, reporting interrupted rewrites.
  pub fn open(path: PathBuf) -> Result<Self> {
    let memory_existed = path.exists();
    let store = ArchiveStore::open_or_create(&path)
      .with_context(|| format!("Failed to open memory at {}", path.display()))?;

    for risk in store.durability_risks() {
      print_warning(&risk.to_string());
    }

    debug!(path = ?store.path(), existed = memory_existed, "session started");
    Ok(Self { store, memory_existed })
  }

  pub fn close(self) {
    self.store.close();
  }
}
