//! File manager commands.
//!
//! Each subcommand maps onto one memory operation. `open` is the only one
//! that leaves the memory: it extracts the entry to the cache directory and
//! hands it to the host's default program.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Subcommand;

use sussyos_lib::archive::ArchiveStore;
use sussyos_lib::launch::Launcher;
use sussyos_lib::platform::paths::open_cache_dir;

use crate::output::{OutputFormat, format_bytes, print_info, print_json, print_success, print_warning};
use crate::prompts::confirm;
use crate::session::Session;

#[derive(Subcommand, Debug)]
pub enum FileCommand {
  /// List files in memory
  List {
    /// Show sizes and compression
    #[arg(short, long)]
    long: bool,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },

  /// Copy a file from disk into memory
  Add {
    /// File to add
    path: PathBuf,

    /// Name in memory (defaults to the file's name)
    #[arg(long)]
    name: Option<String>,
  },

  /// Remove a file from memory
  Remove {
    /// Name in memory
    name: String,
  },

  /// Replace a file in memory with a file from disk
  Overwrite {
    /// Name in memory
    name: String,

    /// File with the new content
    path: PathBuf,
  },

  /// Print a file's content
  Read {
    /// Name in memory
    name: String,
  },

  /// Replace a file's content with text
  Edit {
    /// Name in memory
    name: String,

    /// New content
    content: String,
  },

  /// Write a file from memory to disk
  Extract {
    /// Name in memory
    name: String,

    /// Destination directory
    #[arg(long, default_value = ".")]
    to: PathBuf,
  },

  /// Open a file with the system's default program
  Open {
    /// Name in memory
    name: String,
  },

  /// Delete every file from memory
  Wipe {
    /// Skip confirmation prompt
    #[arg(long)]
    force: bool,
  },
}

pub fn cmd_files(command: FileCommand, session: &mut Session, launcher: &dyn Launcher) -> Result<()> {
  let store = &mut session.store;

  match command {
    FileCommand::List { long, output } => cmd_list(store, long, output),
    FileCommand::Add { path, name } => {
      let name = add_from_disk(store, &path, name.as_deref())?;
      print_success(&format!("Added {} to memory as '{}'", path.display(), name));
      Ok(())
    }
    FileCommand::Remove { name } => {
      store.remove(&name)?;
      print_success(&format!("Removed '{}' from memory", name));
      Ok(())
    }
    FileCommand::Overwrite { name, path } => {
      let content = read_host_file(&path)?;
      store.update(&name, &content)?;
      print_success(&format!("Overwrote '{}' with {}", name, path.display()));
      Ok(())
    }
    FileCommand::Read { name } => cmd_read(store, &name),
    FileCommand::Edit { name, content } => {
      store.update(&name, content.as_bytes())?;
      print_success(&format!("Edited '{}'", name));
      Ok(())
    }
    FileCommand::Extract { name, to } => {
      let path = store.extract(&name, &to)?;
      print_success(&format!("Extracted '{}' to {}", name, path.display()));
      Ok(())
    }
    FileCommand::Open { name } => {
      let path = open_entry(store, &name, &open_cache_dir(), launcher)?;
      print_success(&format!("Opened {}", path.display()));
      Ok(())
    }
    FileCommand::Wipe { force } => {
      if !confirm("Are you sure you want to delete everything?", force)? {
        print_info("Wipe cancelled");
        return Ok(());
      }
      store.wipe()?;
      print_success("All files have been deleted from memory");
      Ok(())
    }
  }
}

fn cmd_list(store: &ArchiveStore, long: bool, output: OutputFormat) -> Result<()> {
  let entries = store.entries()?;

  if output.is_json() {
    return print_json(&entries);
  }

  if entries.is_empty() {
    print_info("Memory is empty");
    return Ok(());
  }

  for entry in &entries {
    if long {
      println!(
        "{}  {} ({} stored, {})",
        entry.name,
        format_bytes(entry.size),
        format_bytes(entry.compressed_size),
        entry.compression
      );
    } else {
      println!("{}", entry.name);
    }
  }
  print_info(&format!("{} file(s) in memory", entries.len()));

  Ok(())
}

fn cmd_read(store: &ArchiveStore, name: &str) -> Result<()> {
  let content = store.read(name)?;
  match String::from_utf8(content) {
    Ok(text) => println!("{}", text),
    Err(_) => print_warning(&format!("'{}' is a binary file, cannot print its content", name)),
  }
  Ok(())
}

fn read_host_file(path: &Path) -> Result<Vec<u8>> {
  if !path.is_file() {
    bail!("File not found: {}", path.display());
  }
  fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Add a host file, named after its file name unless `name` is given.
fn add_from_disk(store: &mut ArchiveStore, path: &Path, name: Option<&str>) -> Result<String> {
  let content = read_host_file(path)?;
  let name = match name {
    Some(name) => name.to_string(),
    None => path
      .file_name()
      .map(|n| n.to_string_lossy().into_owned())
      .with_context(|| format!("Cannot derive a name from {}", path.display()))?,
  };

  store.add(&name, &content)?;
  Ok(name)
}

/// Extract `name` into `dir` and open it.
fn open_entry(store: &ArchiveStore, name: &str, dir: &Path, launcher: &dyn Launcher) -> Result<PathBuf> {
  let path = store.extract(name, dir)?;
  launcher.open(&path)?;
  Ok(path)
}
