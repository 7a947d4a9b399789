//! Opening extracted entries with the host's default program.

use std::io;
use std::path::Path;
use std::process::{Command, ExitStatus};

use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum LaunchError {
  #[error("failed to start '{program}': {source}")]
  Spawn {
    program: String,
    #[source]
    source: io::Error,
  },

  #[error("'{program}' exited with {status}")]
  Failed { program: String, status: ExitStatus },
}

/// Opens a file with whatever the host associates with it.
pub trait Launcher {
  fn open(&self, path: &Path) -> Result<(), LaunchError>;
}

/// Delegates to the platform opener (`xdg-open`, `open`, `start`).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

impl SystemLauncher {
  /// Program and leading arguments used to open a file on this platform.
  pub fn opener() -> (&'static str, &'static [&'static str]) {
    const NO_ARGS: &[&str] = &[];
    // The empty string is `start`'s window title.
    const START_ARGS: &[&str] = &["/C", "start", ""];

    if cfg!(target_os = "windows") {
      ("cmd", START_ARGS)
    } else if cfg!(target_os = "macos") {
      ("open", NO_ARGS)
    } else {
      ("xdg-open", NO_ARGS)
    }
  }
}

impl Launcher for SystemLauncher {
  fn open(&self, path: &Path) -> Result<(), LaunchError> {
    let (program, args) = Self::opener();
    info!(program = %program, path = ?path, "opening file");

    let status = Command::new(program)
      .args(args)
      .arg(path)
      .status()
      .map_err(|source| LaunchError::Spawn {
        program: program.to_string(),
        source,
      })?;

    if !status.success() {
      return Err(LaunchError::Failed {
        program: program.to_string(),
        status,
      });
    }
    Ok(())
  }
}
