//! Command tree shared by one-shot invocations and the interactive shell.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use sussyos_lib::launch::SystemLauncher;
use sussyos_lib::platform::paths::memory_path;
use sussyos_lib::script::LuaEngine;
use sussyos_lib::web::HttpFetcher;

use crate::cmd::{FileCommand, ProgramCommand, WebCommand, cmd_files, cmd_programs, cmd_shell, cmd_status, cmd_web};
use crate::output::OutputFormat;
use crate::session::Session;

/// SussyOS - a tiny shell with a browser, a file manager and a Lua programmer
#[derive(Parser)]
#[command(name = "sussy")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  pub verbose: bool,

  /// Path of the memory container (default: $SUSSYOS_MEMORY or <data dir>/memory.zip)
  #[arg(long, global = true, value_name = "PATH")]
  pub memory: Option<PathBuf>,

  #[command(subcommand)]
  pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
  /// Boot checks: memory, connectivity and interrupted writes
  Status {
    /// Skip the network connectivity probe
    #[arg(long)]
    offline: bool,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },

  /// File manager: files kept in memory
  #[command(subcommand, visible_alias = "filemanager")]
  Fm(FileCommand),

  /// Programmer: Lua scripts kept in memory
  #[command(subcommand, visible_alias = "programmer")]
  Prog(ProgramCommand),

  /// Browser: search the web and download into memory
  #[command(subcommand, visible_alias = "browser")]
  Web(WebCommand),

  /// Interactive shell running the same commands
  Shell,
}

/// Parse a line typed into the shell. No binary name, no global flags.
#[derive(Parser)]
#[command(name = "sussy", no_binary_name = true, disable_version_flag = true)]
pub struct ShellLine {
  #[command(subcommand)]
  pub command: Commands,
}

pub fn run(cli: Cli) -> Result<()> {
  let path = cli.memory.unwrap_or_else(memory_path);
  let mut session = Session::open(path)?;

  let result = match cli.command {
    Commands::Shell => cmd_shell(&mut session),
    command => dispatch(command, &mut session),
  };

  session.close();
  result
}

/// Run one command against an open session.
pub fn dispatch(command: Commands, session: &mut Session) -> Result<()> {
  match command {
    Commands::Status { offline, output } => cmd_status(session, offline, output),
    Commands::Fm(command) => cmd_files(command, session, &SystemLauncher),
    Commands::Prog(command) => cmd_programs(command, session, &LuaEngine::new()),
    Commands::Web(command) => cmd_web(command, session, &HttpFetcher::new()?),
    Commands::Shell => anyhow::bail!("Already in the shell"),
  }
}
