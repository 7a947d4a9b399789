//! Programmer commands: Lua programs stored as memory entries.

use std::fs;
use std::io::{self, BufRead, IsTerminal};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Subcommand;

use sussyos_lib::archive::ArchiveStore;
use sussyos_lib::consts::PROGRAM_SENTINEL;
use sussyos_lib::script::{Program, ScriptEngine, ScriptOutput};

use crate::output::{print_error, print_info, print_item, print_success};
use crate::prompts::ask;
use crate::session::Session;

#[derive(Subcommand, Debug)]
pub enum ProgramCommand {
  /// List programs in memory
  List,

  /// Write a new program, from a file or line by line on stdin until OS_EXIT
  Write {
    /// Program name in memory
    name: String,

    /// Read the program from this file instead of stdin
    #[arg(long)]
    file: Option<PathBuf>,

    /// Replace an existing program
    #[arg(long)]
    force: bool,
  },

  /// Change lines of a program (interactive when no edits are given)
  Modify {
    /// Program name in memory
    name: String,

    /// Replace line N with TEXT (1-based)
    #[arg(long = "set", value_name = "N=TEXT", value_parser = parse_line_edit)]
    set: Vec<(usize, String)>,

    /// Append a line
    #[arg(long, value_name = "TEXT")]
    append: Vec<String>,
  },

  /// Print a program with line numbers
  Show {
    /// Program name in memory
    name: String,
  },

  /// Remove a program from memory
  Remove {
    /// Program name in memory
    name: String,
  },

  /// Run a program
  Run {
    /// Program name in memory
    name: String,
  },
}

pub fn cmd_programs(command: ProgramCommand, session: &mut Session, engine: &dyn ScriptEngine) -> Result<()> {
  let store = &mut session.store;

  match command {
    ProgramCommand::List => {
      let names = store.list()?;
      if names.is_empty() {
        print_info("No programs in memory");
        return Ok(());
      }
      for (i, name) in names.iter().enumerate() {
        print_item(i + 1, name);
      }
      Ok(())
    }
    ProgramCommand::Write { name, file, force } => {
      let program = match file {
        Some(path) => {
          let source = fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
          Program::from_source(&source)
        }
        None => read_program_from_stdin()?,
      };
      save_program(store, &name, &program, force)?;
      print_success(&format!("Saved '{}' ({} lines)", name, program.len()));
      Ok(())
    }
    ProgramCommand::Modify { name, set, append } => {
      let mut program = load_program(store, &name)?;
      if set.is_empty() && append.is_empty() {
        edit_interactively(&mut program, &mut io::stdin().lock())?;
      } else {
        apply_edits(&mut program, &set, &append)?;
      }
      store.update(&name, program.to_source().as_bytes())?;
      print_success(&format!("Saved changes to '{}'", name));
      Ok(())
    }
    ProgramCommand::Show { name } => {
      let program = load_program(store, &name)?;
      for (n, line) in program.numbered() {
        println!("{:>4}: {}", n, line);
      }
      Ok(())
    }
    ProgramCommand::Remove { name } => {
      store.remove(&name)?;
      print_success(&format!("Removed '{}'", name));
      Ok(())
    }
    ProgramCommand::Run { name } => {
      let output = run_program(store, engine, &name)?;
      for line in &output.printed {
        println!("{}", line);
      }
      if let Some(result) = &output.result {
        println!("Lua Script Output: {}", result);
      }
      Ok(())
    }
  }
}

/// Parse `N=TEXT` for `--set`.
fn parse_line_edit(raw: &str) -> Result<(usize, String), String> {
  let (number, text) = raw
    .split_once('=')
    .ok_or_else(|| format!("expected N=TEXT, got '{}'", raw))?;
  let number: usize = number
    .trim()
    .parse()
    .map_err(|_| format!("'{}' is not a line number", number))?;
  if number == 0 {
    return Err("line numbers start at 1".to_string());
  }
  Ok((number, text.to_string()))
}

fn read_program_from_stdin() -> Result<Program> {
  let stdin = io::stdin();
  if stdin.is_terminal() {
    print_info(&format!("Write your code. Type '{}' on its own line to finish.", PROGRAM_SENTINEL));
  }
  read_program(stdin.lock())
}

/// Read lines up to the sentinel. Nothing past it is consumed, and an
/// unreadable line fails the whole program.
fn read_program<R: BufRead>(input: R) -> Result<Program> {
  let mut lines = Vec::new();
  for (index, line) in input.lines().enumerate() {
    let line = line.with_context(|| format!("Failed to read line {} of the program", index + 1))?;
    if line.trim() == PROGRAM_SENTINEL {
      break;
    }
    lines.push(line);
  }
  Ok(Program::collect_until_sentinel(lines, PROGRAM_SENTINEL))
}

fn save_program(store: &mut ArchiveStore, name: &str, program: &Program, force: bool) -> Result<()> {
  let source = program.to_source();
  if force {
    store.put(name, source.as_bytes())?;
  } else {
    store
      .add(name, source.as_bytes())
      .with_context(|| format!("Cannot save '{}' (use --force to replace it)", name))?;
  }
  Ok(())
}

fn load_program(store: &ArchiveStore, name: &str) -> Result<Program> {
  let source = load_source(store, name)?;
  Ok(Program::from_source(&source))
}

fn load_source(store: &ArchiveStore, name: &str) -> Result<String> {
  let content = store.read(name)?;
  match String::from_utf8(content) {
    Ok(source) => Ok(source),
    Err(_) => bail!("'{}' is a binary file, not a program", name),
  }
}

fn apply_edits(program: &mut Program, set: &[(usize, String)], append: &[String]) -> Result<()> {
  for (line, text) in set {
    program.set_line(*line, text)?;
  }
  for text in append {
    program.push_line(text);
  }
  Ok(())
}

/// Line editor: pick a line number to replace it, `add` to append a line,
/// the sentinel (or end of input) to finish.
fn edit_interactively<R: BufRead>(program: &mut Program, input: &mut R) -> Result<()> {
  let prompt = format!("Line number to edit, 'add' for a new line, or '{}' to finish: ", PROGRAM_SENTINEL);

  loop {
    for (n, line) in program.numbered() {
      println!("{}: {}", n, line);
    }

    let Some(choice) = ask(input, &prompt)? else {
      break;
    };
    let choice = choice.trim();

    if choice == PROGRAM_SENTINEL {
      break;
    }

    if choice.eq_ignore_ascii_case("add") {
      match ask(input, "New line: ")? {
        Some(text) => program.push_line(&text),
        None => break,
      }
      continue;
    }

    match choice.parse::<usize>() {
      Ok(n) if (1..=program.len()).contains(&n) => {
        let Some(text) = ask(input, &format!("New content for line {}: ", n))? else {
          break;
        };
        program.set_line(n, &text)?;
      }
      _ => print_error("Invalid input. Please try again."),
    }
  }

  Ok(())
}

fn run_program(store: &ArchiveStore, engine: &dyn ScriptEngine, name: &str) -> Result<ScriptOutput> {
  let source = load_source(store, name)?;
  Ok(engine.execute(name, &source)?)
}
