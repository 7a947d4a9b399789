//! Interactive shell over the same command tree.

use std::io;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing::debug;

use crate::cli::{ShellLine, dispatch};
use crate::output::{print_error, print_info};
use crate::prompts::ask;
use crate::session::Session;

const PROMPT: &str = "sussy> ";

/// What the loop should do after one line.
#[derive(Debug, PartialEq, Eq)]
enum Step {
  Continue,
  Exit,
}

pub fn cmd_shell(session: &mut Session) -> Result<()> {
  print_info("Welcome to SussyOS. Type 'help' for commands, 'exit' to leave.");

  // stdin is locked per line so commands can prompt on it too.
  run_shell(session, || ask(&mut io::stdin().lock(), PROMPT))?;

  print_info("Shutting down SussyOS");
  Ok(())
}

/// Read lines from `next_line` until it returns `None` or the user exits.
fn run_shell<F>(session: &mut Session, mut next_line: F) -> Result<()>
where
  F: FnMut() -> Result<Option<String>>,
{
  while let Some(line) = next_line()? {
    if execute_line(session, &line) == Step::Exit {
      break;
    }
  }
  Ok(())
}

fn execute_line(session: &mut Session, line: &str) -> Step {
  let line = line.trim();
  match line {
    "" => return Step::Continue,
    "exit" | "quit" => return Step::Exit,
    "help" => {
      println!("{}", ShellLine::command().render_help());
      return Step::Continue;
    }
    _ => {}
  }

  let Some(words) = shlex::split(line) else {
    print_error("Unbalanced quotes");
    return Step::Continue;
  };

  match ShellLine::try_parse_from(words) {
    Ok(parsed) => {
      debug!(line = %line, "shell command");
      if let Err(e) = dispatch(parsed.command, session) {
        print_error(&format!("{:#}", e));
      }
    }
    Err(e) => {
      let _ = e.print();
    }
  }
  Step::Continue
}
