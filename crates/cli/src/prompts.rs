use anyhow::{Result, bail};
use std::io::{self, BufRead, IsTerminal, Write};

pub fn confirm(message: &str, force: bool) -> Result<bool> {
  if force {
    return Ok(true);
  }

  if !io::stdin().is_terminal() || !io::stderr().is_terminal() {
    bail!("Cannot prompt for confirmation in non-interactive mode. Use --force to proceed.");
  }

  write!(io::stderr(), "{} [y/N] ", message)?;
  io::stderr().flush()?;

  let mut input = String::new();
  io::stdin().read_line(&mut input)?;

  Ok(matches!(input.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

/// Show `message` on stderr and read one line from `input`.
///
/// Returns `None` at end of input. The trailing newline is removed.
pub fn ask<R: BufRead>(input: &mut R, message: &str) -> Result<Option<String>> {
  write!(io::stderr(), "{}", message)?;
  io::stderr().flush()?;

  let mut line = String::new();
  if input.read_line(&mut line)? == 0 {
    return Ok(None);
  }
  Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}
