//! Line-oriented script editing.
//!
//! Scripts are written and modified one line at a time. Each line is trimmed
//! on entry, and the script is stored as the lines joined with `\n`.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProgramError {
  #[error("line {line} is out of range (program has {len} lines)")]
  LineOutOfRange { line: usize, len: usize },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
  lines: Vec<String>,
}

impl Program {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn from_source(source: &str) -> Self {
    Self {
      lines: source.lines().map(str::to_string).collect(),
    }
  }

  /// Collect lines until `sentinel` (or the end of input).
  pub fn collect_until_sentinel<I, S>(lines: I, sentinel: &str) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let mut program = Self::new();
    for line in lines {
      let line = line.as_ref().trim();
      if line == sentinel {
        break;
      }
      program.push_line(line);
    }
    program
  }

  pub fn to_source(&self) -> String {
    self.lines.join("\n")
  }

  pub fn push_line(&mut self, text: &str) {
    self.lines.push(text.trim().to_string());
  }

  /// Replace line `line` (1-based).
  pub fn set_line(&mut self, line: usize, text: &str) -> Result<(), ProgramError> {
    let len = self.lines.len();
    match line.checked_sub(1).and_then(|index| self.lines.get_mut(index)) {
      Some(slot) => {
        *slot = text.trim().to_string();
        Ok(())
      }
      None => Err(ProgramError::LineOutOfRange { line, len }),
    }
  }

  pub fn len(&self) -> usize {
    self.lines.len()
  }

  pub fn is_empty(&self) -> bool {
    self.lines.is_empty()
  }

  /// Lines paired with their 1-based numbers.
  pub fn numbered(&self) -> impl Iterator<Item = (usize, &str)> {
    self.lines.iter().enumerate().map(|(index, line)| (index + 1, line.as_str()))
  }
}
