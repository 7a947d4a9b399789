use std::cell::RefCell;
use std::rc::Rc;

use mlua::prelude::*;
use thiserror::Error;
use tracing::debug;

use super::runtime::{create_runtime, render_values};

/// Default ceiling on Lua heap usage for one run.
pub const DEFAULT_MEMORY_LIMIT: usize = 64 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ScriptError {
  #[error("syntax error in '{name}': {message}")]
  Syntax { name: String, message: String },

  #[error("'{name}' ran out of memory")]
  OutOfMemory { name: String },

  #[error("error running '{name}': {message}")]
  Runtime { name: String, message: String },

  #[error("failed to start the Lua runtime: {0}")]
  Setup(String),
}

/// What a script produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptOutput {
  /// Lines passed to `print`, in order.
  pub printed: Vec<String>,
  /// The chunk's return values, tab-joined. `None` if it returned nothing.
  pub result: Option<String>,
}

/// Executes script source held in memory.
pub trait ScriptEngine {
  fn execute(&self, name: &str, source: &str) -> Result<ScriptOutput, ScriptError>;
}

/// Sandboxed Lua 5.4. Every run gets a fresh VM.
#[derive(Debug, Clone)]
pub struct LuaEngine {
  memory_limit: Option<usize>,
}

impl Default for LuaEngine {
  fn default() -> Self {
    Self {
      memory_limit: Some(DEFAULT_MEMORY_LIMIT),
    }
  }
}

impl LuaEngine {
  pub fn new() -> Self {
    Self::default()
  }

  /// Cap the Lua heap; `None` removes the cap.
  pub fn with_memory_limit(mut self, limit: Option<usize>) -> Self {
    self.memory_limit = limit;
    self
  }
}

impl ScriptEngine for LuaEngine {
  fn execute(&self, name: &str, source: &str) -> Result<ScriptOutput, ScriptError> {
    debug!(name = %name, bytes = source.len(), "running script");

    let printed = Rc::new(RefCell::new(Vec::new()));
    let lua = create_runtime(printed.clone(), self.memory_limit).map_err(|e| ScriptError::Setup(e.to_string()))?;

    let values = lua
      .load(source)
      .set_name(format!("={}", name))
      .eval::<LuaMultiValue>()
      .map_err(|e| classify(name, e))?;

    let result = if values.is_empty() {
      None
    } else {
      Some(render_values(&lua, values).map_err(|e| classify(name, e))?)
    };

    let printed = printed.borrow().clone();
    Ok(ScriptOutput { printed, result })
  }
}

fn classify(name: &str, error: LuaError) -> ScriptError {
  match error {
    LuaError::SyntaxError { message, .. } => ScriptError::Syntax {
      name: name.to_string(),
      message,
    },
    LuaError::MemoryError(_) => ScriptError::OutOfMemory { name: name.to_string() },
    other => ScriptError::Runtime {
      name: name.to_string(),
      message: other.to_string(),
    },
  }
}
