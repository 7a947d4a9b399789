//! Programmer mode: Lua scripts kept in memory.
//!
//! # Submodules
//!
//! - [`engine`] - The `ScriptEngine` seam and the Lua implementation
//! - [`program`] - Line buffer used to write and modify scripts
//! - [`runtime`] - Sandboxed Lua VM construction

pub mod engine;
pub mod program;
pub mod runtime;

pub use engine::{LuaEngine, ScriptEngine, ScriptError, ScriptOutput};
pub use program::{Program, ProgramError};
