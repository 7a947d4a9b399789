use std::cell::RefCell;
use std::rc::Rc;

use mlua::prelude::*;

/// Lines written by `print` during a run.
pub type PrintBuffer = Rc<RefCell<Vec<String>>>;

/// Base-library functions that reach the host file system.
const BLOCKED_GLOBALS: &[&str] = &["dofile", "loadfile", "require"];

/// Create a sandboxed Lua VM.
///
/// Only the table, string, math, utf8 and coroutine libraries are loaded, so
/// scripts get no `io`, `os`, `package` or `debug` access. `print` appends to
/// `printed` instead of writing to stdout.
pub fn create_runtime(printed: PrintBuffer, memory_limit: Option<usize>) -> LuaResult<Lua> {
  let libs = LuaStdLib::TABLE | LuaStdLib::STRING | LuaStdLib::MATH | LuaStdLib::UTF8 | LuaStdLib::COROUTINE;
  let lua = Lua::new_with(libs, LuaOptions::default())?;

  if let Some(limit) = memory_limit {
    lua.set_memory_limit(limit)?;
  }

  let globals = lua.globals();
  for name in BLOCKED_GLOBALS {
    globals.set(*name, LuaValue::Nil)?;
  }

  register_globals(&lua, printed)?;

  Ok(lua)
}

/// Register `print` and the `sussy` table.
fn register_globals(lua: &Lua, printed: PrintBuffer) -> LuaResult<()> {
  let print = lua.create_function(move |lua, args: LuaMultiValue| {
    let line = render_values(lua, args)?;
    printed.borrow_mut().push(line);
    Ok(())
  })?;
  lua.globals().set("print", print)?;

  let sussy = lua.create_table()?;
  sussy.set("version", env!("CARGO_PKG_VERSION"))?;
  lua.globals().set("sussy", sussy)?;

  Ok(())
}

/// Render values the way Lua's `print` does: `tostring` each, tab-separated.
pub fn render_values(lua: &Lua, values: LuaMultiValue) -> LuaResult<String> {
  let tostring: LuaFunction = lua.globals().get("tostring")?;
  let mut parts = Vec::with_capacity(values.len());
  for value in values {
    let text: LuaString = tostring.call(value)?;
    parts.push(text.to_string_lossy());
  }
  Ok(parts.join("\t"))
}
