//! Tests for writing, editing and running programs through the public API.

use sussyos_lib::consts::PROGRAM_SENTINEL;
use sussyos_lib::script::{LuaEngine, Program, ScriptEngine, ScriptError};

#[test]
fn written_program_runs() -> Result<(), ScriptError> {
  let typed = ["local total = 0", "for i = 1, 4 do total = total + i end", "print(total)", "return total * 2"];
  let program = Program::collect_until_sentinel(typed.iter().chain([&PROGRAM_SENTINEL]), PROGRAM_SENTINEL);

  let output = LuaEngine::new().execute("sum.lua", &program.to_source())?;

  assert_eq!(output.printed, vec!["10"]);
  assert_eq!(output.result.as_deref(), Some("20"));
  Ok(())
}

#[test]
fn edited_program_runs_new_code() -> Result<(), Box<dyn std::error::Error>> {
  let mut program = Program::from_source("local greeting = 'hi'\nreturn greeting");
  program.set_line(1, "local greeting = 'hello'")?;
  program.push_line("-- trailing comment");

  let output = LuaEngine::new().execute("greet.lua", &program.to_source())?;

  assert_eq!(output.result.as_deref(), Some("hello"));
  Ok(())
}

#[test]
fn runaway_allocation_hits_memory_limit() {
  let engine = LuaEngine::new().with_memory_limit(Some(2 * 1024 * 1024));
  let result = engine.execute("hog.lua", "local t = {} for i = 1, 1e8 do t[i] = string.rep('x', 64) .. i end");

  assert!(matches!(result, Err(ScriptError::OutOfMemory { .. })));
}

#[test]
fn each_run_starts_fresh() -> Result<(), ScriptError> {
  let engine = LuaEngine::new();
  engine.execute("set.lua", "leaked = 42")?;

  let output = engine.execute("get.lua", "return leaked")?;

  assert_eq!(output.result.as_deref(), Some("nil"));
  Ok(())
}
