use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn write_from_file_and_show() {
  let env = TestEnv::new();
  let source = env.write_file("script.lua", "local x = 1\nreturn x + 1\n");

  env
    .sussy_cmd()
    .args(["prog", "write", "calc.lua", "--file"])
    .arg(&source)
    .assert()
    .success();

  env
    .sussy_cmd()
    .args(["prog", "show", "calc.lua"])
    .assert()
    .success()
    .stdout(predicate::str::contains("1: local x = 1"))
    .stdout(predicate::str::contains("2: return x + 1"));

  env
    .sussy_cmd()
    .args(["prog", "run", "calc.lua"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Lua Script Output: 2"));
}

#[test]
fn write_existing_requires_force() {
  let env = TestEnv::new();

  env
    .sussy_cmd()
    .args(["prog", "write", "p.lua"])
    .write_stdin("return 1\nOS_EXIT\n")
    .assert()
    .success();

  env
    .sussy_cmd()
    .args(["prog", "write", "p.lua"])
    .write_stdin("return 2\nOS_EXIT\n")
    .assert()
    .failure()
    .stderr(predicate::str::contains("--force"));

  env
    .sussy_cmd()
    .args(["prog", "write", "p.lua", "--force"])
    .write_stdin("return 2\nOS_EXIT\n")
    .assert()
    .success();

  env
    .sussy_cmd()
    .args(["prog", "run", "p.lua"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Lua Script Output: 2"));
}

#[test]
fn modify_with_flags() {
  let env = TestEnv::new();

  env
    .sussy_cmd()
    .args(["prog", "write", "m.lua"])
    .write_stdin("print('one')\nprint('two')\nOS_EXIT\n")
    .assert()
    .success();

  env
    .sussy_cmd()
    .args(["prog", "modify", "m.lua", "--set", "2=print('TWO')", "--append", "return 'done'"])
    .assert()
    .success();

  env
    .sussy_cmd()
    .args(["prog", "run", "m.lua"])
    .assert()
    .success()
    .stdout(predicate::str::contains("one"))
    .stdout(predicate::str::contains("TWO"))
    .stdout(predicate::str::contains("Lua Script Output: done"));
}

#[test]
fn modify_interactively_on_stdin() {
  let env = TestEnv::new();

  env
    .sussy_cmd()
    .args(["prog", "write", "i.lua"])
    .write_stdin("return 1\nOS_EXIT\n")
    .assert()
    .success();

  env
    .sussy_cmd()
    .args(["prog", "modify", "i.lua"])
    .write_stdin("1\nreturn 5\nOS_EXIT\n")
    .assert()
    .success();

  env
    .sussy_cmd()
    .args(["prog", "run", "i.lua"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Lua Script Output: 5"));
}

#[test]
fn scripts_cannot_reach_the_host() {
  let env = TestEnv::new();

  env
    .sussy_cmd()
    .args(["prog", "write", "escape.lua"])
    .write_stdin("return os.execute('echo pwned')\nOS_EXIT\n")
    .assert()
    .success();

  env
    .sussy_cmd()
    .args(["prog", "run", "escape.lua"])
    .assert()
    .failure()
    .stdout(predicate::str::contains("pwned").not());
}

#[test]
fn list_numbers_programs() {
  let env = TestEnv::new();

  for name in ["a.lua", "b.lua"] {
    env
      .sussy_cmd()
      .args(["prog", "write", name])
      .write_stdin("return 0\nOS_EXIT\n")
      .assert()
      .success();
  }

  env
    .sussy_cmd()
    .args(["prog", "list"])
    .assert()
    .success()
    .stdout(predicate::str::contains("1. a.lua"))
    .stdout(predicate::str::contains("2. b.lua"));
}

#[test]
fn unreadable_stdin_saves_nothing() {
  let env = TestEnv::new();

  env
    .sussy_cmd()
    .args(["prog", "write", "broken.lua"])
    .write_stdin(b"print(1)\n\xff\xfe\nprint(2)\nOS_EXIT\n".to_vec())
    .assert()
    .failure()
    .stderr(predicate::str::contains("Failed to read line 2"));

  env
    .sussy_cmd()
    .args(["prog", "list"])
    .assert()
    .success()
    .stdout(predicate::str::contains("No programs in memory"));
}
