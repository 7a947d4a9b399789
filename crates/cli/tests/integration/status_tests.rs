use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn status_creates_memory_in_data_dir() {
  let env = TestEnv::new();

  env
    .sussy_cmd()
    .args(["status", "--offline"])
    .assert()
    .success()
    .stdout(predicate::str::contains("No memory found"));

  assert!(env.memory_path().exists());
}

#[test]
fn memory_env_var_overrides_data_dir() {
  let env = TestEnv::new();
  let custom = env.temp.path().join("custom.zip");

  env
    .sussy_cmd()
    .env("SUSSYOS_MEMORY", &custom)
    .args(["status", "--offline"])
    .assert()
    .success();

  assert!(custom.exists());
  assert!(!env.memory_path().exists());
}

#[test]
fn memory_flag_overrides_env_var() {
  let env = TestEnv::new();
  let from_env = env.temp.path().join("env.zip");
  let from_flag = env.temp.path().join("flag.zip");

  env
    .sussy_cmd()
    .env("SUSSYOS_MEMORY", &from_env)
    .arg("--memory")
    .arg(&from_flag)
    .args(["status", "--offline"])
    .assert()
    .success();

  assert!(from_flag.exists());
  assert!(!from_env.exists());
}

#[test]
fn status_reports_interrupted_rewrite() {
  let env = TestEnv::new();
  env.sussy_cmd().args(["status", "--offline"]).assert().success();

  let leftover = env.memory_path().with_file_name(".memory.zip.a1b2c3.tmp");
  std::fs::write(&leftover, b"partial").unwrap();

  env
    .sussy_cmd()
    .args(["status", "--offline"])
    .assert()
    .success()
    .stderr(predicate::str::contains("interrupted rewrite"))
    .stdout(predicate::str::contains("Memory found"));

  assert!(!leftover.exists());
}

#[test]
fn corrupt_memory_is_reported() {
  let env = TestEnv::new();
  env.write_file("data/sussyos/memory.zip", "definitely not a zip");

  env
    .sussy_cmd()
    .args(["fm", "list"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("not a valid memory container"));
}
