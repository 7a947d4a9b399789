use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn added_files_survive_between_invocations() {
  let env = TestEnv::new();
  let a = env.write_file("host/a.txt", "alpha");
  let b = env.write_file("host/b.txt", "beta");

  env.sussy_cmd().args(["fm", "add"]).arg(&a).assert().success();
  env.sussy_cmd().args(["fm", "add"]).arg(&b).assert().success();
  env.sussy_cmd().args(["fm", "remove", "a.txt"]).assert().success();

  env
    .sussy_cmd()
    .args(["fm", "list"])
    .assert()
    .success()
    .stdout(predicate::str::contains("b.txt"))
    .stdout(predicate::str::contains("a.txt").not());
}

#[test]
fn list_json_reports_sizes() {
  let env = TestEnv::new();
  let host = env.write_file("notes.txt", "twelve bytes");

  env
    .sussy_cmd()
    .args(["fm", "add"])
    .arg(&host)
    .args(["--name", "docs/notes.txt"])
    .assert()
    .success();

  let output = env.sussy_cmd().args(["fm", "list", "-o", "json"]).output().unwrap();
  assert!(output.status.success());

  let entries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(entries[0]["name"], "docs/notes.txt");
  assert_eq!(entries[0]["size"], 12);
}

#[test]
fn overwrite_and_edit_replace_content() {
  let env = TestEnv::new();
  let original = env.write_file("a.txt", "one");
  let replacement = env.write_file("replacement.txt", "two");

  env.sussy_cmd().args(["fm", "add"]).arg(&original).assert().success();
  env
    .sussy_cmd()
    .args(["fm", "overwrite", "a.txt"])
    .arg(&replacement)
    .assert()
    .success();
  env
    .sussy_cmd()
    .args(["fm", "read", "a.txt"])
    .assert()
    .success()
    .stdout(predicate::str::contains("two"));

  env
    .sussy_cmd()
    .args(["fm", "edit", "a.txt", "three"])
    .assert()
    .success();
  env
    .sussy_cmd()
    .args(["fm", "read", "a.txt"])
    .assert()
    .success()
    .stdout(predicate::str::contains("three"));
}

#[test]
fn edit_missing_entry_fails() {
  let env = TestEnv::new();

  env
    .sussy_cmd()
    .args(["fm", "edit", "ghost.txt", "boo"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("no entry named 'ghost.txt'"));
}

#[test]
fn binary_files_are_not_printed() {
  let env = TestEnv::new();
  let host = env.write_file("blob.bin", [0xffu8, 0xfe, 0x00, 0x80]);

  env.sussy_cmd().args(["fm", "add"]).arg(&host).assert().success();

  env
    .sussy_cmd()
    .args(["fm", "read", "blob.bin"])
    .assert()
    .success()
    .stderr(predicate::str::contains("binary file"));
}

#[test]
fn extract_writes_to_directory() {
  let env = TestEnv::new();
  let host = env.write_file("photo.png", "pixels");
  let out = env.temp.path().join("out");

  env.sussy_cmd().args(["fm", "add"]).arg(&host).assert().success();
  env
    .sussy_cmd()
    .args(["fm", "extract", "photo.png", "--to"])
    .arg(&out)
    .assert()
    .success();

  assert_eq!(std::fs::read(out.join("photo.png")).unwrap(), b"pixels");
}

#[test]
fn wipe_with_force_keeps_an_empty_memory() {
  let env = TestEnv::new();
  let host = env.write_file("a.txt", "a");

  env.sussy_cmd().args(["fm", "add"]).arg(&host).assert().success();
  env.sussy_cmd().args(["fm", "wipe", "--force"]).assert().success();

  assert!(env.memory_path().exists());
  env
    .sussy_cmd()
    .args(["fm", "list"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Memory is empty"));
}
