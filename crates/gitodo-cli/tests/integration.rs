#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn gitodo(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("gitodo").unwrap();
    cmd.current_dir(dir.path()).env("GITODO_ROOT", dir.path());
    cmd
}

fn init_project(dir: &TempDir) {
    gitodo(dir).arg("init").assert().success();
    gitodo(dir)
        .args(["repo", "add", "1", "goorung/algorithm"])
        .assert()
        .success();
}

fn json_of(dir: &TempDir, args: &[&str]) -> serde_json::Value {
    let out = gitodo(dir).arg("--json").args(args).output().unwrap();
    assert!(out.status.success(), "command failed: {args:?}");
    serde_json::from_slice(&out.stdout).unwrap()
}

fn add(dir: &TempDir, text: &str) -> String {
    let v = json_of(dir, &["todo", "add", "1", text]);
    v["id"].as_str().unwrap().to_string()
}

fn texts(dir: &TempDir) -> Vec<String> {
    json_of(dir, &["todo", "list", "1"])
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["item"]["text"].as_str().unwrap().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// gitodo init
// ---------------------------------------------------------------------------

#[test]
fn init_creates_directory_tree() {
    let dir = TempDir::new().unwrap();
    gitodo(&dir).arg("init").assert().success();

    assert!(dir.path().join(".gitodo").is_dir());
    assert!(dir.path().join(".gitodo/todos").is_dir());
    assert!(dir.path().join(".gitodo/config.yaml").exists());
    assert!(dir.path().join(".gitodo/repos.yaml").exists());
}

#[test]
fn init_is_idempotent() {
    let dir = TempDir::new().unwrap();
    gitodo(&dir).arg("init").assert().success();
    gitodo(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("exists:"));
}

#[test]
fn init_keeps_existing_config() {
    let dir = TempDir::new().unwrap();
    gitodo(&dir).arg("init").assert().success();
    let config = dir.path().join(".gitodo/config.yaml");
    std::fs::write(&config, "version: 1\ndefault_tint: '#123456'\n").unwrap();

    gitodo(&dir).arg("init").assert().success();
    assert!(std::fs::read_to_string(&config).unwrap().contains("#123456"));
}

#[test]
fn commands_before_init_fail() {
    let dir = TempDir::new().unwrap();
    gitodo(&dir)
        .args(["repo", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not initialized"));
}

// ---------------------------------------------------------------------------
// gitodo repo
// ---------------------------------------------------------------------------

#[test]
fn repo_add_and_list() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    gitodo(&dir)
        .args(["repo", "add", "3", "goorung/42", "--symbol", "*", "--color", "red"])
        .assert()
        .success();

    gitodo(&dir)
        .args(["repo", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("goorung/42"))
        .stdout(predicate::str::contains("#FFB5B5"));
}

#[test]
fn repo_add_duplicate_fails() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    gitodo(&dir)
        .args(["repo", "add", "1", "someone/else"])
        .assert()
        .failure();
}

#[test]
fn repo_add_bad_color_fails() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    gitodo(&dir)
        .args(["repo", "add", "2", "a/b", "--color", "chartreuse-ish"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid color"));
}

#[test]
fn repo_reorder_untracks_unlisted() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    gitodo(&dir).args(["repo", "add", "2", "a/b"]).assert().success();
    gitodo(&dir).args(["repo", "add", "3", "c/d"]).assert().success();

    let v = json_of(&dir, &["repo", "reorder", "3", "1"]);
    assert_eq!(v["order"], serde_json::json!([3, 1]));
    assert_eq!(v["untracked"], serde_json::json!([2]));
}

#[test]
fn repo_reorder_drops_todo_file_of_untracked() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    gitodo(&dir).args(["repo", "add", "2", "a/b"]).assert().success();
    add(&dir, "inception");

    gitodo(&dir).args(["repo", "reorder", "2"]).assert().success();
    assert!(!dir.path().join(".gitodo/todos/1.yaml").exists());

    gitodo(&dir)
        .args(["repo", "add", "1", "goorung/algorithm"])
        .assert()
        .success();
    assert!(texts(&dir).is_empty());
}

#[test]
fn repo_remove_drops_todo_file() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    add(&dir, "inception");
    assert!(dir.path().join(".gitodo/todos/1.yaml").exists());

    gitodo(&dir).args(["repo", "remove", "1"]).assert().success();
    assert!(!dir.path().join(".gitodo/todos/1.yaml").exists());
}

// ---------------------------------------------------------------------------
// gitodo todo
// ---------------------------------------------------------------------------

#[test]
fn todo_add_and_list() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let v = json_of(&dir, &["todo", "add", "1", "breathe", "deeply"]);
    assert_eq!(v["text"], "breathe deeply");
    assert_eq!(v["focus_row"], 0);

    gitodo(&dir)
        .args(["todo", "list", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("breathe deeply"));
}

#[test]
fn todo_add_to_untracked_repo_fails() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    gitodo(&dir)
        .args(["todo", "add", "99", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not tracked"));
}

#[test]
fn todo_add_after_inserts_below_reference() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let first = add(&dir, "first");
    add(&dir, "third");

    gitodo(&dir)
        .args(["todo", "add", "1", "second", "--after", &first[..8]])
        .assert()
        .success();
    assert_eq!(texts(&dir), ["first", "second", "third"]);
}

#[test]
fn todo_add_next_to_future_stamped_todo_keeps_both() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    std::fs::write(
        dir.path().join(".gitodo/todos/1.yaml"),
        "items:\n\
         - id: 11111111-1111-4111-8111-111111111111\n\
         \x20 text: synced from phone\n\
         \x20 is_complete: false\n\
         \x20 order: 0\n\
         \x20 status_changed_at: 2099-01-01T00:00:00Z\n",
    )
    .unwrap();

    let v = json_of(&dir, &["todo", "add", "1", "hello"]);
    assert_ne!(v["id"], "11111111-1111-4111-8111-111111111111");
    assert_eq!(v["focus_row"], 1);
    assert_eq!(texts(&dir), ["synced from phone", "hello"]);

    let saved = std::fs::read_to_string(dir.path().join(".gitodo/todos/1.yaml")).unwrap();
    assert!(!saved.contains("text: ''"));
}

#[test]
fn toggled_todo_sorts_after_open_ones() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let a = add(&dir, "a");
    add(&dir, "b");

    let v = json_of(&dir, &["todo", "toggle", "1", &a]);
    assert_eq!(v["is_complete"], true);
    assert_eq!(texts(&dir), ["b", "a"]);

    add(&dir, "c");
    assert_eq!(texts(&dir), ["b", "c", "a"]);
}

#[test]
fn todo_edit_with_empty_text_deletes() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let a = add(&dir, "a");
    add(&dir, "b");

    gitodo(&dir)
        .args(["todo", "edit", "1", &a, "renamed"])
        .assert()
        .success();
    assert_eq!(texts(&dir), ["renamed", "b"]);

    let v = json_of(&dir, &["todo", "edit", "1", &a]);
    assert_eq!(v["deleted"], true);
    assert_eq!(texts(&dir), ["b"]);
}

#[test]
fn todo_delete() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let a = add(&dir, "a");

    gitodo(&dir).args(["todo", "delete", "1", &a]).assert().success();
    assert!(texts(&dir).is_empty());

    gitodo(&dir)
        .args(["todo", "delete", "1", &a])
        .assert()
        .failure()
        .stderr(predicate::str::contains("todo not found"));
}

// ---------------------------------------------------------------------------
// gitodo widget / config
// ---------------------------------------------------------------------------

#[test]
fn widget_counts_per_repo() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    gitodo(&dir).args(["repo", "add", "3", "goorung/42"]).assert().success();
    let done = add(&dir, "done one");
    add(&dir, "open one");
    gitodo(&dir).args(["todo", "toggle", "1", &done]).assert().success();

    let v = json_of(&dir, &["widget"]);
    assert_eq!(v[0]["id"], 1);
    assert_eq!(v[0]["open"], 1);
    assert_eq!(v[0]["done"], 1);
    assert_eq!(v[1]["id"], 3);
    assert_eq!(v[1]["open"], 0);
}

#[test]
fn config_validate_default_is_ok() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    gitodo(&dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Config OK"));
}
