use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn focusflow(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("focusflow").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("RUST_LOG")
        .args(["--backend", "key-value", "--data-dir"])
        .arg(dir.path().join("data"));
    cmd
}

fn list_json(dir: &TempDir) -> Vec<serde_json::Value> {
    let output = focusflow(dir).args(["list", "--json"]).assert().success();
    serde_json::from_slice(&output.get_output().stdout).unwrap()
}

#[test]
fn test_first_run_lists_sample_tasks() {
    let dir = TempDir::new().unwrap();

    focusflow(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Welcome to FocusFlow"))
        .stdout(predicate::str::contains("Offline First"))
        .stdout(predicate::str::contains("Strict Privacy"));

    assert!(dir.path().join("data").join("tasks.json").exists());
}

#[test]
fn test_add_then_list_json() {
    let dir = TempDir::new().unwrap();

    focusflow(&dir)
        .args(["add", "Write report", "-d", "quarterly", "-t", "work", "--due", "2026-05-01"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Created task "));

    let tasks = list_json(&dir);
    assert_eq!(tasks.len(), 4);
    let added = tasks.iter().find(|t| t["title"] == "Write report").unwrap();
    assert_eq!(added["status"], "todo");
    assert_eq!(added["order"], 3);
    assert_eq!(added["tags"], serde_json::json!(["work"]));
    assert!(added["dueDate"].is_i64());
}

#[test]
fn test_empty_title_is_blocked() {
    let dir = TempDir::new().unwrap();

    focusflow(&dir)
        .args(["add", "   "])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("title cannot be empty"));
}

fn task_json(dir: &TempDir, id: &str) -> serde_json::Value {
    list_json(dir)
        .into_iter()
        .find(|t| t["id"] == id)
        .unwrap()
}

#[test]
fn test_update_sets_fields() {
    let dir = TempDir::new().unwrap();

    focusflow(&dir)
        .args(["update", "1", "--title", "X", "--tag", "a", "--tag", "a", "--due", "2026-01-01"])
        .assert()
        .success();

    let task = task_json(&dir, "1");
    assert_eq!(task["title"], "X");
    assert_eq!(task["tags"], serde_json::json!(["a"]));
    assert!(task["dueDate"].is_i64());
}

#[test]
fn test_update_clears_fields() {
    let dir = TempDir::new().unwrap();

    focusflow(&dir)
        .args(["update", "1", "--description", "notes", "--tag", "work", "--due", "2026-01-01"])
        .assert()
        .success();
    focusflow(&dir)
        .args(["update", "1", "--due", "none", "--description", "", "--clear-tags"])
        .assert()
        .success();

    let task = task_json(&dir, "1");
    assert!(task.get("dueDate").is_none());
    assert!(task.get("description").is_none());
    assert!(task.get("tags").is_none());
    assert!(task["title"].is_string());
}

#[test]
fn test_update_without_changes_is_blocked() {
    let dir = TempDir::new().unwrap();
    let before = list_json(&dir);

    focusflow(&dir)
        .args(["update", "1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("nothing to update"));
    focusflow(&dir)
        .args(["update", "1", "--title", " "])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("title cannot be empty"));

    assert_eq!(list_json(&dir), before);
}

#[test]
fn test_list_recent_puts_newest_first() {
    let dir = TempDir::new().unwrap();

    focusflow(&dir)
        .args(["list", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Newest first"));

    // The samples are seeded by this first run
    list_json(&dir);
    focusflow(&dir).args(["add", "Latest"]).assert().success();

    let output = focusflow(&dir)
        .args(["list", "--recent", "--json"])
        .assert()
        .success();
    let tasks: Vec<serde_json::Value> = serde_json::from_slice(&output.get_output().stdout).unwrap();
    assert_eq!(tasks.len(), 4);
    assert_eq!(tasks[0]["title"], "Latest");
}

#[test]
fn test_status_then_filter() {
    let dir = TempDir::new().unwrap();

    focusflow(&dir)
        .args(["status", "1", "completed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Moved 1 to Completed"));

    let output = focusflow(&dir)
        .args(["list", "--active", "--json"])
        .assert()
        .success();
    let active: Vec<serde_json::Value> = serde_json::from_slice(&output.get_output().stdout).unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["id"], "2");
}

#[test]
fn test_drag_onto_column_changes_status() {
    let dir = TempDir::new().unwrap();

    focusflow(&dir)
        .args(["drag", "1", "in-progress"])
        .assert()
        .success()
        .stdout(predicate::str::contains("moved 1 to In Progress"));

    let tasks = list_json(&dir);
    let moved = tasks.iter().find(|t| t["id"] == "1").unwrap();
    assert_eq!(moved["status"], "in-progress");
}

#[test]
fn test_drag_onto_nothing_changes_nothing() {
    let dir = TempDir::new().unwrap();
    let before = list_json(&dir);

    focusflow(&dir)
        .args(["drag", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("drag cancelled"));

    assert_eq!(list_json(&dir), before);
}

#[test]
fn test_delete_and_unknown_id() {
    let dir = TempDir::new().unwrap();

    focusflow(&dir).args(["delete", "3"]).assert().success();
    assert_eq!(list_json(&dir).len(), 2);

    focusflow(&dir)
        .args(["show", "3"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("task not found"));
}

#[test]
fn test_settings_round_trip() {
    let dir = TempDir::new().unwrap();

    focusflow(&dir)
        .args(["settings", "set", "--work", "45", "--theme", "dark"])
        .assert()
        .success();

    let output = focusflow(&dir)
        .args(["settings", "show", "--json"])
        .assert()
        .success();
    let settings: serde_json::Value = serde_json::from_slice(&output.get_output().stdout).unwrap();
    assert_eq!(settings["pomodoro"]["workDuration"], 45);
    assert_eq!(settings["pomodoro"]["shortBreakDuration"], 5);
    assert_eq!(settings["theme"]["mode"], "dark");
}

#[test]
fn test_database_backend_persists() {
    let dir = TempDir::new().unwrap();
    let run = || {
        let mut cmd = Command::cargo_bin("focusflow").unwrap();
        cmd.current_dir(dir.path())
            .args(["--backend", "database", "--data-dir"])
            .arg(dir.path());
        cmd
    };

    run().args(["add", "Persist me"]).assert().success();
    run()
        .arg("board")
        .assert()
        .success()
        .stdout(predicate::str::contains("Persist me"))
        .stdout(predicate::str::contains("To Do (2)"));
    assert!(dir.path().join("FocusFlowDB.sqlite3").exists());
}
