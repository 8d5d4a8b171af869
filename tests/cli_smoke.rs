use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;

fn todo(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("todo").expect("binary");
    cmd.current_dir(dir)
        .env_remove("TODO_CONFIG")
        .env_remove("RUST_LOG")
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join("xdg"));
    cmd
}

fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout is json")
}

#[test]
fn todo_help_works() {
    let dir = tempfile::tempdir().expect("tempdir");
    todo(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("to-do list"));
}

#[test]
fn subcommand_help_works() {
    let dir = tempfile::tempdir().expect("tempdir");
    for cmd in ["ui", "run"] {
        todo(dir.path()).arg(cmd).arg("--help").assert().success();
    }
}

#[test]
fn run_reads_script_from_stdin() {
    let dir = tempfile::tempdir().expect("tempdir");
    todo(dir.path())
        .args(["run", "--deterministic-ids"])
        .write_stdin("add Buy milk\nadd Walk dog\ntoggle 1\n")
        .assert()
        .success()
        .stdout(contains("- total: 2"))
        .stdout(contains("- completed: 1"))
        .stdout(contains(
            "1. [x] Buy milk (00000000-0000-0000-0000-000000000001)",
        ))
        .stdout(contains("2. [ ] Walk dog"));
}

#[test]
fn run_reads_script_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let script = dir.path().join("list.todo");
    fs::write(&script, "add A\nadd B\nadd C\nmove 1 3\n").expect("write script");

    let output = todo(dir.path())
        .args(["--json", "run"])
        .arg(&script)
        .output()
        .expect("run");
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["schema_version"], "todo.v1");
    assert_eq!(json["command"], "run");
    assert_eq!(json["status"], "success");
    let names: Vec<&str> = json["data"]["tasks"]
        .as_array()
        .expect("tasks array")
        .iter()
        .map(|task| task["content"].as_str().expect("content"))
        .collect();
    assert_eq!(names, vec!["B", "C", "A"]);
    assert_eq!(json["data"]["total"], 3);
    assert_eq!(json["data"]["completed"], 0);
    assert_eq!(json["data"]["changes"], 4);
}

#[test]
fn run_quiet_prints_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    todo(dir.path())
        .args(["--quiet", "run"])
        .write_stdin("add A\n")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn bad_script_exits_with_user_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    todo(dir.path())
        .arg("run")
        .write_stdin("add A\nfly away\n")
        .assert()
        .code(2)
        .stderr(contains("line 2"))
        .stderr(contains("hint:"));
}

#[test]
fn bad_script_json_error_envelope() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = todo(dir.path())
        .args(["run", "--json"])
        .write_stdin("toggle 0\n")
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(2));

    let json = stdout_json(&output);
    assert_eq!(json["command"], "run");
    assert_eq!(json["status"], "error");
    assert_eq!(json["error"]["code"], 2);
    assert_eq!(json["error"]["kind"], "user_error");
    assert_eq!(json["error"]["details"]["line"], 1);
}

#[test]
fn missing_explicit_config_is_user_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    todo(dir.path())
        .args(["--config", "missing.toml", "run"])
        .write_stdin("")
        .assert()
        .code(2)
        .stderr(contains("Config file not found"));
}

#[test]
fn config_env_var_is_honored() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = dir.path().join("custom.toml");
    fs::write(&config, "[tasks]\ninitial = [\"From env\"]\n").expect("write config");

    todo(dir.path())
        .env("TODO_CONFIG", &config)
        .arg("run")
        .write_stdin("")
        .assert()
        .success()
        .stdout(contains("From env"));
}

#[test]
fn local_config_seeds_initial_tasks() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(
        dir.path().join(".todo.toml"),
        "[tasks]\ninitial = [\"Buy milk\", \"Walk dog\"]\n",
    )
    .expect("write config");

    let output = todo(dir.path())
        .args(["--json", "run"])
        .write_stdin("delete 1\n")
        .output()
        .expect("run");
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["data"]["total"], 1);
    assert_eq!(json["data"]["tasks"][0]["content"], "Walk dog");
}

#[test]
fn events_to_stdout_replace_report() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = todo(dir.path())
        .args(["--events", "-", "--json", "run"])
        .write_stdin("add A\nadd  \ntoggle 1\n")
        .output()
        .expect("run");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("utf8");
    let events: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).expect("event line"))
        .collect();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["event"], "task_added");
    assert_eq!(events[1]["event"], "task_toggled");
    assert_eq!(events[1]["schema_version"], "todo.event.v1");
}

#[test]
fn events_file_collects_changes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let log = dir.path().join("events.jsonl");

    todo(dir.path())
        .args(["run", "--events"])
        .arg(&log)
        .write_stdin("add A\nadd B\nmove 2 1\ndelete 2\n")
        .assert()
        .success();

    let raw = fs::read_to_string(&log).expect("events file");
    let kinds: Vec<String> = raw
        .lines()
        .map(|line| {
            let value: serde_json::Value = serde_json::from_str(line).expect("event line");
            value["event"].as_str().expect("event").to_string()
        })
        .collect();
    assert_eq!(
        kinds,
        vec!["task_added", "task_added", "task_moved", "task_deleted"]
    );
}

#[test]
fn ui_refuses_events_on_stdout() {
    let dir = tempfile::tempdir().expect("tempdir");
    todo(dir.path())
        .args(["--events", "-", "ui"])
        .assert()
        .code(2)
        .stderr(contains("--events"));
}
