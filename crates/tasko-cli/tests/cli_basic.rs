//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run against an isolated data
//! directory and verify outputs.

use std::path::Path;
use std::process::Command;

/// Run a CLI command against `data_dir` and return (stdout, stderr, code).
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "tasko-cli", "--quiet", "--"])
        .args(args)
        .env("TASKO_DATA_DIR", data_dir)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn timer_set_start_tick_status() {
    let dir = tempfile::tempdir().unwrap();

    let (_, stderr, code) = run_cli(dir.path(), &["timer", "set", "2"]);
    assert_eq!(code, 0, "timer set failed: {stderr}");

    let (_, stderr, code) = run_cli(dir.path(), &["timer", "start"]);
    assert_eq!(code, 0, "timer start failed: {stderr}");

    let (stdout, stderr, code) = run_cli(dir.path(), &["timer", "tick", "--count", "120"]);
    assert_eq!(code, 0, "timer tick failed: {stderr}");
    assert!(
        stdout.contains("timer_completed") || stdout.contains("TimerCompleted"),
        "expected a completion event in: {stdout}"
    );

    let (stdout, _, code) = run_cli(dir.path(), &["timer", "status"]);
    assert_eq!(code, 0);
    let snapshot: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(snapshot["remaining_secs"], 0);
    assert_eq!(snapshot["running"], false);

    // The two completed minutes landed in the ledger.
    let (stdout, _, code) = run_cli(dir.path(), &["rewards", "list"]);
    assert_eq!(code, 0);
    let ledger: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(ledger["total_focus_minutes"], 2);
}

#[test]
fn timer_state_persists_between_invocations() {
    let dir = tempfile::tempdir().unwrap();

    run_cli(dir.path(), &["timer", "set", "5"]);
    run_cli(dir.path(), &["timer", "start"]);
    run_cli(dir.path(), &["timer", "tick", "--count", "10"]);
    run_cli(dir.path(), &["timer", "pause"]);

    let (stdout, _, code) = run_cli(dir.path(), &["timer", "status"]);
    assert_eq!(code, 0);
    let snapshot: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(snapshot["remaining_secs"], 290);
    assert_eq!(snapshot["phase"], "paused");
}

#[test]
fn rewards_list_and_manual_unlock() {
    let dir = tempfile::tempdir().unwrap();

    let (stdout, _, code) = run_cli(dir.path(), &["rewards", "list"]);
    assert_eq!(code, 0);
    let ledger: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(ledger["rewards"].as_array().unwrap().len(), 5);

    let (stdout, _, code) = run_cli(dir.path(), &["rewards", "unlock", "galaxy"]);
    assert_eq!(code, 0);
    let ledger: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let galaxy = ledger["rewards"]
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["id"] == "galaxy")
        .unwrap();
    assert_eq!(galaxy["unlocked"], true);
    assert_eq!(ledger["total_focus_minutes"], 0);
}

#[test]
fn task_crud_and_timer_flow() {
    let dir = tempfile::tempdir().unwrap();

    let (stdout, stderr, code) = run_cli(
        dir.path(),
        &["task", "create", "Write report", "--priority", "high"],
    );
    assert_eq!(code, 0, "task create failed: {stderr}");
    let task: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let id = task["id"].as_str().unwrap().to_string();

    let (_, stderr, code) = run_cli(dir.path(), &["task", "start", &id]);
    assert_eq!(code, 0, "task start failed: {stderr}");

    let (stdout, _, code) = run_cli(dir.path(), &["task", "get", &id]);
    assert_eq!(code, 0);
    let task: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(task["timer_status"], "running");

    let (stdout, _, code) = run_cli(dir.path(), &["task", "finish", &id]);
    assert_eq!(code, 0);
    let task: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(task["completed"], true);

    let (_, _, code) = run_cli(dir.path(), &["task", "delete", &id]);
    assert_eq!(code, 0);
    let (stdout, _, _) = run_cli(dir.path(), &["task", "list"]);
    let tasks: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert!(tasks.as_array().unwrap().is_empty());
}

#[test]
fn finished_task_timer_rejects_restart() {
    let dir = tempfile::tempdir().unwrap();

    let (stdout, _, _) = run_cli(dir.path(), &["task", "create", "One shot"]);
    let task: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let id = task["id"].as_str().unwrap().to_string();

    run_cli(dir.path(), &["task", "start", &id]);
    run_cli(dir.path(), &["task", "finish", &id]);

    let (_, stderr, code) = run_cli(dir.path(), &["task", "start", &id]);
    assert_ne!(code, 0);
    assert!(stderr.contains("error"), "expected an error, got: {stderr}");
}

#[test]
fn category_defaults_are_seeded() {
    let dir = tempfile::tempdir().unwrap();

    let (stdout, _, code) = run_cli(dir.path(), &["category", "list"]);
    assert_eq!(code, 0);
    let categories: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let names: Vec<&str> = categories
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    for expected in ["Work", "Personal", "Shopping", "Health"] {
        assert!(names.contains(&expected), "missing category {expected}");
    }
}

#[test]
fn blocklist_follows_running_tasks() {
    let dir = tempfile::tempdir().unwrap();

    let (stdout, _, code) = run_cli(
        dir.path(),
        &["blocklist", "add", "youtube.com", "--name", "YouTube"],
    );
    assert_eq!(code, 0);
    let resource: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let resource_id = resource["id"].as_str().unwrap().to_string();

    // No running task yet: blocking is off.
    let (stdout, _, _) = run_cli(dir.path(), &["blocklist", "active"]);
    let update: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(update["is_blocking"], false);

    let (stdout, _, _) = run_cli(
        dir.path(),
        &["task", "create", "Focus", "--block", &resource_id],
    );
    let task: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let task_id = task["id"].as_str().unwrap().to_string();
    run_cli(dir.path(), &["task", "start", &task_id]);

    let (stdout, _, _) = run_cli(dir.path(), &["blocklist", "active"]);
    let update: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(update["is_blocking"], true);
    assert_eq!(update["resources"].as_array().unwrap().len(), 1);
}

#[test]
fn config_get_set_roundtrip() {
    let dir = tempfile::tempdir().unwrap();

    let (stdout, _, code) = run_cli(dir.path(), &["config", "get", "timer.focus_duration_min"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "25");

    let (_, _, code) = run_cli(
        dir.path(),
        &["config", "set", "timer.focus_duration_min", "50"],
    );
    assert_eq!(code, 0);

    let (stdout, _, _) = run_cli(dir.path(), &["config", "get", "timer.focus_duration_min"]);
    assert_eq!(stdout.trim(), "50");

    let (_, _, code) = run_cli(dir.path(), &["config", "get", "no.such.key"]);
    assert_ne!(code, 0);
}

#[test]
fn stats_commands_run() {
    let dir = tempfile::tempdir().unwrap();

    run_cli(dir.path(), &["task", "create", "Counted"]);
    let (stdout, _, code) = run_cli(dir.path(), &["stats", "overview"]);
    assert_eq!(code, 0);
    let overview: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(overview["total"], 1);

    let (stdout, _, code) = run_cli(dir.path(), &["stats", "weekly"]);
    assert_eq!(code, 0);
    let week: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(week.as_array().unwrap().len(), 7);
}
