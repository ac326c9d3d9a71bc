//! End-to-end smoke tests: spawn the pulse-hook binary with a temp HOME,
//! feed it hook payloads on stdin, and inspect the exit code and task
//! database. Notification transports are absent in the test environment, so
//! delivery falls through its best-effort path without affecting exit codes.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use tempfile::TempDir;

fn run_hook(home: &Path, event: &str, payload: Option<&str>) -> ExitStatus {
    let mut child = Command::new(env!("CARGO_BIN_EXE_pulse-hook"))
        .arg(event)
        .env("HOME", home)
        .env("NOTIFICATION_EDITOR", "zed")
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("Failed to spawn pulse-hook");

    if let Some(payload) = payload {
        child
            .stdin
            .as_mut()
            .expect("stdin handle")
            .write_all(payload.as_bytes())
            .expect("write payload");
    }
    drop(child.stdin.take());

    child.wait().expect("wait for pulse-hook")
}

fn db_path(home: &Path) -> PathBuf {
    home.join(".claude").join("pulse").join("tasks.db")
}

fn task_rows(home: &Path, session_id: &str) -> Vec<(i64, Option<String>, Option<i64>)> {
    let conn = rusqlite::Connection::open(db_path(home)).expect("open tasks db");
    let mut stmt = conn
        .prepare(
            "SELECT seq, completed_at, duration_seconds FROM tasks \
             WHERE session_id = ?1 ORDER BY id ASC",
        )
        .expect("prepare query");
    let rows = stmt
        .query_map([session_id], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?))
        })
        .expect("query tasks");
    rows.collect::<Result<Vec<_>, _>>().expect("collect tasks")
}

#[test]
fn work_started_persists_task_with_seq_one() {
    let home = TempDir::new().expect("temp HOME");

    let status = run_hook(
        home.path(),
        "WorkStarted",
        Some(
            r#"{"hook_event_name": "WorkStarted", "session_id": "smoke-1",
                "prompt": "fix the tests", "cwd": "/tmp/project"}"#,
        ),
    );

    assert!(status.success());
    let rows = task_rows(home.path(), "smoke-1");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].0, 1);
    assert!(rows[0].1.is_none());
}

#[test]
fn work_cycle_closes_the_task() {
    let home = TempDir::new().expect("temp HOME");

    let started = run_hook(
        home.path(),
        "WorkStarted",
        Some(
            r#"{"hook_event_name": "WorkStarted", "session_id": "smoke-2",
                "prompt": "build it", "cwd": "/tmp/project"}"#,
        ),
    );
    assert!(started.success());

    let stopped = run_hook(
        home.path(),
        "WorkStopped",
        Some(r#"{"hook_event_name": "WorkStopped", "session_id": "smoke-2", "cwd": "/tmp/project"}"#),
    );
    assert!(stopped.success());

    let rows = task_rows(home.path(), "smoke-2");
    assert_eq!(rows.len(), 1);
    assert!(rows[0].1.is_some());
    assert!(rows[0].2.expect("duration recorded") >= 0);
}

#[test]
fn stop_without_start_is_a_quiet_noop() {
    let home = TempDir::new().expect("temp HOME");

    let status = run_hook(
        home.path(),
        "WorkStopped",
        Some(r#"{"hook_event_name": "WorkStopped", "session_id": "smoke-3", "cwd": "/tmp"}"#),
    );

    assert!(status.success());
    assert!(task_rows(home.path(), "smoke-3").is_empty());
}

#[test]
fn malformed_json_exits_one_without_touching_the_store() {
    let home = TempDir::new().expect("temp HOME");

    let status = run_hook(home.path(), "WorkStarted", Some("this is not json {"));

    assert_eq!(status.code(), Some(1));
    assert!(!db_path(home.path()).exists());
}

#[test]
fn empty_stdin_exits_zero() {
    let home = TempDir::new().expect("temp HOME");

    let status = run_hook(home.path(), "WorkStarted", None);

    assert!(status.success());
}

#[test]
fn unknown_event_exits_one() {
    let home = TempDir::new().expect("temp HOME");

    let status = run_hook(home.path(), "Bogus", Some("{}"));

    assert_eq!(status.code(), Some(1));
}

#[test]
fn missing_event_argument_exits_one() {
    let home = TempDir::new().expect("temp HOME");

    let status = Command::new(env!("CARGO_BIN_EXE_pulse-hook"))
        .env("HOME", home.path())
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .expect("run pulse-hook");

    assert_eq!(status.code(), Some(1));
}

#[test]
fn mismatched_event_name_is_logged_but_handled() {
    let home = TempDir::new().expect("temp HOME");

    let status = run_hook(
        home.path(),
        "WorkStarted",
        Some(
            r#"{"hook_event_name": "Stop", "session_id": "smoke-4",
                "prompt": "hello", "cwd": "/tmp/project"}"#,
        ),
    );

    assert!(status.success());
    assert_eq!(task_rows(home.path(), "smoke-4").len(), 1);
}

#[test]
fn notification_event_never_fails_the_invocation() {
    let home = TempDir::new().expect("temp HOME");

    let status = run_hook(
        home.path(),
        "Notification",
        Some(
            r#"{"hook_event_name": "Notification", "session_id": "smoke-5",
                "notification_type": "permission_prompt",
                "message": "Claude needs permission", "cwd": "/tmp/project"}"#,
        ),
    );

    assert!(status.success());
}
