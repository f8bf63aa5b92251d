//! End-to-end tests driving the `thon` binary through stdin.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

fn thon_binary() -> String {
    env!("CARGO_BIN_EXE_thon").to_string()
}

/// Builds a command isolated from the user's config and environment.
fn thon(home: &Path) -> Command {
    let mut cmd = Command::new(thon_binary());
    cmd.env("HOME", home)
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("THON_TICK_INTERVAL_MS")
        .env_remove("THON_ECHO_TICKS")
        .env_remove("THON_DEFAULT_CATEGORY")
        .env_remove("RUST_LOG");
    cmd
}

/// Runs the shell with `script` on stdin and returns its output.
fn run_script(cmd: &mut Command, script: &str) -> Output {
    let mut child = cmd
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn thon");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(script.as_bytes())
        .unwrap();

    child.wait_with_output().expect("failed to wait for thon")
}

fn stdout_of(output: &Output) -> String {
    assert!(
        output.status.success(),
        "thon should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).unwrap()
}

/// Test a full start → pause → resume → stop session, then list and stats.
#[test]
fn test_full_session() {
    let temp = TempDir::new().unwrap();
    let script = "\
start \"Write spec\" -c Work -l deep-work -d \"first pass\"
status
pause
resume
stop
list
stats
quit
";

    let output = run_script(&mut thon(temp.path()), script);
    let stdout = stdout_of(&output);

    assert!(
        stdout.contains("Started \"Write spec\" in Work."),
        "{stdout}"
    );
    assert!(stdout.contains("Running  00:00:0"), "{stdout}");
    assert!(stdout.contains("Paused at 00:00:0"), "{stdout}");
    assert!(stdout.contains("Resumed at 00:00:0"), "{stdout}");
    assert!(
        stdout.contains("Stopped \"Write spec\" after 00:00:0"),
        "{stdout}"
    );
    assert!(stdout.contains("- Write spec  0h 0m"), "{stdout}");
    assert!(stdout.contains("  first pass"), "{stdout}");
    assert!(stdout.contains("  labels: deep-work"), "{stdout}");
    assert!(stdout.contains("Total: 0h 0m"), "{stdout}");
    assert!(stdout.contains("By label:\n  deep-work  0h 0m"), "{stdout}");
    assert!(!stdout.contains("Discarding"), "{stdout}");
}

/// Test that required fields are enforced at the shell boundary.
#[test]
fn test_start_rejects_missing_fields() {
    let temp = TempDir::new().unwrap();
    let script = "start \"\" -c Work\nstart coding\nstatus\n";

    let output = run_script(&mut thon(temp.path()), script);
    let stdout = stdout_of(&output);

    assert!(
        stdout.contains("Not started: title cannot be empty."),
        "{stdout}"
    );
    assert!(
        stdout.contains("Not started: category cannot be empty."),
        "{stdout}"
    );
    assert!(stdout.contains("Idle."), "{stdout}");
}

/// Test that end of input ends the shell and discards the active session.
#[test]
fn test_end_of_input_exits_cleanly() {
    let temp = TempDir::new().unwrap();
    let output = run_script(&mut thon(temp.path()), "start a -c Work\n");
    let stdout = stdout_of(&output);

    assert!(
        stdout.ends_with("Discarding active session \"a\".\n"),
        "{stdout}"
    );
}

/// Test deleting an entry by the ID shown in JSON output.
#[test]
fn test_delete_entry() {
    let temp = TempDir::new().unwrap();
    let output = run_script(
        &mut thon(temp.path()),
        "start a -c Work\nstop\nstart b -c Home\nstop\nlist --json\n",
    );
    let stdout = stdout_of(&output);

    let json_start = stdout.find('[').unwrap();
    let json_end = stdout.rfind(']').unwrap();
    let entries: serde_json::Value =
        serde_json::from_str(&stdout[json_start..=json_end]).unwrap();
    assert_eq!(entries[0]["title"], "b");
    assert_eq!(entries[1]["title"], "a");
    let id = entries[1]["id"].as_str().unwrap().to_string();

    let output = run_script(&mut thon(temp.path()), &format!("delete {id}\nlist\n"));
    let stdout = stdout_of(&output);
    // Nothing persists between runs.
    assert!(
        stdout.contains(&format!("No entry with id {id}.")),
        "{stdout}"
    );
    assert!(stdout.contains("No entries yet."), "{stdout}");
}

/// Test that configuration layers: file, then environment.
#[test]
fn test_config_layers() {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("thon.toml");
    std::fs::write(
        &config_path,
        "tick_interval_ms = 500\ndefault_category = \"Work\"\n",
    )
    .unwrap();

    let output = thon(temp.path())
        .arg("config")
        .arg("--config")
        .arg(&config_path)
        .env("THON_ECHO_TICKS", "true")
        .output()
        .unwrap();
    let stdout = stdout_of(&output);
    let config: serde_json::Value = serde_json::from_str(&stdout).unwrap();

    assert_eq!(config["tick_interval_ms"], 500);
    assert_eq!(config["echo_ticks"], true);
    assert_eq!(config["default_category"], "Work");

    let output = run_script(
        thon(temp.path()).arg("--config").arg(&config_path),
        "start coding\nquit\n",
    );
    let stdout = stdout_of(&output);
    assert!(stdout.contains("Started \"coding\" in Work."), "{stdout}");
}

/// Test that a zero tick interval is rejected before the shell starts.
#[test]
fn test_zero_tick_interval_rejected() {
    let temp = TempDir::new().unwrap();
    let output = thon(temp.path())
        .env("THON_TICK_INTERVAL_MS", "0")
        .stdin(Stdio::null())
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(
        String::from_utf8_lossy(&output.stderr)
            .contains("tick_interval_ms must be greater than zero")
    );
}
