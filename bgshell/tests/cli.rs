// SPDX-License-Identifier: MIT

use std::io::Write;
use std::process::{Command, Output, Stdio};

fn run_with_stdin(args: &[&str], input: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_bgshell"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to start bgshell");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    child.wait_with_output().expect("bgshell did not finish")
}

#[test]
fn piped_session_lists_a_job() {
    let out = run_with_stdin(
        &["--grace-period-ms", "200"],
        // the job keeps our stdout pipe open, so it has to be short lived
        "bg sleep 1\nbglist\nexit\n",
    );
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    let first = stdout.lines().next().unwrap();
    assert!(first.ends_with(": sleep  1"), "unexpected listing: {stdout}");
    assert!(stdout.contains("Total background jobs: 1\n"));
    assert!(stdout.ends_with("Good Bye\n"));
}

fn assert_reported_once(out: &Output) {
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert_eq!(stdout, "Total background jobs: 0\nGood Bye\n");
    assert_eq!(
        stderr.matches("Error: execution of doesnotexist123 failed").count(),
        1,
        "stderr: {stderr}"
    );
}

#[test]
fn missing_program_reports_once_after_grace_period() {
    let out = run_with_stdin(&["--grace-period-ms", "200"], "bg doesnotexist123\nbglist\n");
    assert_reported_once(&out);
}

#[test]
fn missing_program_reports_once_through_exec_pipe() {
    let out = run_with_stdin(
        &["--launch-check", "exec-pipe"],
        "bg doesnotexist123\nbglist\n",
    );
    assert_reported_once(&out);
}

#[test]
fn script_file_is_executed() {
    let dir = std::env::temp_dir().join(format!("bgshell-cli-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let script = dir.join("script.txt");
    std::fs::write(&script, "bgkill abc\nbglist\nbye\n").unwrap();

    let out = run_with_stdin(&["--script", script.to_str().unwrap()], "");
    assert!(out.status.success());
    assert_eq!(
        String::from_utf8_lossy(&out.stdout),
        "Total background jobs: 0\nGood Bye\n"
    );
    assert!(String::from_utf8_lossy(&out.stderr).contains("bgkill: p_id argument must be a number"));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn invalid_arguments_exit_with_two() {
    let out = run_with_stdin(&["--launch-check", "exec-pipe", "--grace-period-ms", "5"], "");
    assert_eq!(out.status.code(), Some(2));
}
