//! CLI tests for the `atparse parse` and `atparse classify` subcommands.

use std::fs;
use std::io::Write;
use std::process::{Command, Stdio};

use assert_cmd::cargo;

fn atparse_cmd() -> Command {
    Command::new(cargo::cargo_bin!("atparse"))
}

fn write_temp_input(content: &str) -> (tempfile::TempDir, String) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("input.txt");
    fs::write(&path, content).expect("write temp input");
    (dir, path.to_string_lossy().to_string())
}

fn run_with_stdin(args: &[&str], stdin_body: &str) -> std::process::Output {
    let mut child = atparse_cmd()
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn atparse command");

    {
        let stdin = child.stdin.as_mut().expect("stdin handle");
        stdin.write_all(stdin_body.as_bytes()).expect("write stdin body");
    }

    child.wait_with_output().expect("wait for output")
}

#[test]
fn parse_help_shows_file_argument() {
    let output = atparse_cmd().args(["parse", "--help"]).output().expect("run parse help");
    assert!(
        output.status.success(),
        "expected parse help to succeed, stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("FILE"), "missing FILE in parse help output: {stdout}");
}

#[test]
fn parse_json_emits_token_array_with_kinds() {
    let (_dir, path) = write_temp_input("+CEREG: 2,\"76C1\",\"0102DA04\", 7\r\nOK\r\n");

    let output = atparse_cmd()
        .args(["--output", "json", "parse", &path])
        .output()
        .expect("run parse");
    assert!(
        output.status.success(),
        "expected parse to succeed, stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON token array");
    let tokens = parsed.as_array().expect("token array");
    assert_eq!(tokens[0]["kind"], "NOTIF");
    assert_eq!(tokens[1]["kind"], "INT");
    assert_eq!(tokens[2]["kind"], "QUOTED_STRING");
}

#[test]
fn parse_reads_from_stdin_by_default() {
    let output = run_with_stdin(&["--output", "json", "parse"], "AT+CGMI\r\n");
    assert!(
        output.status.success(),
        "expected stdin parse to succeed, stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON token array");
    assert_eq!(parsed[0]["kind"], "CMD_SET");
    assert_eq!(parsed[0]["text"], "AT+CGMI");
}

#[test]
fn parse_rejects_empty_input() {
    let (_dir, path) = write_temp_input("");
    let output = atparse_cmd()
        .args(["--output", "json", "parse", &path])
        .output()
        .expect("run parse");
    assert!(!output.status.success(), "expected empty input to be rejected");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON error envelope");
    assert_eq!(parsed["success"], false);
    assert_eq!(parsed["error"], "command_failed");
    assert!(parsed["message"].as_str().unwrap().contains("out of range"));
}

#[test]
fn classify_json_reports_cmd_set_for_assignment() {
    let output = atparse_cmd()
        .args(["--output", "json", "classify", "AT+CCLK=\"18/12/06,22:10:00+08\""])
        .output()
        .expect("run classify");
    assert!(
        output.status.success(),
        "expected classify to succeed, stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(parsed["kind"], "CMD_SET");
}

#[test]
fn classify_json_reports_cmd_test_for_query_suffix() {
    let output = atparse_cmd()
        .args(["--output", "json", "classify", "AT+CFUN=?"])
        .output()
        .expect("run classify");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(parsed["kind"], "CMD_TEST");
}
