//! E2E tests for complete CLI workflows

use std::fs;
use std::io::Write;
use std::process::{Command, Output, Stdio};

use tempfile::NamedTempFile;

const CLI_BINARY: &str = env!("CARGO_BIN_EXE_classad-cli");

const MACHINE: &str = r#"
MyType = "Machine"
Memory = 2048
KeyboardIdle = 1200
Requirements = TARGET.Owner == "alice" || KeyboardIdle > 15 * 60
Rank = TARGET.ImageSize / 1024
"#;

const JOB: &str = r#"[
    MyType = "Job";
    Owner = "bob";
    ImageSize = 4096;
    Requirements = TARGET.Memory >= 1024
]"#;

fn run_command(args: &[&str]) -> Output {
    Command::new(CLI_BINARY)
        .args(args)
        .env_remove("CLASSAD_CONFIG")
        .env_remove("RUST_LOG")
        .output()
        .unwrap_or_else(|_| panic!("Failed to execute {CLI_BINARY}"))
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn write_temp(content: &str) -> NamedTempFile {
    let file = NamedTempFile::new().unwrap();
    fs::write(&file, content).unwrap();
    file
}

#[test]
fn test_eval_arithmetic() {
    let output = run_command(&["eval", "(1 + 2) * 3 - 10 / 4"]);

    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "7");
}

#[test]
fn test_eval_builtin_function() {
    let output = run_command(&["eval", r#"strcat("slot", 1, "@", toUpper("node"))"#]);

    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), r#""slot1@NODE""#);
}

#[test]
fn test_eval_undefined_reference() {
    let output = run_command(&["eval", "NoSuchAttribute + 1"]);

    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "undefined");
}

#[test]
fn test_eval_error_value_fails() {
    let output = run_command(&["eval", r#""a" + 1"#]);

    assert!(!output.status.success());
    assert_eq!(stdout(&output).trim(), "error");
}

#[test]
fn test_eval_syntax_error_reports_location() {
    let output = run_command(&["eval", "1 + * 2"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERR_SYNTAX"));
    assert!(stderr.contains(":1:5:"));
}

#[test]
fn test_eval_against_ads() {
    let machine = write_temp(MACHINE);
    let job = write_temp(JOB);
    let output = run_command(&[
        "eval",
        "MY.ImageSize / TARGET.Memory",
        "--my",
        job.path().to_str().unwrap(),
        "--target",
        machine.path().to_str().unwrap(),
    ]);

    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "2");
}

#[test]
fn test_parse_normalizes_old_style_ad() {
    let machine = write_temp(MACHINE);
    let output = run_command(&["parse", machine.path().to_str().unwrap()]);

    assert!(output.status.success());
    assert_eq!(
        stdout(&output).trim(),
        r#"[ MyType = "Machine"; Memory = 2048; KeyboardIdle = 1200; Requirements = TARGET.Owner == "alice" || KeyboardIdle > 15 * 60; Rank = TARGET.ImageSize / 1024 ]"#
    );
}

#[test]
fn test_parse_json_from_stdin() {
    let mut child = Command::new(CLI_BINARY)
        .args(["parse", "--json"])
        .env_remove("CLASSAD_CONFIG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(JOB.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["Owner"], "bob");
    assert_eq!(json["ImageSize"], 4096);
    assert_eq!(json["Requirements"], "/Expr(TARGET.Memory >= 1024)/");
}

#[test]
fn test_parse_missing_file() {
    let output = run_command(&["parse", "definitely_missing.ad"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to read ad file"));
}

#[test]
fn test_match_success() {
    let machine = write_temp(MACHINE);
    let job = write_temp(JOB);
    let output = run_command(&[
        "match",
        machine.path().to_str().unwrap(),
        job.path().to_str().unwrap(),
    ]);

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("left rank: 4"));
    assert_eq!(text.lines().last(), Some("match"));
}

#[test]
fn test_match_failure_exit_code() {
    let machine = write_temp("Memory = 512\nRequirements = true");
    let job = write_temp(JOB);
    let output = run_command(&[
        "match",
        machine.path().to_str().unwrap(),
        job.path().to_str().unwrap(),
    ]);

    assert_eq!(output.status.code(), Some(2));
    assert_eq!(stdout(&output).lines().last(), Some("no match"));
}

#[test]
fn test_config_from_environment() {
    let config = write_temp(
        r#"
[user_maps.groups]
bob = ["physics", "biology"]
"#,
    );
    let output = Command::new(CLI_BINARY)
        .args(["eval", r#"userMap("groups", "bob", "biology")"#])
        .env("CLASSAD_CONFIG", config.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), r#""biology""#);
}

#[test]
fn test_functions_lists_builtins() {
    let output = run_command(&["functions"]);

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.lines().any(|line| line == "ifthenelse"));
    assert!(text.lines().any(|line| line == "stringlistmember"));
}

#[test]
fn test_missing_subcommand() {
    let output = run_command(&[]);

    assert!(!output.status.success());
}
