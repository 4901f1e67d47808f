use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

fn get_cspi_binary() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_cspi"));
    command.env_remove("RUST_LOG");
    command
}

fn write_program(name: &str, source: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("cspi-cli-{}-{}.csp", std::process::id(), name));
    std::fs::write(&path, source).expect("Failed to write program file");
    path
}

fn run_with_stdin(args: &[&str], input: &str) -> Output {
    let mut child = get_cspi_binary()
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn cspi");

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(input.as_bytes()).unwrap();
        stdin.flush().unwrap();
    }

    child.wait_with_output().expect("Failed to wait for cspi")
}

#[test]
fn test_version_flag() {
    let output = get_cspi_binary()
        .arg("--version")
        .output()
        .expect("Failed to execute cspi");

    assert!(output.status.success(), "Version flag should succeed");
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("cspi"));
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_runs_program_file() {
    let path = write_program("file", "REPEAT 2 TIMES {\n    DISPLAY(\"hi\")\n}\n");
    let output = get_cspi_binary().arg(&path).output().expect("Failed to execute cspi");
    std::fs::remove_file(&path).ok();

    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "hi\nhi\n");
}

#[test]
fn test_eval_flag() {
    let output = get_cspi_binary()
        .args(["--eval", "x ← 2\nDISPLAY(x * 21)"])
        .output()
        .expect("Failed to execute cspi");

    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap().trim(), "42");
}

#[test]
fn test_reads_stdin() {
    let output = run_with_stdin(&[], "DISPLAY(LENGTH(\"abc\"))\n");
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap().trim(), "3");
}

#[test]
fn test_runtime_error_exit_code_and_report() {
    let output = get_cspi_binary()
        .args(["--color", "never", "--eval", "DISPLAY(1)\nDISPLAY(nope)"])
        .output()
        .expect("Failed to execute cspi");

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "1\n");
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("error[E0204]: unresolved name `nope`"), "stderr: {}", stderr);
    assert!(stderr.contains("<eval>:2:9"), "stderr: {}", stderr);
}

#[test]
fn test_json_error_format() {
    let output = get_cspi_binary()
        .args(["--error-format", "json", "--eval", "x ← 1 +"])
        .output()
        .expect("Failed to execute cspi");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    let line = stderr.lines().last().expect("no diagnostic printed");
    let json: serde_json::Value = serde_json::from_str(line).expect("diagnostic should be JSON");
    assert_eq!(json["code"], "E0102");
    assert_eq!(json["line"], 1);
}

#[test]
fn test_dump_tokens() {
    let output = get_cspi_binary()
        .args(["--dump", "tokens", "--eval", "x <-- 1"])
        .output()
        .expect("Failed to execute cspi");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("\"<--\""), "stdout: {}", stdout);
    assert!(stdout.contains("end of input"), "stdout: {}", stdout);
}

#[test]
fn test_dump_ast_does_not_run() {
    let output = get_cspi_binary()
        .args(["--dump", "ast", "--eval", "DISPLAY(1)"])
        .output()
        .expect("Failed to execute cspi");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Call"), "stdout: {}", stdout);
    assert!(!stdout.lines().any(|line| line == "1"));
}

#[test]
fn test_missing_file() {
    let output = get_cspi_binary()
        .args(["--color", "never", "/definitely/not/here.csp"])
        .output()
        .expect("Failed to execute cspi");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Failed to read"));
}

#[test]
fn test_suggest_subcommand() {
    let source = "counter ← 0\nDISPLAY(cou";
    let path = write_program("suggest", source);
    let output = get_cspi_binary()
        .args(["suggest", path.to_str().unwrap(), "--caret", &source.len().to_string(), "-n", "3"])
        .output()
        .expect("Failed to execute cspi");
    std::fs::remove_file(&path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("counter\tcounter\t"), "stdout: {}", stdout);
}

#[test]
fn test_completions() {
    let output = get_cspi_binary()
        .args(["complete", "bash"])
        .output()
        .expect("Failed to execute cspi");

    assert!(output.status.success());
    assert!(String::from_utf8(output.stdout).unwrap().contains("cspi"));
}
