//! CLI integration tests for moi-cli
//!
//! Tests command parsing, execution output, exit codes and config handling.

use std::path::Path;
use std::process::Command;

/// Helper to run the CLI with an isolated home directory
fn run_moi_in(home: &Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_moi"))
        .args(args)
        .env("HOME", home)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute command")
}

fn run_moi(args: &[&str]) -> std::process::Output {
    let home = tempfile::tempdir().unwrap();
    run_moi_in(home.path(), args)
}

fn stdout(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn json_stdout(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout is not JSON")
}

// ==================== Help & Version Tests ====================

#[test]
fn test_cli_help() {
    let output = run_moi(&["--help"]);
    assert!(output.status.success());
    let stdout = stdout(&output);
    assert!(stdout.contains("moi"));
    assert!(stdout.contains("run"));
    assert!(stdout.contains("disasm"));
    assert!(stdout.contains("config"));
}

#[test]
fn test_cli_version() {
    let output = run_moi(&["--version"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("moi"));
}

#[test]
fn test_cli_run_help() {
    let output = run_moi(&["run", "--help"]);
    assert!(output.status.success());
    let stdout = stdout(&output);
    assert!(stdout.contains("--file"));
    assert!(stdout.contains("--gas-limit"));
}

// ==================== Run Command Tests ====================

#[test]
fn test_run_demo() {
    let output = run_moi(&["run"]);
    assert!(output.status.success());
    let stdout = stdout(&output);
    assert!(stdout.contains("[0] 0x7"));
    assert!(stdout.contains("[1] 0x40"));
    assert!(stdout.contains("Gas used: 96"));
    assert!(stdout.contains("Memory size: 64 bytes"));
}

#[test]
fn test_run_demo_json() {
    let output = run_moi(&["--json", "run"]);
    assert!(output.status.success());
    let value = json_stdout(&output);
    assert_eq!(value["success"], true);
    assert_eq!(value["stack"], serde_json::json!(["0x7", "0x40"]));
    assert_eq!(value["gas_used"], 96);
    assert_eq!(value["memory_size"], 64);
}

#[test]
fn test_run_hex_argument() {
    let output = run_moi(&["run", "0x6002600301"]);
    assert!(output.status.success());
    let stdout = stdout(&output);
    assert!(stdout.contains("[0] 0x5"));
    assert!(stdout.contains("Gas used: 9"));
}

#[test]
fn test_run_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("program.hex");
    std::fs::write(&path, "0x6002\n6003\n02\n").unwrap();

    let output = run_moi(&["--json", "run", "--file", path.to_str().unwrap()]);
    assert!(output.status.success());
    let value = json_stdout(&output);
    assert_eq!(value["stack"], serde_json::json!(["0x6"]));
    assert_eq!(value["gas_used"], 11);
}

#[test]
fn test_run_halt_exit_code() {
    let output = run_moi(&["run", "0x600101"]);
    assert_eq!(output.status.code(), Some(2));
    let stdout = stdout(&output);
    assert!(stdout.contains("[0] 0x1"));
    assert!(stdout.contains("Gas used: 3"));
    assert!(stdout.contains("stack underflow"));
}

#[test]
fn test_run_halt_json() {
    let output = run_moi(&["--json", "run", "0x6005600005"]);
    assert_eq!(output.status.code(), Some(2));
    let value = json_stdout(&output);
    assert_eq!(value["success"], false);
    assert_eq!(value["error_kind"], "DivisionByZero");
    assert_eq!(value["stack"], serde_json::json!(["0x5", "0x0"]));
    assert_eq!(value["pc"], 4);
}

#[test]
fn test_run_gas_limit_flag() {
    let output = run_moi(&["--json", "run", "0x60016002", "--gas-limit", "5"]);
    assert_eq!(output.status.code(), Some(2));
    let value = json_stdout(&output);
    assert_eq!(value["error_kind"], "OutOfGas");
    assert_eq!(value["gas_used"], 3);
}

#[test]
fn test_run_stack_limit_flag() {
    let output = run_moi(&["--json", "--stack-limit", "1", "run", "0x60016002"]);
    assert_eq!(output.status.code(), Some(2));
    assert_eq!(json_stdout(&output)["error_kind"], "StackOverflow");
}

#[test]
fn test_run_invalid_hex() {
    let output = run_moi(&["run", "0xzz"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid hex"));
}

#[test]
fn test_run_invalid_hex_json() {
    let output = run_moi(&["--json", "run", "0x6"]);
    assert_eq!(output.status.code(), Some(1));
    let value = json_stdout(&output);
    assert_eq!(value["success"], false);
    assert!(value["error"].as_str().unwrap().contains("Invalid hex"));
}

#[test]
fn test_run_missing_file() {
    let output = run_moi(&["run", "--file", "/nonexistent/program.hex"]);
    assert_eq!(output.status.code(), Some(1));
}

// ==================== Disasm Command Tests ====================

#[test]
fn test_disasm() {
    let output = run_moi(&["disasm", "0x6002612345 01"]);
    assert!(output.status.success());
    let stdout = stdout(&output);
    assert!(stdout.contains("0000: PUSH1 0x02"));
    assert!(stdout.contains("0002: PUSH2 0x2345"));
    assert!(stdout.contains("0005: ADD"));
}

#[test]
fn test_disasm_json() {
    let output = run_moi(&["--json", "disasm", "0x600201"]);
    assert!(output.status.success());
    let value = json_stdout(&output);
    let instructions = value["instructions"].as_array().unwrap();
    assert_eq!(instructions.len(), 2);
    assert_eq!(instructions[0]["opcode"], "PUSH1");
    assert_eq!(instructions[0]["immediate"], "0x02");
    assert_eq!(instructions[1]["offset"], 2);
    assert!(instructions[1]["immediate"].is_null());
}

#[test]
fn test_disasm_unknown_opcode() {
    let output = run_moi(&["disasm", "0x6001fe"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("0000: PUSH1 0x01"));
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown opcode 0xfe"));
}

// ==================== Config Tests ====================

#[test]
fn test_config_show_defaults() {
    let output = run_moi(&["--json", "config", "--show"]);
    assert!(output.status.success());
    let value = json_stdout(&output);
    assert_eq!(value["log_level"], "warn");
    assert!(value["evm"]["gas_limit"].is_null());
}

#[test]
fn test_config_set_and_use() {
    let home = tempfile::tempdir().unwrap();

    let output = run_moi_in(home.path(), &["config", "--set-gas-limit", "5"]);
    assert!(output.status.success());
    assert!(home.path().join(".moi").join("config.toml").exists());

    let output = run_moi_in(home.path(), &["--json", "run", "0x60016002"]);
    assert_eq!(output.status.code(), Some(2));
    assert_eq!(json_stdout(&output)["error_kind"], "OutOfGas");

    // Flag overrides the file
    let output = run_moi_in(home.path(), &["run", "0x60016002", "--gas-limit", "6"]);
    assert!(output.status.success());
}

#[test]
fn test_config_file_limits() {
    let home = tempfile::tempdir().unwrap();
    let dir = home.path().join(".moi");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("config.toml"),
        "log_level = \"error\"\n\n[evm]\nmemory_limit = 32\n",
    )
    .unwrap();

    let output = run_moi_in(home.path(), &["--json", "run", "0x6001600052"]);
    assert_eq!(output.status.code(), Some(2));
    assert_eq!(json_stdout(&output)["error_kind"], "MemoryLimitExceeded");
}

#[test]
fn test_config_file_invalid() {
    let home = tempfile::tempdir().unwrap();
    let dir = home.path().join(".moi");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.toml"), "log_level = [").unwrap();

    let output = run_moi_in(home.path(), &["run"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Config error"));
}
