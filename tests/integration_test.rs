// tests/integration_test.rs
use std::process::Command;

#[test]
fn test_releasy_help() {
    let output = Command::new("cargo")
        .args(["run", "--bin", "releasy", "--", "--help"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("releasy"));
    assert!(stdout.contains("--dry-run"));
    assert!(stdout.contains("--no-push"));
}

#[test]
fn test_releasy_version() {
    let output = Command::new("cargo")
        .args(["run", "--bin", "releasy", "--", "--version"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_releasy_rejects_unknown_flag() {
    let output = Command::new("cargo")
        .args(["run", "--bin", "releasy", "--", "--frobnicate"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
}
