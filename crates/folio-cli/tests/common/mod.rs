#![allow(dead_code)]

use std::path::Path;
use std::process::{Command, Output};

/// Run the CLI binary against a data directory.
pub fn run_cli(data: &Path, args: &[&str]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_folio"));
    cmd.arg("--data").arg(data);
    cmd.args(args);
    cmd.env_remove("RUST_LOG");
    cmd.output().expect("Failed to execute CLI")
}

/// Run the CLI and expect success, returning stdout.
pub fn run_cli_success(data: &Path, args: &[&str]) -> String {
    let output = run_cli(data, args);
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Run the CLI and parse stdout as JSON.
pub fn run_cli_json(data: &Path, args: &[&str]) -> serde_json::Value {
    let stdout = run_cli_success(data, args);
    serde_json::from_str(&stdout).expect("stdout is not JSON")
}

/// Store a post and return its URL-safe key.
pub fn put_post(data: &Path, title: &str, created: &str, extra: &[&str]) -> String {
    let title = format!("title={}", title);
    let created = format!("created={}", created);
    let mut args = vec!["put", "post", "-s", &title, "-s", &created];
    for item in extra {
        args.push("-s");
        args.push(item);
    }
    run_cli_success(data, &args).trim().to_string()
}
