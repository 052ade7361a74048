//! CLI integration tests.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener};
use std::thread;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

fn console_store() -> Command {
    let mut cmd = cargo_bin_cmd!("console-store");
    cmd.env_remove("CONSOLE_API_TOKEN").env("RUST_LOG", "error");
    cmd
}

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp config");
    file.write_all(contents.as_bytes()).expect("write temp config");
    file
}

fn config_for(addr: SocketAddr) -> NamedTempFile {
    write_config(&format!("[api]\nbase_url = \"http://{addr}\"\ntimeout_ms = 2000\n"))
}

/// Answer every request with the same status and body.
fn serve(status: u16, body: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind listener");
    let addr = listener.local_addr().expect("addr");
    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { break };
            let mut buf = [0u8; 8192];
            let _ = stream.read(&mut buf);
            let response = format!(
                "HTTP/1.1 {status} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes());
        }
    });
    addr
}

#[test]
fn test_help() {
    console_store()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("console-store"))
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("list"));
}

#[test]
fn test_version() {
    console_store()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("console-store"));
}

#[test]
fn check_config_accepts_valid_file() {
    let file = write_config("[api]\nbase_url = \"https://api.example.com/v1\"\n");

    console_store()
        .args(["--color", "never", "check", "config", "--config"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration file is valid"))
        .stdout(predicate::str::contains("https://api.example.com/v1"))
        .stdout(predicate::str::contains("CONSOLE_API_TOKEN"));
}

#[test]
fn check_config_returns_nonzero_on_invalid_value() {
    let file = write_config("[api]\nbase_url = \"http://localhost\"\ntimeout_ms = 0\n");

    console_store()
        .args(["check", "config", "--config"])
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("timeout_ms"));
}

#[test]
fn check_config_returns_nonzero_on_missing_file() {
    console_store()
        .args(["check", "config", "--config", "/nonexistent/console-store.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("/nonexistent/console-store.toml"));
}

#[test]
fn list_project_collection_requires_project() {
    let file = write_config("[api]\nbase_url = \"http://localhost\"\n");

    console_store()
        .args(["list", "devices", "--config"])
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("--project is required"));
}

#[test]
fn list_rejects_unknown_collection() {
    console_store()
        .args(["list", "wallets"])
        .assert()
        .failure();
}

#[test]
fn list_projects_prints_table() {
    let addr = serve(200, r#"[{"id":"p1","name":"Plant North"},{"id":"p2","name":"Depot"}]"#);
    let file = config_for(addr);

    console_store()
        .args(["--color", "never", "list", "projects", "--config"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("projects (2)"))
        .stdout(predicate::str::contains("Plant North"))
        .stdout(predicate::str::contains("Depot"));
}

#[test]
fn list_rules_as_json_lines() {
    let addr = serve(200, r#"[{"id":"r1","name":"Battery low","active":true}]"#);
    let file = config_for(addr);

    console_store()
        .args(["--json", "list", "rules", "--project", "p1", "--config"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""type":"record""#))
        .stdout(predicate::str::contains("Battery low"));
}

#[test]
fn list_returns_nonzero_when_load_fails() {
    let addr = serve(500, "");
    let file = config_for(addr);

    console_store()
        .args(["list", "rooms", "--project", "p1", "--config"])
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load rooms"))
        .stderr(predicate::str::contains("The server encountered an error"));
}

#[test]
fn list_controllers_when_disabled_is_not_an_error() {
    let file = write_config("[api]\nbase_url = \"http://127.0.0.1:9\"\n[console]\nload_mpc = false\n");

    console_store()
        .args(["--color", "never", "list", "controllers", "--project", "p1", "--config"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("disabled"));
}
