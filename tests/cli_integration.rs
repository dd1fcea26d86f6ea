//! CLI integration tests

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

const SECRET: &str = "cli-integration-secret-0123456789abcdef";

fn isolated_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("terabox-resolver");
    cmd.env("RESOLVER_CONFIG", "/nonexistent/terabox-resolver.toml")
        .env_remove("RESOLVER_SECRET")
        .env_remove("RESOLVER_ENDPOINT")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_version_flag() {
    let mut cmd = isolated_cmd();
    cmd.arg("--version");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_flag() {
    let mut cmd = isolated_cmd();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("server"))
        .stdout(predicate::str::contains("resolve"));
}

#[test]
fn test_resolve_help() {
    let mut cmd = isolated_cmd();
    cmd.args(["resolve", "--help"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--index"))
        .stdout(predicate::str::contains("--endpoint"))
        .stdout(predicate::str::contains("--json"));
}

#[test]
fn test_server_requires_secret() {
    let mut cmd = isolated_cmd();
    cmd.args(["server", "--port", "0", "--host", "127.0.0.1"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("token.secret"));
}

#[test]
fn test_server_rejects_invalid_host() {
    let mut cmd = isolated_cmd();
    cmd.env("RESOLVER_SECRET", SECRET)
        .args(["server", "--host", "not-an-ip"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid host address"));
}

#[test]
fn test_resolve_requires_secret() {
    let mut cmd = isolated_cmd();
    cmd.args(["resolve", "https://terabox.com/s/abc"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("token.secret"));
}

#[test]
fn test_resolve_invalid_link_reports_error() {
    let mut cmd = isolated_cmd();
    cmd.env("RESOLVER_SECRET", SECRET)
        .args(["resolve", "https://example.org/s/abc", "--endpoint", "http://127.0.0.1:9"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid link"))
        .stderr(predicate::str::contains("1 of 1 link(s) could not be resolved"));
}

#[test]
fn test_resolve_json_output() {
    let mut cmd = isolated_cmd();
    cmd.env("RESOLVER_SECRET", SECRET).args([
        "resolve",
        "not a url, https://example.org/s/abc",
        "--endpoint",
        "http://127.0.0.1:9",
        "--json",
    ]);

    let output = cmd.output().unwrap();
    assert!(!output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let items = json.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["link"], "not a url");
    assert_eq!(items[0]["error"], "Invalid link");
    assert_eq!(items[1]["link"], "https://example.org/s/abc");
}

#[test]
fn test_resolve_reads_config_file() {
    let mut config = NamedTempFile::new().unwrap();
    writeln!(
        config,
        r#"
[token]
secret = "{}"

[client]
endpoint = "http://127.0.0.1:9"
error_display_secs = 0
        "#,
        SECRET
    )
    .unwrap();
    config.flush().unwrap();

    let mut cmd = isolated_cmd();
    cmd.args([
        "resolve",
        "https://example.org/s/abc",
        "--config",
        config.path().to_str().unwrap(),
    ]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid link"));
}
