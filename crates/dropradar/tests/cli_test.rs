//! Integration tests for the `dropradar` binary.
//!
//! Argument parsing, completions, exit codes and config handling run
//! without a backend; the rest talk to a wiremock server.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

const NO_CONFIG: &str = "/tmp/dropradar-cli-test-nonexistent/config.toml";

/// `dropradar` with every `DROPRADAR_*` variable cleared and the config
/// file pointed at a path that does not exist.
fn dropradar_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("dropradar");
    cmd.env("DROPRADAR_CONFIG", NO_CONFIG)
        .env("NO_COLOR", "1")
        .env_remove("DROPRADAR_PROFILE")
        .env_remove("DROPRADAR_API_URL")
        .env_remove("DROPRADAR_OUTPUT")
        .env_remove("DROPRADAR_TIMEOUT")
        .env_remove("DROPRADAR_BARK_KEY")
        .env_remove("RUST_LOG");
    cmd
}

fn with_config(cmd: &mut assert_cmd::Command, config: &Path) {
    cmd.env("DROPRADAR_CONFIG", config);
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// Run the binary off the async runtime so the mock server keeps serving.
async fn run(mut cmd: assert_cmd::Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

fn domain_json(id: u64, name: &str, da: u32, spam: u32, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "da_score": da,
        "backlinks": 1250,
        "spam_score": spam,
        "status": status,
        "drop_date": "2025-12-05",
        "tld": ".com",
        "length": 7,
        "created_at": "2025-12-01T10:00:00"
    })
}

async fn mount_list(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v1/domains"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "domains": [
                domain_json(1, "gemini4.com", 45, 3, "available"),
                domain_json(2, "weak-name.net", 12, 30, "auction")
            ],
            "total": 2,
            "skip": 0,
            "limit": 100
        })))
        .mount(server)
        .await;
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = dropradar_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    dropradar_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("expiring")
            .and(predicate::str::contains("domains"))
            .and(predicate::str::contains("scan"))
            .and(predicate::str::contains("dashboard")),
    );
}

#[test]
fn test_version_flag() {
    dropradar_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("dropradar"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    dropradar_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    dropradar_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Usage errors ────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = dropradar_cmd().arg("foobar").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_invalid_scan_mode_is_rejected() {
    let output = dropradar_cmd()
        .args(["scan", "--mode", "everything"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_clear_without_yes_refuses_non_interactive() {
    let output = dropradar_cmd()
        .args(["--api-url", "http://127.0.0.1:9", "domains", "clear"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("--yes"));
}

#[test]
fn test_bad_api_url_is_a_validation_error() {
    let output = dropradar_cmd()
        .args(["--api-url", "not a url", "stats"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_notify_without_bark_key() {
    let output = dropradar_cmd()
        .args(["--api-url", "http://127.0.0.1:9", "notify", "test"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("bark key"));
}

// ── Backend errors ──────────────────────────────────────────────────

#[test]
fn test_connection_refused_exit_code() {
    let output = dropradar_cmd()
        .args(["--api-url", "http://127.0.0.1:9", "domains", "list"])
        .output()
        .unwrap();
    assert_eq!(
        output.status.code(),
        Some(7),
        "Expected connection exit code:\n{}",
        combined_output(&output)
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_unknown_id_exit_code() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/domains/99"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "not found"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = dropradar_cmd();
    cmd.args(["--api-url", &server.uri(), "--yes", "domains", "delete", "99"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("99"));
}

// ── Backend success ─────────────────────────────────────────────────

async fn mount_stats_outage(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v1/stats"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(server)
        .await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_domains_list_json() {
    let server = MockServer::start().await;
    mount_list(&server).await;
    mount_stats_outage(&server).await;

    let mut cmd = dropradar_cmd();
    cmd.args(["--api-url", &server.uri(), "-o", "json", "domains", "list"]);
    let output = run(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));

    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<&str> = rows
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["gemini4.com", "weak-name.net"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_high_value_plain_output() {
    let server = MockServer::start().await;
    mount_list(&server).await;

    let mut cmd = dropradar_cmd();
    cmd.args([
        "--api-url",
        &server.uri(),
        "-o",
        "plain",
        "dashboard",
        "--source",
        "local",
        "--high-value",
    ]);
    let output = run(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "gemini4.com");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_local_stats_skip_stats_endpoint() {
    let server = MockServer::start().await;
    mount_list(&server).await;
    mount_stats_outage(&server).await;

    let mut cmd = dropradar_cmd();
    cmd.args([
        "--api-url",
        &server.uri(),
        "-o",
        "plain",
        "stats",
        "--source",
        "local",
    ]);
    let output = run(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "total=2 avg_da=28.5 available=1 low_spam=1"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_domains_link_ignores_stats_outage() {
    let server = MockServer::start().await;
    mount_list(&server).await;
    mount_stats_outage(&server).await;

    let mut cmd = dropradar_cmd();
    cmd.args(["--api-url", &server.uri(), "domains", "link", "1"]);
    let output = run(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(String::from_utf8_lossy(&output.stdout).contains("gemini4.com"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_filtered_dashboard_uses_local_stats() {
    let server = MockServer::start().await;
    mount_list(&server).await;
    mount_stats_outage(&server).await;

    let mut cmd = dropradar_cmd();
    cmd.args([
        "--api-url",
        &server.uri(),
        "-o",
        "json",
        "dashboard",
        "--min-da",
        "10",
    ]);
    let output = run(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));

    let view: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(view["stats"]["total"], json!(2));
    assert_eq!(view["stats"]["low_spam_count"], json!(1));
}

#[test]
fn test_filtered_dashboard_rejects_server_stats() {
    let output = dropradar_cmd()
        .args([
            "--api-url",
            "http://127.0.0.1:9",
            "dashboard",
            "--source",
            "server",
            "--min-da",
            "30",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("source"));
}

#[test]
fn test_threshold_rejected_with_server_stats() {
    let output = dropradar_cmd()
        .args([
            "--api-url",
            "http://127.0.0.1:9",
            "stats",
            "--source",
            "server",
            "--low-spam-threshold",
            "3",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_config_default_output_applies() {
    let server = MockServer::start().await;
    mount_list(&server).await;
    mount_stats_outage(&server).await;

    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(
        &config,
        format!(
            "[defaults]\noutput = \"plain\"\n\n[profiles.default]\napi_url = \"{}\"\nstats_source = \"local\"\n",
            server.uri()
        ),
    )
    .unwrap();

    let mut cmd = dropradar_cmd();
    with_config(&mut cmd, &config);
    cmd.arg("stats");
    let output = run(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "total=2 avg_da=28.5 available=1 low_spam=1"
    );
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_honors_env() {
    dropradar_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(NO_CONFIG));
}

#[test]
fn test_config_show_redacts_bark_key() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(
        &config,
        r#"
default_profile = "home"

[profiles.home]
api_url = "http://localhost:8000"
bark_key = "super-secret-device-key"
"#,
    )
    .unwrap();

    let mut cmd = dropradar_cmd();
    with_config(&mut cmd, &config);
    cmd.args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("********")
                .and(predicate::str::contains("http://localhost:8000"))
                .and(predicate::str::contains("super-secret-device-key").not()),
        );
}

#[test]
fn test_config_set_then_use_unknown_profile() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("nested").join("config.toml");

    let mut cmd = dropradar_cmd();
    with_config(&mut cmd, &config);
    cmd.args(["config", "set", "stats_source", "local"])
        .assert()
        .success();
    let written = std::fs::read_to_string(&config).unwrap();
    assert!(written.contains("stats_source = \"local\""), "{written}");

    let mut cmd = dropradar_cmd();
    with_config(&mut cmd, &config);
    let output = cmd.args(["config", "use", "prod"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("default"));
}
