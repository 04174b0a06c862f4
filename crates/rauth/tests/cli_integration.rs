//! CLI integration tests for the Rauth command-line interface.
//!
//! None of these need a live session API: they cover argument parsing,
//! config resolution and the local webhook replay.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

/// Get a command for the rauth binary with a clean `RAUTH_*` environment.
fn rauth() -> Command {
    let mut cmd = Command::cargo_bin("rauth").unwrap();
    for var in [
        "RAUTH_CONFIG",
        "RAUTH_API_KEY",
        "RAUTH_APP_ID",
        "RAUTH_WEBHOOK_SECRET",
        "RAUTH_BASE_URL",
        "RAUTH_SESSION_TTL",
        "RAUTH_REVOKED_TTL",
        "RAUTH_CLEANUP_INTERVAL",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn write_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn full_config() -> NamedTempFile {
    write_file(
        r#"
[api]
base_url = "http://127.0.0.1:9/session"
api_key = "sk_test_abcdef123456"
app_id = "app-1"
timeout_secs = 1

[webhook]
secret = "whsec_0123456789"

[cache]
revoked_ttl_secs = 7200
"#,
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Help and Version Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_help_lists_subcommands() {
    rauth()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("health"))
        .stdout(predicate::str::contains("verify"))
        .stdout(predicate::str::contains("webhook"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_version_displays() {
    rauth()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("rauth"));
}

#[test]
fn test_verify_requires_token_and_phone() {
    rauth()
        .args(["verify", "--token", "abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--phone"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Config Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_config_masks_secrets() {
    let config = full_config();
    rauth()
        .arg("--config")
        .arg(config.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("app-1"))
        .stdout(predicate::str::contains("****3456"))
        .stdout(predicate::str::contains("sk_test_abcdef123456").not())
        .stdout(predicate::str::contains("whsec_0123456789").not());
}

#[test]
fn test_config_env_overrides_file() {
    let config = full_config();
    let output = rauth()
        .arg("--json")
        .arg("config")
        .env("RAUTH_CONFIG", config.path())
        .env("RAUTH_APP_ID", "env-app")
        .env("RAUTH_SESSION_TTL", "60")
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["api"]["app_id"], "env-app");
    assert_eq!(value["cache"]["session_ttl_secs"], 60);
    assert_eq!(value["cache"]["revoked_ttl_secs"], 7200);
}

#[test]
fn test_config_check_reports_missing_secret() {
    let config = write_file("[api]\napi_key = \"key\"\napp_id = \"app\"\n");
    rauth()
        .arg("--config")
        .arg(config.path())
        .args(["config", "--check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("secret"));
}

#[test]
fn test_missing_config_file_fails() {
    rauth()
        .args(["--config", "/nonexistent/rauth.toml", "config"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("rauth.toml"));
}

#[test]
fn test_verify_without_credentials_fails() {
    rauth()
        .args(["verify", "--token", "abc", "--phone", "+15550100"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("api_key"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Webhook Replay Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_webhook_replay_reports_outcomes() {
    let config = full_config();
    let events = write_file(concat!(
        r#"{"type":"session_revoked","session_token":"tok-one-123"}"#,
        "\n",
        r#"{"event":"session_revoked","session_token":"tok-two-456"}"#,
        "\n\n",
        r#"{"type":"session_verified","session_token":"tok-three"}"#,
        "\n",
        r#"{"type":"session_exploded","session_token":"tok-four"}"#,
        "\n",
        r#"{"type":"session_revoked","session_token":""}"#,
        "\n",
        "not json\n",
    ));

    let output = rauth()
        .arg("--config")
        .arg(config.path())
        .arg("--json")
        .arg("webhook")
        .arg(events.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let outcomes: Vec<&str> = value["events"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["outcome"].as_str().unwrap())
        .collect();
    assert_eq!(
        outcomes,
        [
            "revoked",
            "revoked",
            "ignored (session_verified)",
            "unrecognized (session_exploded)",
            "failed",
            "failed",
        ]
    );
    assert_eq!(value["events"][3]["line"], 5);
    assert_eq!(value["failed"], 2);
    assert_eq!(value["stats"]["revocations"]["total"], 2);
    assert_eq!(value["stats"]["revoked_ttl_secs"], 7200);
}

#[test]
fn test_webhook_missing_file_fails() {
    let config = full_config();
    rauth()
        .arg("--config")
        .arg(config.path())
        .args(["webhook", "/nonexistent/events.jsonl"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("events.jsonl"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Health Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_health_unreachable_api_reports_unhealthy() {
    let config = full_config();
    let output = rauth()
        .arg("--config")
        .arg(config.path())
        .args(["--json", "health"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["healthy"], false);
    assert!(value["error"].is_string());
}
