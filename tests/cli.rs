// ABOUTME: Integration tests for the edgeflip CLI commands.
// ABOUTME: Validates --help, init, resolve, and promote against a canned gateway.

mod support;

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use support::http_stub::{StubServer, response};

const PIPELINE_VARS: &[&str] = &[
    "GITHUB_ACTIONS",
    "GITHUB_REF",
    "GITHUB_REPOSITORY",
    "INPUT_DISTRIBUTIONS",
    "INPUT_ORIGINID",
    "INPUT_PROJECTKEY",
    "EDGEFLIP_ENDPOINT",
    "EDGEFLIP_TOKEN",
    "RUST_LOG",
];

fn edgeflip_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("edgeflip"));
    for var in PIPELINE_VARS {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn help_shows_commands() {
    edgeflip_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("promote"))
        .stdout(predicate::str::contains("resolve"))
        .stdout(predicate::str::contains("status"));
}

#[test]
fn init_creates_config_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("edgeflip.yml");

    edgeflip_cmd()
        .current_dir(temp_dir.path())
        .arg("init")
        .assert()
        .success();

    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("distributions:"));
    assert!(content.contains("origin_id:"));
}

#[test]
fn init_refuses_to_overwrite_existing_config() {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(temp_dir.path().join("edgeflip.yml"), "origin_id: keep").unwrap();

    edgeflip_cmd()
        .current_dir(temp_dir.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    let content = fs::read_to_string(temp_dir.path().join("edgeflip.yml")).unwrap();
    assert_eq!(content, "origin_id: keep");
}

#[test]
fn resolve_prints_origin_path_from_pipeline_env() {
    let temp_dir = tempfile::tempdir().unwrap();

    edgeflip_cmd()
        .current_dir(temp_dir.path())
        .env("GITHUB_REF", "refs/heads/deploy/prod/2024.05.01")
        .env("GITHUB_REPOSITORY", "acme/app")
        .env("INPUT_DISTRIBUTIONS", r#"{"prod": "DIST1"}"#)
        .env("INPUT_ORIGINID", "O1")
        .arg("resolve")
        .assert()
        .success()
        .stdout(predicate::str::contains("/app/deploy/prod/2024.05.01"))
        .stdout(predicate::str::contains("DIST1"));
}

#[test]
fn promote_unmapped_environment_is_a_no_op() {
    let temp_dir = tempfile::tempdir().unwrap();

    // Nothing listens on the endpoint; a skip must not contact it
    edgeflip_cmd()
        .current_dir(temp_dir.path())
        .args([
            "promote",
            "--ref",
            "refs/heads/deploy/qa/1",
            "--repository",
            "acme/app",
            "--origin-id",
            "O1",
            "--distributions",
            r#"{"prod": "DIST1"}"#,
            "--endpoint",
            "http://127.0.0.1:9",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to promote"))
        .stdout(predicate::str::contains("'qa'"));
}

#[test]
fn promote_unmapped_environment_needs_only_distributions() {
    let temp_dir = tempfile::tempdir().unwrap();

    edgeflip_cmd()
        .current_dir(temp_dir.path())
        .env("INPUT_DISTRIBUTIONS", r#"{"prod": "DIST1"}"#)
        .args(["promote", "--ref", "refs/heads/deploy/qa/1"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Nothing to promote: no distribution ID defined for 'qa'",
        ));
}

#[test]
fn promote_malformed_ref_warns_and_succeeds() {
    let temp_dir = tempfile::tempdir().unwrap();

    edgeflip_cmd()
        .current_dir(temp_dir.path())
        .args(["promote", "--ref", "refs/heads/main"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Warning: malformed ref"))
        .stdout(predicate::str::contains("Nothing to promote"));
}

#[test]
fn promote_without_origin_id_fails() {
    let temp_dir = tempfile::tempdir().unwrap();

    edgeflip_cmd()
        .current_dir(temp_dir.path())
        .args([
            "promote",
            "--ref",
            "refs/heads/deploy/prod/1",
            "--repository",
            "acme/app",
            "--distributions",
            r#"{"prod": "DIST1"}"#,
            "--endpoint",
            "http://127.0.0.1:9",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: missing required input: origin-id"));
}

#[test]
fn actions_mode_annotates_errors() {
    let temp_dir = tempfile::tempdir().unwrap();

    edgeflip_cmd()
        .current_dir(temp_dir.path())
        .env("GITHUB_ACTIONS", "true")
        .env("INPUT_DISTRIBUTIONS", r#"{"prod": "DIST1"}"#)
        .args(["promote", "--ref", "refs/heads/deploy/prod/1"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("::error::missing required input"));
}

#[tokio::test(flavor = "multi_thread")]
async fn promote_runs_full_pipeline_against_gateway() {
    let config = support::distribution_config().to_string();
    let server = StubServer::start(vec![
        response("200 OK", Some("T1"), &config),
        response("200 OK", Some("T2"), "{}"),
        response("200 OK", Some("T2"), r#"{"Status": "Deployed"}"#),
        response("201 Created", None, "{}"),
    ])
    .await;
    let endpoint = server.endpoint.clone();
    let temp_dir = tempfile::tempdir().unwrap();

    let assert = tokio::task::spawn_blocking(move || {
        edgeflip_cmd()
            .current_dir(temp_dir.path())
            .args([
                "promote",
                "--ref",
                "refs/heads/deploy/prod/2024.05.01",
                "--repository",
                "acme/app",
                "--origin-id",
                "O1",
                "--distributions",
                r#"{"prod": "DIST1"}"#,
                "--poll-interval",
                "10ms",
                "--endpoint",
                &endpoint,
            ])
            .assert()
    })
    .await
    .unwrap();

    assert
        .success()
        .stdout(predicate::str::contains("Old origin path: /app/old"))
        .stdout(predicate::str::contains(
            "New origin path: /app/deploy/prod/2024.05.01",
        ))
        .stdout(predicate::str::contains("Done!"));

    let requests = server.requests().await;
    assert_eq!(requests.len(), 4);
    assert!(requests[1].starts_with("PUT /distributions/DIST1/config"));
    assert!(requests[1].contains("/app/deploy/prod/2024.05.01"));
    assert!(requests[3].contains(r#""CallerReference":"deploy/prod/2024.05.01""#));
}
