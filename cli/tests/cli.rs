//! End-to-end tests for the `fixbot` binary: exit-status properties and the
//! fix-mode pipeline against mock servers.

#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::Command;
use predicates::str::contains;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn write_event(dir: &Path, json: &serde_json::Value) -> std::path::PathBuf {
    let path = dir.join("event.json");
    std::fs::write(&path, serde_json::to_vec(json).unwrap()).unwrap();
    path
}

fn fixbot(dir: &Path, event_path: &Path) -> Command {
    let mut cmd = Command::cargo_bin("fixbot").unwrap();
    cmd.current_dir(dir)
        .env_clear()
        .env("GITHUB_TOKEN", "gh-test")
        .env("OPENAI_API_KEY", "sk-test")
        .env("GITHUB_REPOSITORY", "acme/app")
        .env("GITHUB_EVENT_PATH", event_path)
        .env("FIXBOT_DOCS_DIR", dir.join("no-docs"))
        .env("RUST_LOG", "info");
    cmd
}

#[test]
fn comment_without_trigger_is_a_clean_noop() {
    let dir = tempfile::tempdir().unwrap();
    let event = write_event(
        dir.path(),
        &serde_json::json!({
            "comment": { "body": "please fix the build" },
            "issue": { "number": 3 }
        }),
    );

    fixbot(dir.path(), &event)
        .arg("comment")
        .assert()
        .success()
        .stderr(contains("skipped"));
}

#[test]
fn approve_directive_is_a_clean_noop() {
    let dir = tempfile::tempdir().unwrap();
    let event = write_event(
        dir.path(),
        &serde_json::json!({
            "comment": { "body": "@codex approve this" },
            "issue": { "number": 3 }
        }),
    );

    fixbot(dir.path(), &event)
        .arg("comment")
        .assert()
        .success()
        .stderr(contains("skipped"));
}

#[test]
fn missing_required_env_fails() {
    let dir = tempfile::tempdir().unwrap();
    let event = write_event(dir.path(), &serde_json::json!({}));

    let mut cmd = fixbot(dir.path(), &event);
    cmd.env_remove("GITHUB_TOKEN");
    cmd.arg("comment").assert().failure();
}

#[test]
fn malformed_comment_payload_fails() {
    let dir = tempfile::tempdir().unwrap();
    // Comment without the issue it belongs to.
    let event = write_event(
        dir.path(),
        &serde_json::json!({ "comment": { "body": "@codex do it" } }),
    );

    fixbot(dir.path(), &event).arg("comment").assert().failure();
}

#[tokio::test(flavor = "multi_thread")]
async fn fix_without_associated_pr_is_a_clean_noop() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/app/commits/abc123/pulls"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let event = write_event(
        dir.path(),
        &serde_json::json!({ "workflow_run": { "id": 99, "head_sha": "abc123" } }),
    );

    let uri = server.uri();
    let dir_path = dir.path().to_path_buf();
    tokio::task::spawn_blocking(move || {
        fixbot(&dir_path, &event)
            .env("GITHUB_API_URL", &uri)
            .arg("fix")
            .assert()
            .success()
            .stderr(contains("skipped"));
    })
    .await
    .unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn fix_pipeline_posts_an_analysis_comment_for_a_plan_reply() {
    let github = MockServer::start().await;
    let openai = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/acme/app/commits/abc123/pulls"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "number": 5, "head": { "ref": "fix/ci" } }
        ])))
        .mount(&github)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/app/actions/runs/99/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "jobs": [
                {
                    "name": "test",
                    "conclusion": "failure",
                    "steps": [ { "name": "cargo test", "conclusion": "failure" } ]
                }
            ]
        })))
        .mount(&github)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [ { "message": { "content": "PLAN:\nStep 1. Fix the test." } } ]
        })))
        .expect(1)
        .mount(&openai)
        .await;
    Mock::given(method("POST"))
        .and(path("/repos/acme/app/issues/5/comments"))
        .and(body_partial_json(serde_json::json!({
            "body": "🧠 Codex analysis of CI failure:\n\nPLAN:\nStep 1. Fix the test."
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&github)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let event = write_event(
        dir.path(),
        &serde_json::json!({ "workflow_run": { "id": 99, "head_sha": "abc123" } }),
    );

    let github_uri = github.uri();
    let openai_uri = openai.uri();
    let dir_path = dir.path().to_path_buf();
    tokio::task::spawn_blocking(move || {
        fixbot(&dir_path, &event)
            .env("GITHUB_API_URL", &github_uri)
            .env("OPENAI_BASE_URL", &openai_uri)
            .arg("fix")
            .assert()
            .success()
            .stderr(contains("dispatched"));
    })
    .await
    .unwrap();
}
