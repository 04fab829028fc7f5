// ABOUTME: Integration tests for the heka CLI binary.
// ABOUTME: Tests saved-page extraction, JSON output, bias reports and failure exit codes.

use assert_cmd::assert::OutputAssertExt;
use assert_cmd::cargo::CommandCargoExt;
use httpmock::prelude::*;
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

fn heka_cmd() -> Command {
    let mut cmd = Command::cargo_bin("heka").unwrap();
    cmd.env_remove("HEKA_ENDPOINT").env_remove("RUST_LOG");
    cmd
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/html")
        .join(format!("{}.html", name))
}

#[test]
fn extracts_saved_page_with_explicit_source() {
    heka_cmd()
        .arg("--html")
        .arg(fixture("bbc"))
        .arg("--source")
        .arg("bbc")
        .arg("--skip-analysis")
        .assert()
        .success()
        .stdout(predicate::str::contains("Train strikes called off after pay deal"))
        .stdout(predicate::str::contains("By BBC News"))
        .stdout(predicate::str::contains(
            "Services are expected to return to normal by the weekend.",
        ));
}

#[test]
fn detects_source_from_url_flag() {
    let output = heka_cmd()
        .arg("--html")
        .arg(fixture("guardian"))
        .arg("--url")
        .arg("https://www.theguardian.com/world/2025/jul/14/heatwave-europe")
        .arg("--skip-analysis")
        .arg("--json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(value["metadata"]["author"], "Ana Lopez");
    assert_eq!(value["blocks"][2]["kind"], "subheading");
}

#[test]
fn page_without_text_prints_placeholder() {
    let temp_dir = TempDir::new().unwrap();
    let html_path = temp_dir.path().join("empty.html");
    fs::write(&html_path, "<html><body><nav>Menu</nav></body></html>").unwrap();

    // No request is made, so an unreachable endpoint is fine.
    heka_cmd()
        .arg("--html")
        .arg(&html_path)
        .arg("--endpoint")
        .arg("http://127.0.0.1:1")
        .assert()
        .success()
        .stdout(predicate::str::contains("(No article text found)"))
        .stdout(predicate::str::contains("Title not found"));
}

#[test]
fn prints_bias_report() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/api/analyze-bias");
        then.status(200).json_body(json!([
            {"index": 7, "text": "Critics slammed the price tag as reckless.", "label": "Loaded language", "reason": "Charged verbs."}
        ]));
    });

    heka_cmd()
        .arg("--html")
        .arg(fixture("cbs"))
        .arg("--source")
        .arg("cbs")
        .arg("--endpoint")
        .arg(server.base_url())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Supporters called the vote a long overdue victory for families.\n\nWhat the bill does",
        ))
        .stdout(predicate::str::contains("Bias analysis"))
        .stdout(predicate::str::contains("Type: Loaded language"))
        .stdout(predicate::str::contains("Reason: Charged verbs."));
    mock.assert();
}

#[test]
fn endpoint_from_environment() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/api/analyze-bias");
        then.status(200).json_body(json!([]));
    });

    heka_cmd()
        .env("HEKA_ENDPOINT", server.base_url())
        .arg("--html")
        .arg(fixture("bbc"))
        .arg("--source")
        .arg("bbc")
        .assert()
        .success()
        .stdout(predicate::str::contains("No obvious bias detected."));
    mock.assert();
}

#[test]
fn analysis_failure_exits_nonzero() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/api/analyze-bias");
        then.status(500);
    });

    heka_cmd()
        .arg("--html")
        .arg(fixture("bbc"))
        .arg("--source")
        .arg("bbc")
        .arg("--endpoint")
        .arg(server.base_url())
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Failed to reach bias analysis."));
    mock.assert();
}

#[test]
fn fetches_positional_url() {
    let server = MockServer::start();
    let page = server.mock(|when, then| {
        when.method(GET).path("/news/story");
        then.status(200)
            .header("content-type", "text/html; charset=utf-8")
            .body(fs::read_to_string(fixture("bbc")).unwrap());
    });

    heka_cmd()
        .arg(server.url("/news/story"))
        .arg("--source")
        .arg("bbc")
        .arg("--skip-analysis")
        .assert()
        .success()
        .stdout(predicate::str::contains("What happens next"));
    page.assert();
}

#[test]
fn output_to_file() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("article.json");

    heka_cmd()
        .arg("--html")
        .arg(fixture("cbs"))
        .arg("--source")
        .arg("cbs")
        .arg("--skip-analysis")
        .arg("--json")
        .arg("-o")
        .arg(&output_path)
        .assert()
        .success();

    let output_content = fs::read_to_string(&output_path).unwrap();
    assert!(
        output_content.contains("\"datePublished\""),
        "output file should contain JSON metadata"
    );
}

#[test]
fn unknown_source_is_rejected() {
    heka_cmd()
        .arg("--html")
        .arg(fixture("cbs"))
        .arg("--source")
        .arg("reuters")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown source"));
}

#[test]
fn both_inputs_fail() {
    heka_cmd()
        .arg("https://www.bbc.co.uk/news/articles/c9xyz")
        .arg("--html")
        .arg(fixture("bbc"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot use both"));
}

#[test]
fn no_args_fails() {
    heka_cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("an article URL or --html FILE is required"));
}
