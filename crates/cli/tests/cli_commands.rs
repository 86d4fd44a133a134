use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

// Nothing listens here; requests fail fast with a connection error.
const DEAD_API: &str = "http://127.0.0.1:1";

#[allow(deprecated)]
fn cli(state: &Path) -> Command {
    let mut cmd = Command::cargo_bin("search-assist").expect("binary");
    cmd.env_remove("SEARCH_ASSIST_API_BASE")
        .env_remove("SEARCH_ASSIST_HOST")
        .arg("--quiet")
        .arg("--state-file")
        .arg(state)
        .arg("--api-base")
        .arg(DEAD_API);
    cmd
}

fn run_json(cmd: &mut Command) -> Value {
    let output = cmd.output().expect("command run");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid json")
}

#[test]
fn commit_prints_results_url() {
    let temp = tempdir().unwrap();
    let body = run_json(cli(&temp.path().join("state.json")).args(["commit", " hello world "]));
    assert_eq!(body["outcome"], "navigated");
    assert_eq!(body["url"], "/search-app-results?q=hello%20world");
}

#[test]
fn commit_rejects_blank_query() {
    let temp = tempdir().unwrap();
    let body = run_json(cli(&temp.path().join("state.json")).args(["commit", "   "]));
    assert_eq!(body["outcome"], "rejected");
    assert!(body.get("url").is_none());
}

#[test]
fn visitor_id_is_stable_across_runs() {
    let temp = tempdir().unwrap();
    let state = temp.path().join("nested/state.json");

    let first = run_json(cli(&state).arg("visitor-id"));
    let second = run_json(cli(&state).arg("visitor-id"));
    let id = first["visitor_id"].as_str().expect("visitor id");
    assert!(!id.is_empty());
    assert_eq!(first, second);

    let stored: Value = serde_json::from_str(&fs::read_to_string(&state).unwrap()).unwrap();
    assert_eq!(stored["visitorId"], id);
}

#[test]
fn token_is_null_when_service_is_unreachable() {
    let temp = tempdir().unwrap();
    let body = run_json(cli(&temp.path().join("state.json")).arg("token"));
    assert!(body.is_null());
}

#[test]
fn suggest_degrades_to_empty_list() {
    let temp = tempdir().unwrap();
    let body = run_json(cli(&temp.path().join("state.json")).args(["suggest", "shoes"]));
    assert_eq!(body, Value::Array(Vec::new()));
}

#[test]
fn simulate_declines_on_results_page() {
    let temp = tempdir().unwrap();
    let body = run_json(cli(&temp.path().join("state.json")).args([
        "simulate",
        "shoes",
        "--path",
        "/search-app-results",
    ]));
    assert_eq!(body["attached"], false);
}

#[test]
fn simulate_view_all_with_empty_input_is_rejected() {
    let temp = tempdir().unwrap();
    let body = run_json(cli(&temp.path().join("state.json")).args([
        "simulate",
        "",
        "--keys",
        "view-all",
    ]));
    assert_eq!(body["attached"], true);
    assert_eq!(body["steps"][0]["commit"]["outcome"], "rejected");
    assert_eq!(body["page"]["invalid_input"], true);
    assert_eq!(body["page"]["focus"], "input");
    assert!(body["page"]["navigated_to"].is_null());
}

#[test]
fn schema_lists_wire_types() {
    let temp = tempdir().unwrap();
    cli(&temp.path().join("state.json"))
        .arg("schema")
        .assert()
        .success()
        .stdout(predicate::str::contains("VisitorTokenRequest"))
        .stdout(predicate::str::contains("SuggestionsResponse"));
}
