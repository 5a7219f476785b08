//! End-to-end runs of the builtin suite against a mock service.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use scenaria_artifact::FsStore;
use scenaria_client::ServiceClient;
use scenaria_config::{Catalog, HarnessConfig};
use scenaria_runner::{CaseOutcome, SuiteRunner};
use tokio_util::sync::CancellationToken;

const COMPONENT: &str = "generate_without_context";

fn date() -> NaiveDate {
  NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
}

fn runner(root: &Path, base_url: &str) -> SuiteRunner {
  let config = HarnessConfig {
    base_url: base_url.to_string(),
    session_id: "regression-session".to_string(),
    timeout_seconds: 5,
    output_root: root.to_path_buf(),
    ..HarnessConfig::default()
  };
  let client = ServiceClient::new(&config.base_url, config.timeout()).unwrap();
  let store = FsStore::new(&config.output_root);

  SuiteRunner::new(config, Catalog::builtin(), Arc::new(client), Arc::new(store)).with_date(date())
}

fn output_dir(root: &Path) -> std::path::PathBuf {
  root.join("2026-10-18").join(COMPONENT)
}

fn file_names(root: &Path) -> Vec<String> {
  let mut names: Vec<String> = std::fs::read_dir(output_dir(root))
    .unwrap()
    .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
    .collect();
  names.sort();
  names
}

fn read_json(path: &Path) -> serde_json::Value {
  serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap()
}

fn closed_port_url() -> String {
  let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
  let addr = listener.local_addr().unwrap();
  drop(listener);
  format!("http://{}", addr)
}

#[tokio::test]
async fn test_reachable_service_writes_success_artifacts() {
  let root = tempfile::tempdir().unwrap();
  let mut server = mockito::Server::new_async().await;
  let mock = server
    .mock("POST", "/chat")
    .with_status(200)
    .with_header("content-type", "application/json")
    .with_body(r#"{"status": "success", "final_answer": "Debt is borrowed; equity is sold."}"#)
    .expect(3)
    .create_async()
    .await;

  let report = runner(root.path(), &server.url())
    .run_suite(COMPONENT, CancellationToken::new())
    .await
    .expect("run should complete");

  mock.assert_async().await;
  assert_eq!(report.exit_code(), 0);
  assert_eq!(
    file_names(root.path()),
    vec![
      "1.1.1_SUCCESS.json",
      "1.1.2_SUCCESS.json",
      "1.1.3_SUCCESS.json"
    ]
  );

  let artifact = read_json(&output_dir(root.path()).join("1.1.1_SUCCESS.json"));
  assert_eq!(artifact["final_answer"], "Debt is borrowed; equity is sold.");
}

#[tokio::test]
async fn test_unreachable_service_writes_failure_artifacts() {
  let root = tempfile::tempdir().unwrap();

  let report = runner(root.path(), &closed_port_url())
    .run_suite(COMPONENT, CancellationToken::new())
    .await
    .expect("case failures are not fatal");

  assert_eq!(report.exit_code(), 1);
  assert_eq!(report.failed(), 3);

  let artifact = read_json(&output_dir(root.path()).join("1.1.1_FAILURE.json"));
  assert!(artifact["error"].is_string());
  assert_eq!(artifact["payload"]["session_id"], "regression-session");
  assert_eq!(
    artifact["payload"]["messages"][0],
    serde_json::json!({
      "role": "user",
      "content": "What is the difference between debt and equity financing?"
    })
  );
}

#[tokio::test]
async fn test_rerun_on_same_date_overwrites() {
  let root = tempfile::tempdir().unwrap();
  let url = closed_port_url();

  for _ in 0..2 {
    let report = runner(root.path(), &url)
      .run_suite(COMPONENT, CancellationToken::new())
      .await
      .unwrap();
    assert!(
      report
        .cases
        .iter()
        .all(|c| matches!(c.outcome, CaseOutcome::Failure { .. }))
    );
  }

  assert_eq!(
    file_names(root.path()),
    vec![
      "1.1.1_FAILURE.json",
      "1.1.2_FAILURE.json",
      "1.1.3_FAILURE.json"
    ]
  );
}

#[tokio::test]
async fn test_artifacts_are_pretty_printed_with_four_spaces() {
  let root = tempfile::tempdir().unwrap();
  let mut server = mockito::Server::new_async().await;
  server
    .mock("POST", "/chat")
    .with_status(200)
    .with_body(r#"{"status":"success"}"#)
    .create_async()
    .await;

  runner(root.path(), &server.url())
    .run_suite(COMPONENT, CancellationToken::new())
    .await
    .unwrap();

  let raw = std::fs::read_to_string(output_dir(root.path()).join("1.1.2_SUCCESS.json")).unwrap();
  assert_eq!(raw, "{\n    \"status\": \"success\"\n}\n");
}

#[tokio::test]
async fn test_timeout_is_recorded_as_failure() {
  let root = tempfile::tempdir().unwrap();
  let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  tokio::spawn(async move {
    let mut held = Vec::new();
    while let Ok((socket, _)) = listener.accept().await {
      held.push(socket);
    }
  });

  let config = HarnessConfig {
    base_url: format!("http://{}", addr),
    output_root: root.path().to_path_buf(),
    ..HarnessConfig::default()
  };
  let client = ServiceClient::new(&config.base_url, Duration::from_millis(200)).unwrap();
  let store = FsStore::new(root.path());
  let report = SuiteRunner::new(config, Catalog::builtin(), Arc::new(client), Arc::new(store))
    .with_date(date())
    .run_suite("conversation_memory", CancellationToken::new())
    .await
    .unwrap();

  assert_eq!(report.failed(), 2);
  assert!(
    root
      .path()
      .join("2026-10-18/conversation_memory/2.1.2_FAILURE.json")
      .exists()
  );
}
