//! Suite execution.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use chrono::{Local, NaiveDate, Utc};
use scenaria_artifact::{ArtifactLayout, Store, to_pretty_json};
use scenaria_client::{ChatService, ClientError, Payload, UploadReceipt};
use scenaria_config::{Catalog, HarnessConfig, Suite, TestCase};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};

use crate::error::RunError;
use crate::events::{NoopNotifier, RunEvent, RunNotifier};
use crate::report::{CaseOutcome, CaseReport, FailureArtifact, FailureKind, SuiteReport};

/// Runs suites from a catalog against one service, one case at a time.
pub struct SuiteRunner {
  config: HarnessConfig,
  catalog: Catalog,
  service: Arc<dyn ChatService>,
  store: Arc<dyn Store>,
  notifier: Arc<dyn RunNotifier>,
  date: Option<NaiveDate>,
}

/// What one case produced, before it is written.
struct CaseResult {
  outcome: CaseOutcome,
  artifact: serde_json::Value,
}

impl SuiteRunner {
  pub fn new(
    config: HarnessConfig,
    catalog: Catalog,
    service: Arc<dyn ChatService>,
    store: Arc<dyn Store>,
  ) -> Self {
    Self {
      config,
      catalog,
      service,
      store,
      notifier: Arc::new(NoopNotifier),
      date: None,
    }
  }

  pub fn with_notifier(mut self, notifier: Arc<dyn RunNotifier>) -> Self {
    self.notifier = notifier;
    self
  }

  /// Pin the date folder instead of using today's local date.
  pub fn with_date(mut self, date: NaiveDate) -> Self {
    self.date = Some(date);
    self
  }

  /// Run every case of the named component's suite, in order.
  ///
  /// Exactly one artifact is left per case. Case failures are part of the
  /// returned report; only setup and I/O failures return an error.
  #[instrument(
    name = "suite_run",
    skip(self, cancel),
    fields(session_id = %self.config.session_id)
  )]
  pub async fn run_suite(
    &self,
    component_name: &str,
    cancel: CancellationToken,
  ) -> Result<SuiteReport, RunError> {
    let suite = self.catalog.get(component_name)?;
    let date = self.date.unwrap_or_else(|| Local::now().date_naive());
    let layout = ArtifactLayout::new(date, &suite.component_name);
    let started_at = Utc::now();

    // Directory exists before the first request goes out.
    self
      .store
      .prepare(&layout.dir())
      .await
      .map_err(|source| RunError::Artifact {
        key: layout.dir(),
        source,
      })?;

    info!(
      component = %suite.component_name,
      cases = suite.cases.len(),
      output = %layout.dir(),
      "suite_started"
    );
    self.notifier.notify(RunEvent::SuiteStarted {
      component: suite.component_name.clone(),
      session_id: self.config.session_id.clone(),
      total_cases: suite.cases.len(),
    });

    let uploads = self.upload_documents(suite, &cancel).await?;

    let total = suite.cases.len();
    let mut cases = Vec::with_capacity(total);

    for (index, case) in suite.cases.iter().enumerate() {
      if cancel.is_cancelled() {
        warn!(completed = index, total, "suite cancelled");
        return Err(RunError::Cancelled {
          completed: index,
          total,
        });
      }

      self.notifier.notify(RunEvent::CaseStarted {
        case_id: case.id.clone(),
        index,
        total,
      });

      let started = Instant::now();
      let payload = Payload::for_query(&self.config.session_id, &case.query, &uploads);

      let result = tokio::select! {
        result = self.execute_case(case, &payload) => result,
        _ = cancel.cancelled() => {
          warn!(case_id = %case.id, completed = index, total, "suite cancelled during case");
          return Err(RunError::Cancelled { completed: index, total });
        }
      };

      let artifact = self.write_case(&layout, case, &result).await?;

      let report = CaseReport {
        case_id: case.id.clone(),
        description: case.description.clone(),
        outcome: result.outcome,
        artifact,
        elapsed_ms: started.elapsed().as_millis() as u64,
      };

      self.notifier.notify(RunEvent::CaseFinished {
        case_id: report.case_id.clone(),
        description: report.description.clone(),
        verdict: report.outcome.verdict(),
        error: report.outcome.error().map(str::to_string),
        artifact: report.artifact.clone(),
      });
      cases.push(report);
    }

    let report = SuiteReport {
      component: suite.component_name.clone(),
      date,
      session_id: self.config.session_id.clone(),
      started_at,
      finished_at: Utc::now(),
      cases,
    };

    if self.config.write_summary {
      self.put_json(&layout.summary_key(), &report).await?;
    }

    info!(
      component = %report.component,
      passed = report.passed(),
      failed = report.failed(),
      "suite_finished"
    );
    self.notifier.notify(RunEvent::SuiteFinished {
      component: report.component.clone(),
      passed: report.passed(),
      failed: report.failed(),
    });

    Ok(report)
  }

  /// Upload the suite's documents into the session, in order.
  async fn upload_documents(
    &self,
    suite: &Suite,
    cancel: &CancellationToken,
  ) -> Result<Vec<UploadReceipt>, RunError> {
    let mut receipts = Vec::with_capacity(suite.documents.len());

    for path in &suite.documents {
      if cancel.is_cancelled() {
        return Err(RunError::Cancelled {
          completed: 0,
          total: suite.cases.len(),
        });
      }

      let receipt = tokio::select! {
        receipt = self.upload(path) => receipt?,
        _ = cancel.cancelled() => {
          warn!(path = %path.display(), "suite cancelled during document upload");
          return Err(RunError::Cancelled {
            completed: 0,
            total: suite.cases.len(),
          });
        }
      };
      self.notifier.notify(RunEvent::DocumentUploaded {
        filename: receipt.filename.clone(),
        chunks_created: receipt.chunks_created,
      });
      receipts.push(receipt);
    }

    Ok(receipts)
  }

  async fn upload(&self, path: &Path) -> Result<UploadReceipt, RunError> {
    match self.service.upload(&self.config.session_id, path).await {
      Ok(receipt) => {
        info!(
          file = %receipt.filename,
          chunks = ?receipt.chunks_created,
          "document_uploaded"
        );
        Ok(receipt)
      }
      Err(source) => {
        error!(path = %path.display(), error = %source.detailed(), "document_upload_failed");
        Err(RunError::Upload {
          path: path.to_path_buf(),
          source,
        })
      }
    }
  }

  /// Send one case and classify the answer.
  #[instrument(name = "case_run", skip(self, case, payload), fields(case_id = %case.id))]
  async fn execute_case(&self, case: &TestCase, payload: &Payload) -> CaseResult {
    let result = match self.service.chat(payload).await {
      Ok(body) => self.classify_body(body, payload),
      Err(err) => failure_from_client_error(&err, payload),
    };

    match &result.outcome {
      CaseOutcome::Success => info!("case_succeeded"),
      CaseOutcome::Failure { kind, error } => {
        error!(kind = ?kind, error = %error, "case_failed")
      }
    }

    result
  }

  /// A 2xx body is a success unless strict checking finds a non-success
  /// `status` field.
  fn classify_body(&self, body: serde_json::Value, payload: &Payload) -> CaseResult {
    let rejected = match body.get("status") {
      Some(serde_json::Value::String(s)) => s != "success",
      Some(_) => true,
      None => false,
    };

    if !(self.config.strict_status && rejected) {
      return CaseResult {
        outcome: CaseOutcome::Success,
        artifact: body,
      };
    }

    let mut error = format!("service reported status {}", body["status"]);
    if let Some(detail) = body.get("error").and_then(|e| e.as_str()) {
      error.push_str(": ");
      error.push_str(detail);
    }

    failure(
      FailureKind::Service,
      error,
      payload,
      None,
      Some(body),
    )
  }

  /// Write a case's artifact and drop a stale one with the other suffix.
  async fn write_case(
    &self,
    layout: &ArtifactLayout,
    case: &TestCase,
    result: &CaseResult,
  ) -> Result<String, RunError> {
    let verdict = result.outcome.verdict();
    let key = layout.case_key(&case.id, verdict);
    self.put_json(&key, &result.artifact).await?;

    let stale = layout.case_key(&case.id, verdict.opposite());
    match self.store.delete(&stale).await {
      Ok(()) => info!(key = %stale, "removed stale artifact"),
      Err(scenaria_artifact::Error::NotFound(_)) => {}
      Err(source) => return Err(RunError::Artifact { key: stale, source }),
    }

    Ok(key)
  }

  async fn put_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), RunError> {
    let artifact_error = |source| RunError::Artifact {
      key: key.to_string(),
      source,
    };
    let bytes = to_pretty_json(value).map_err(artifact_error)?;
    self.store.put(key, bytes).await.map_err(artifact_error)
  }
}

fn failure_from_client_error(err: &ClientError, payload: &Payload) -> CaseResult {
  let kind = if err.is_transport() {
    FailureKind::Transport
  } else {
    FailureKind::Service
  };
  failure(
    kind,
    err.detailed(),
    payload,
    err.status_code(),
    err.response_body(),
  )
}

fn failure(
  kind: FailureKind,
  error: String,
  payload: &Payload,
  status_code: Option<u16>,
  response: Option<serde_json::Value>,
) -> CaseResult {
  let artifact = FailureArtifact {
    error: error.clone(),
    payload: payload.clone(),
    status_code,
    response,
  };

  CaseResult {
    outcome: CaseOutcome::Failure { kind, error },
    // A FailureArtifact only holds strings, numbers and JSON values.
    artifact: serde_json::to_value(artifact).unwrap_or_else(|e| {
      serde_json::json!({ "error": format!("failed to encode failure: {}", e) })
    }),
  }
}
