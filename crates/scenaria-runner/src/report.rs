//! Per-case and per-suite results.

use chrono::{DateTime, NaiveDate, Utc};
use scenaria_artifact::Verdict;
use scenaria_client::Payload;
use serde::{Deserialize, Serialize};

/// Why a case failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
  /// No HTTP response: connection refused, DNS failure, timeout.
  Transport,
  /// The service answered, but with an error status or an unusable body.
  Service,
}

/// Outcome of a single case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CaseOutcome {
  Success,
  Failure { kind: FailureKind, error: String },
}

impl CaseOutcome {
  pub fn verdict(&self) -> Verdict {
    match self {
      CaseOutcome::Success => Verdict::Success,
      CaseOutcome::Failure { .. } => Verdict::Failure,
    }
  }

  pub fn error(&self) -> Option<&str> {
    match self {
      CaseOutcome::Success => None,
      CaseOutcome::Failure { error, .. } => Some(error),
    }
  }
}

/// Contents of a `FAILURE` artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureArtifact {
  pub error: String,
  /// The request exactly as it was sent.
  pub payload: Payload,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub status_code: Option<u16>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub response: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseReport {
  pub case_id: String,
  pub description: String,
  #[serde(flatten)]
  pub outcome: CaseOutcome,
  /// Store key of the written artifact.
  pub artifact: String,
  pub elapsed_ms: u64,
}

/// Result of a full suite run. Also the shape of `summary.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteReport {
  pub component: String,
  pub date: NaiveDate,
  pub session_id: String,
  pub started_at: DateTime<Utc>,
  pub finished_at: DateTime<Utc>,
  pub cases: Vec<CaseReport>,
}

impl SuiteReport {
  pub fn passed(&self) -> usize {
    self
      .cases
      .iter()
      .filter(|c| c.outcome == CaseOutcome::Success)
      .count()
  }

  pub fn failed(&self) -> usize {
    self.cases.len() - self.passed()
  }

  /// Process exit code: 0 when every case succeeded, 1 otherwise.
  pub fn exit_code(&self) -> u8 {
    if self.failed() == 0 { 0 } else { 1 }
  }
}
