//! Run events and notifiers for progress reporting.
//!
//! Events are emitted while a suite runs so consumers can print progress
//! or ignore it.

use std::io::Write;

use scenaria_artifact::Verdict;
use serde::{Deserialize, Serialize};

/// Events emitted during a suite run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RunEvent {
  /// The output directory is ready and the first request is about to go out.
  SuiteStarted {
    component: String,
    session_id: String,
    total_cases: usize,
  },

  /// A suite document was accepted by the service.
  DocumentUploaded {
    filename: String,
    chunks_created: Option<u64>,
  },

  /// A case request is about to be sent.
  CaseStarted {
    case_id: String,
    index: usize,
    total: usize,
  },

  /// A case's artifact has been written.
  CaseFinished {
    case_id: String,
    description: String,
    verdict: Verdict,
    error: Option<String>,
    artifact: String,
  },

  /// Every case has an artifact.
  SuiteFinished {
    component: String,
    passed: usize,
    failed: usize,
  },
}

/// Trait for receiving run events.
pub trait RunNotifier: Send + Sync {
  /// Called when a run event occurs.
  fn notify(&self, event: RunEvent);
}

/// A no-op notifier that discards all events.
#[derive(Debug, Clone, Default)]
pub struct NoopNotifier;

impl RunNotifier for NoopNotifier {
  fn notify(&self, _event: RunEvent) {}
}

/// Prints one human-readable line per case to stdout.
#[derive(Debug, Clone, Default)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
  /// The line printed for an event, if any.
  pub fn progress_line(event: &RunEvent) -> Option<String> {
    match event {
      RunEvent::SuiteStarted {
        component,
        total_cases,
        ..
      } => Some(format!("Running {} ({} cases)", component, total_cases)),
      RunEvent::DocumentUploaded {
        filename,
        chunks_created,
      } => Some(match chunks_created {
        Some(chunks) => format!("Uploaded {} ({} chunks)", filename, chunks),
        None => format!("Uploaded {}", filename),
      }),
      RunEvent::CaseStarted { .. } => None,
      RunEvent::CaseFinished {
        case_id,
        description,
        verdict,
        error,
        ..
      } => Some(match (verdict, error) {
        (Verdict::Success, _) => format!("[PASS] {} {}", case_id, description),
        (Verdict::Failure, Some(error)) => {
          format!("[FAIL] {} {}: {}", case_id, description, single_line(error))
        }
        (Verdict::Failure, None) => format!("[FAIL] {} {}", case_id, description),
      }),
      RunEvent::SuiteFinished {
        component,
        passed,
        failed,
      } => Some(format!(
        "{}: {} passed, {} failed",
        component, passed, failed
      )),
    }
  }
}

/// Collapse line breaks so a progress marker stays on one line.
fn single_line(text: &str) -> String {
  text
    .lines()
    .map(str::trim)
    .filter(|l| !l.is_empty())
    .collect::<Vec<_>>()
    .join(" ")
}

impl RunNotifier for ConsoleNotifier {
  fn notify(&self, event: RunEvent) {
    if let Some(line) = Self::progress_line(&event) {
      let mut stdout = std::io::stdout().lock();
      let _ = writeln!(stdout, "{}", line);
      let _ = stdout.flush();
    }
  }
}
