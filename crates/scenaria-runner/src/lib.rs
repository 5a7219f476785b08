//! Scenaria Runner
//!
//! Drives one suite of test cases against the service, strictly one case at
//! a time, and leaves one artifact per case under
//! `<output_root>/<date>/<component>/`.
//!
//! Per-case failures (transport errors, service errors) are recorded as
//! `FAILURE` artifacts and never stop the suite. Setup failures (unknown
//! component, unwritable output directory, rejected document upload) abort
//! the run with a [`RunError`].

mod error;
mod events;
mod report;
mod runner;

pub use error::RunError;
pub use events::{ConsoleNotifier, NoopNotifier, RunEvent, RunNotifier};
pub use report::{CaseOutcome, CaseReport, FailureArtifact, FailureKind, SuiteReport};
pub use runner::SuiteRunner;
