//! Scenaria Artifact
//!
//! This crate provides the artifact storage trait and implementations for
//! scenaria. An artifact is the persisted JSON record of one test case's
//! outcome.
//!
//! The [`Store`] trait defines the backend layer for artifact storage and
//! works on slash-separated keys. [`ArtifactLayout`] translates a run (date,
//! component) and a case (id, [`Verdict`]) into those keys:
//!
//! ```text
//! {root}/
//! └── 2026-10-18/
//!     └── generate_without_context/
//!         ├── 1.1.1_SUCCESS.json
//!         └── 1.1.2_FAILURE.json
//! ```

mod fs;
mod layout;

pub use fs::FsStore;
pub use layout::{ArtifactLayout, Verdict, to_pretty_json};

use async_trait::async_trait;
use bytes::Bytes;

/// Error type for artifact storage operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
  /// The artifact to delete was not found.
  #[error("artifact not found: {0}")]
  NotFound(String),

  /// The directory for an artifact has not been prepared.
  #[error("artifact directory missing for {0}")]
  MissingDirectory(String),

  /// An I/O error occurred.
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  /// The artifact could not be encoded.
  #[error("encode error: {0}")]
  Encode(#[from] serde_json::Error),
}

/// Artifact storage trait.
///
/// Implementations provide the actual storage backend. Callers prepare a
/// directory once with [`Store::prepare`] before putting artifacts under it.
#[async_trait]
pub trait Store: Send + Sync {
  /// Create the directory (and its parents) that will hold artifacts.
  async fn prepare(&self, dir: &str) -> Result<(), Error>;

  /// Store an artifact, replacing any existing one with the same key.
  async fn put(&self, key: &str, data: Bytes) -> Result<(), Error>;

  /// Delete an artifact by key.
  async fn delete(&self, key: &str) -> Result<(), Error>;
}
