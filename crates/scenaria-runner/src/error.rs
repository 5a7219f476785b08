//! Runner errors.

use std::path::PathBuf;

use scenaria_client::ClientError;
use scenaria_config::ConfigError;

/// Errors that abort a whole run.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
  /// The suite could not be selected.
  #[error(transparent)]
  Config(#[from] ConfigError),

  /// An artifact could not be written or the output directory created.
  #[error("failed to write artifact {key}")]
  Artifact {
    key: String,
    #[source]
    source: scenaria_artifact::Error,
  },

  /// A suite document could not be uploaded.
  #[error("failed to upload document {}", .path.display())]
  Upload {
    path: PathBuf,
    #[source]
    source: ClientError,
  },

  /// The run was cancelled before every case finished.
  #[error("run cancelled after {completed} of {total} cases")]
  Cancelled { completed: usize, total: usize },
}
