use std::error::Error as _;
use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by the service client.
#[derive(Debug, Error)]
pub enum ClientError {
  /// Connection refused, DNS failure, timeout, or any other failure to get a
  /// response.
  #[error("request failed")]
  Transport(#[from] reqwest::Error),

  /// The configured service address cannot be used to build requests.
  #[error("invalid service url '{url}': {message}")]
  InvalidUrl { url: String, message: String },

  /// The service answered with a non-2xx status.
  #[error("service returned HTTP {status}")]
  Status { status: u16, body: String },

  /// The service answered 2xx but the body is not the expected JSON.
  #[error("invalid response body (HTTP {status}): {message}")]
  InvalidBody {
    status: u16,
    message: String,
    body: String,
  },

  /// The upload endpoint answered but did not accept the document.
  #[error("upload of {filename} rejected with status '{status}'")]
  UploadRejected { filename: String, status: String },

  /// A local document could not be read for upload.
  #[error("failed to read {}", .path.display())]
  Document {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

impl ClientError {
  /// Whether the request never produced an HTTP response.
  pub fn is_transport(&self) -> bool {
    matches!(self, ClientError::Transport(_))
  }

  /// HTTP status of the response, when there was one.
  pub fn status_code(&self) -> Option<u16> {
    match self {
      ClientError::Status { status, .. } | ClientError::InvalidBody { status, .. } => {
        Some(*status)
      }
      _ => None,
    }
  }

  /// The raw response body, parsed as JSON when possible.
  pub fn response_body(&self) -> Option<serde_json::Value> {
    match self {
      ClientError::Status { body, .. } | ClientError::InvalidBody { body, .. } => {
        if body.is_empty() {
          return None;
        }
        Some(
          serde_json::from_str(body).unwrap_or_else(|_| serde_json::Value::String(body.clone())),
        )
      }
      _ => None,
    }
  }

  /// Render the error with its full source chain.
  ///
  /// `reqwest` keeps the interesting part (connection refused, timed out)
  /// in the source chain rather than the top-level message.
  pub fn detailed(&self) -> String {
    let mut message = self.to_string();
    let mut source = std::error::Error::source(self);
    while let Some(err) = source {
      message.push_str(": ");
      message.push_str(&err.to_string());
      source = err.source();
    }
    message
  }
}
