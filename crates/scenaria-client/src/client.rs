use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use tracing::debug;
use url::Url;

use crate::error::ClientError;
use crate::payload::{Payload, UploadReceipt};

/// The service operations the harness depends on.
#[async_trait]
pub trait ChatService: Send + Sync {
  /// Send one chat request and return the decoded JSON body of a 2xx response.
  async fn chat(&self, payload: &Payload) -> Result<serde_json::Value, ClientError>;

  /// Upload a document into a session.
  async fn upload(&self, session_id: &str, path: &Path) -> Result<UploadReceipt, ClientError>;
}

/// `reqwest`-backed client for a running service.
pub struct ServiceClient {
  client: Client,
  base_url: Url,
}

impl ServiceClient {
  /// Create a client whose every request is bounded by `timeout`.
  ///
  /// A path on `base_url` is kept: `http://host/api` posts to
  /// `http://host/api/chat`.
  pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
    let mut parsed = Url::parse(base_url).map_err(|e| ClientError::InvalidUrl {
      url: base_url.to_string(),
      message: e.to_string(),
    })?;
    if parsed.cannot_be_a_base() || parsed.host().is_none() {
      return Err(ClientError::InvalidUrl {
        url: base_url.to_string(),
        message: "expected an absolute address with a host".to_string(),
      });
    }
    if !parsed.path().ends_with('/') {
      let path = format!("{}/", parsed.path());
      parsed.set_path(&path);
    }

    let client = Client::builder().timeout(timeout).build()?;
    Ok(Self {
      client,
      base_url: parsed,
    })
  }

  fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
    self
      .base_url
      .join(path)
      .map_err(|e| ClientError::InvalidUrl {
        url: format!("{}{}", self.base_url, path),
        message: e.to_string(),
      })
  }
}

#[async_trait]
impl ChatService for ServiceClient {
  async fn chat(&self, payload: &Payload) -> Result<serde_json::Value, ClientError> {
    let url = self.endpoint("chat")?;
    debug!(%url, session_id = %payload.session_id, "sending chat request");

    let response = self.client.post(url).json(payload).send().await?;
    read_json(response).await
  }

  async fn upload(&self, session_id: &str, path: &Path) -> Result<UploadReceipt, ClientError> {
    let bytes = tokio::fs::read(path)
      .await
      .map_err(|source| ClientError::Document {
        path: path.to_path_buf(),
        source,
      })?;

    let file_name = path
      .file_name()
      .map(|n| n.to_string_lossy().into_owned())
      .unwrap_or_else(|| "document".to_string());

    let url = self.endpoint("upload")?;
    debug!(%url, %session_id, file = %file_name, size = bytes.len(), "uploading document");

    let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name.clone()));
    let response = self
      .client
      .post(url)
      .query(&[("session_id", session_id)])
      .multipart(form)
      .send()
      .await?;

    let body = read_json(response).await?;
    let status = body
      .get("status")
      .and_then(|s| s.as_str())
      .map(str::to_string);
    let receipt: UploadReceipt =
      serde_json::from_value(body).map_err(|e| ClientError::UploadRejected {
        filename: file_name.clone(),
        status: status.unwrap_or_else(|| format!("unreadable receipt: {}", e)),
      })?;

    if !receipt.is_success() {
      return Err(ClientError::UploadRejected {
        filename: file_name,
        status: receipt.status,
      });
    }

    Ok(receipt)
  }
}

/// Turn a response into JSON, or into the matching error.
async fn read_json(response: Response) -> Result<serde_json::Value, ClientError> {
  let status = response.status();
  let body = response.text().await?;

  if !status.is_success() {
    return Err(ClientError::Status {
      status: status.as_u16(),
      body,
    });
  }

  serde_json::from_str(&body).map_err(|e| ClientError::InvalidBody {
    status: status.as_u16(),
    message: e.to_string(),
    body,
  })
}
