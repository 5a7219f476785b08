use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Uploaded-file descriptors keyed by the file name the service reported.
pub type UploadedFiles = BTreeMap<String, UploadReceipt>;

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
  pub role: Role,
  pub content: String,
}

/// Request body for `POST /chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payload {
  pub session_id: String,
  pub messages: Vec<Message>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub active_document: Option<String>,
  #[serde(default)]
  pub uploaded_files: UploadedFiles,
}

impl Payload {
  /// Build the request for a single user query.
  ///
  /// The most recently uploaded document (last in `uploaded`, ordered by
  /// upload) is sent as the active document.
  pub fn for_query(
    session_id: &str,
    query: &str,
    uploaded: &[UploadReceipt],
  ) -> Self {
    Self {
      session_id: session_id.to_string(),
      messages: vec![Message {
        role: Role::User,
        content: query.to_string(),
      }],
      active_document: uploaded.last().map(|r| r.filename.clone()),
      uploaded_files: uploaded
        .iter()
        .map(|r| (r.filename.clone(), r.clone()))
        .collect(),
    }
  }
}

/// Response body of `POST /upload`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadReceipt {
  pub status: String,
  pub filename: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub chunks_created: Option<u64>,
  /// Any other fields the service returned, kept verbatim.
  #[serde(flatten)]
  pub extra: serde_json::Map<String, serde_json::Value>,
}

impl UploadReceipt {
  pub fn is_success(&self) -> bool {
    self.status == "success"
  }
}
