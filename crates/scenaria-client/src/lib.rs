//! Scenaria Client
//!
//! HTTP access to the document/chat service under test. The [`ChatService`]
//! trait is the seam the runner drives; [`ServiceClient`] implements it over
//! `reqwest` against the service's `/chat` and `/upload` endpoints.

mod client;
mod error;
mod payload;

pub use client::{ChatService, ServiceClient};
pub use error::ClientError;
pub use payload::{Message, Payload, Role, UploadReceipt, UploadedFiles};
