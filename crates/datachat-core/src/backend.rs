//! Analysis backend boundary.
//!
//! The backend is an opaque pair of endpoints: `POST /upload` takes a
//! multipart file, `POST /chat` takes `{ "query": ... }` and answers with
//! `answer` or `error`. `Backend` is the seam the controller talks to;
//! `HttpBackend` is the reqwest implementation.

mod http;

use std::future::Future;

pub use http::HttpBackend;
use serde_json::Value;

use crate::attachment::Attachment;

/// Failure of a backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The backend answered with a non-2xx status.
    Status { status: u16, body: Option<String> },
    /// No response was received (connection, timeout, local read error).
    Transport(String),
}

impl BackendError {
    /// Response body, if the backend sent a non-empty one.
    pub fn body(&self) -> Option<&str> {
        match self {
            BackendError::Status { body, .. } => body.as_deref().filter(|b| !b.trim().is_empty()),
            BackendError::Transport(_) => None,
        }
    }

    /// `message` field from a JSON error body.
    pub fn structured_message(&self) -> Option<String> {
        let body = self.body()?;
        let value: Value = serde_json::from_str(body).ok()?;
        text_field(&value, "message")
    }

    /// Generic description for failures that carry a status.
    pub fn generic_message(&self) -> Option<String> {
        match self {
            BackendError::Status { status, .. } => {
                Some(format!("Request failed with status code {status}"))
            }
            BackendError::Transport(_) => None,
        }
    }
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::Status { status, body } => match body {
                Some(body) if !body.trim().is_empty() => {
                    write!(f, "backend returned {status}: {}", body.trim_end())
                }
                _ => write!(f, "backend returned {status}"),
            },
            BackendError::Transport(message) => write!(f, "request failed: {message}"),
        }
    }
}

impl std::error::Error for BackendError {}

/// Parsed body of a successful `/chat` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatReply {
    pub answer: Option<String>,
    pub error: Option<String>,
}

impl ChatReply {
    pub fn answer(text: impl Into<String>) -> Self {
        Self {
            answer: Some(text.into()),
            error: None,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            answer: None,
            error: Some(text.into()),
        }
    }

    /// Extracts `answer` / `error` from a JSON body.
    ///
    /// Empty strings, nulls, `false` and numeric zero count as absent. Other
    /// non-string values are shown as their JSON text.
    pub fn from_json(value: &Value) -> Self {
        Self {
            answer: text_field(value, "answer"),
            error: text_field(value, "error"),
        }
    }

    /// Parses a raw response body; anything that isn't JSON yields an empty reply.
    pub fn from_body(body: &str) -> Self {
        serde_json::from_str::<Value>(body)
            .map(|value| Self::from_json(&value))
            .unwrap_or_default()
    }
}

fn text_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::Null | Value::Bool(false) => None,
        Value::Number(n) if n.as_f64().is_some_and(|v| v.abs() < f64::EPSILON) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// The two calls the controller needs from the analysis service.
pub trait Backend: Send + Sync {
    /// Sends the attachment to the upload endpoint.
    fn upload(&self, attachment: &Attachment)
    -> impl Future<Output = Result<(), BackendError>> + Send;

    /// Sends a query to the chat endpoint.
    fn chat(&self, query: &str) -> impl Future<Output = Result<ChatReply, BackendError>> + Send;
}
