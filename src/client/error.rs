use serde_json::Value;
use thiserror::Error;

/// Errors raised while talking to the job service
#[derive(Error, Debug)]
pub enum ClientError {
    /// Connection, TLS or other transport failure
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success status, with the message the server reported if any
    #[error("API error: {status} - {}", .message.as_deref().unwrap_or("no message"))]
    Api {
        status: u16,
        message: Option<String>,
    },

    /// Response body could not be decoded
    #[error("Invalid response payload: {0}")]
    Decode(String),

    /// Base URL or path could not be turned into a request URL
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    pub fn api_error(status: u16, body: &str) -> Self {
        Self::Api {
            status,
            message: server_message_from_body(body),
        }
    }

    /// Message embedded in the server's error body, when there was one
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Api { status: 404, .. })
    }
}

/// Extract a readable message from an error body such as
/// `{"error": "Validation failed", "fields": {"title": {"errors": ["Title is required"]}}}`.
pub(crate) fn server_message_from_body(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let headline = match value.get("error") {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        Some(other @ Value::Object(_)) | Some(other @ Value::Array(_)) => {
            let messages = collect_messages(other);
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        _ => None,
    }?;

    let details = value.get("fields").map(collect_messages).unwrap_or_default();
    if details.is_empty() {
        Some(headline)
    } else {
        Some(format!("{}: {}", headline, details.join("; ")))
    }
}

fn collect_messages(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => vec![s.clone()],
        Value::Array(items) => items.iter().flat_map(collect_messages).collect(),
        Value::Object(map) => map.values().flat_map(collect_messages).collect(),
        _ => Vec::new(),
    }
}
