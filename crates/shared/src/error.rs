use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Error body returned by the backend with a non-2xx status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
}

impl ErrorDetail {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: Some(Value::String(detail.into())),
        }
    }

    /// Text to show the user. Strings are used verbatim, other JSON values
    /// (validation error lists and the like) as compact JSON.
    pub fn text(&self) -> Option<String> {
        match self.detail.as_ref()? {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("server rejected request with status {status}: {}", .detail.as_deref().unwrap_or("<no detail>"))]
pub struct ApiRejection {
    pub status: u16,
    pub detail: Option<String>,
}

impl ApiRejection {
    pub fn new(status: u16, detail: Option<String>) -> Self {
        Self { status, detail }
    }
}
