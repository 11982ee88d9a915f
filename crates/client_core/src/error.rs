use signup_shared::error::ApiRejection;
use thiserror::Error;

use crate::view::LOAD_FAILED_TEXT;

/// How a failed request should be presented to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Connection failure, timeout, or a body that is not the expected JSON.
    Transport,
    /// The server answered with a non-2xx status and a structured body.
    Rejected,
}

/// The user-triggered operation a request belongs to; selects the wording
/// shown when it fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    LoadRoster,
    Signup,
    RemoveParticipant,
}

impl Operation {
    pub fn transport_message(self) -> &'static str {
        match self {
            Operation::LoadRoster => LOAD_FAILED_TEXT,
            Operation::Signup => "Failed to sign up. Please try again.",
            Operation::RemoveParticipant => "Failed to remove participant. Please try again.",
        }
    }

    pub fn rejected_fallback(self) -> &'static str {
        match self {
            Operation::RemoveParticipant => "Failed to remove participant",
            Operation::LoadRoster | Operation::Signup => "An error occurred",
        }
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid server url '{url}': {source}")]
    InvalidServerUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("server url '{0}' cannot carry path segments")]
    UnsupportedServerUrl(String),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    Rejected(#[from] ApiRejection),
}

impl ClientError {
    pub fn class(&self) -> FailureClass {
        match self {
            ClientError::Rejected(_) => FailureClass::Rejected,
            _ => FailureClass::Transport,
        }
    }

    /// Server-supplied detail text, if the server rejected the request with one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ClientError::Rejected(rejection) => rejection.detail.as_deref(),
            _ => None,
        }
    }

    /// Text to show the user: the server's detail for rejections, a generic
    /// retry hint for transport failures.
    pub fn user_message(&self, operation: Operation) -> String {
        match self.class() {
            FailureClass::Rejected => self
                .detail()
                .unwrap_or_else(|| operation.rejected_fallback())
                .to_string(),
            FailureClass::Transport => operation.transport_message().to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Rejected(rejection) => Some(rejection.status),
            ClientError::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
