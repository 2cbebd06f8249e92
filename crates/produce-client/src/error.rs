//! Prediction client error types.

use thiserror::Error;

/// Largest response excerpt kept on an error.
const BODY_EXCERPT_LIMIT: usize = 512;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response body: {source} (body: {body:?})")]
    Decode {
        #[source]
        source: serde_json::Error,
        body: String,
    },

    #[error("Prediction service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Training label must not be empty")]
    InvalidLabel,

    #[error("Invalid upload: {0}")]
    InvalidUpload(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ClientError {
    pub(crate) fn decode(source: serde_json::Error, body: &[u8]) -> Self {
        Self::Decode {
            source,
            body: excerpt(body),
        }
    }

    pub(crate) fn status(status: u16, body: &[u8]) -> Self {
        Self::Status {
            status,
            body: excerpt(body),
        }
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// True if the request never produced a complete response.
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport(_))
    }

    /// True if a response arrived but its body was not the expected JSON.
    pub fn is_decode(&self) -> bool {
        matches!(self, ClientError::Decode { .. })
    }

    /// HTTP status carried by the error, if any.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Short label used for metrics.
    pub(crate) fn outcome(&self) -> &'static str {
        match self {
            ClientError::Transport(_) => "transport_error",
            ClientError::Decode { .. } => "decode_error",
            ClientError::Status { .. } => "status_error",
            ClientError::Io(_) => "io_error",
            ClientError::InvalidLabel | ClientError::InvalidUpload(_) => "invalid_input",
            ClientError::InvalidConfig(_) => "invalid_config",
        }
    }
}

fn excerpt(body: &[u8]) -> String {
    let end = body.len().min(BODY_EXCERPT_LIMIT);
    String::from_utf8_lossy(&body[..end]).into_owned()
}
