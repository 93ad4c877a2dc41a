// Error taxonomy for device calls
//
// Callers commonly branch on the kind (a timeout is often retried by the
// operator, a validation error usually means a version mismatch), so each
// failure stage gets its own variant.

use std::time::Duration;
use thiserror::Error;

use crate::schema::ValidationErrors;

/// Opaque cause from a transport implementation
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The HTTP client itself could not be constructed
    #[error("Failed to create HTTP client: {0}")]
    Setup(#[source] BoxError),

    #[error("Failed to serialize request: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Network-level failure: DNS, connection refused, reset
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: BoxError,
    },

    /// No response headers arrived before the deadline
    #[error("Request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    /// The connection dropped while the body was being read
    #[error("Failed to read response body: {0}")]
    Body(#[source] BoxError),

    /// The device answered with a non-2xx status
    #[error("HTTP {status}{}: {body}", with_leading_space(.status_text))]
    Status {
        status: u16,
        status_text: String,
        body: String,
    },

    #[error("Failed to parse JSON response: {0}")]
    Deserialize(#[source] serde_json::Error),

    #[error("Response validation failed: {0}")]
    Validation(#[from] ValidationErrors),
}

impl ClientError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Timeout { .. })
    }

    /// Whether the request never got an answer (network failure or timeout)
    pub fn is_unreachable(&self) -> bool {
        matches!(
            self,
            ClientError::Transport { .. } | ClientError::Timeout { .. }
        )
    }

    /// HTTP status, when the device did answer with an error status
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn with_leading_space(text: &str) -> String {
    if text.is_empty() {
        String::new()
    } else {
        format!(" {}", text)
    }
}
