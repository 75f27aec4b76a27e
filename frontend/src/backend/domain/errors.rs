//! Error types of the client layer.

use thiserror::Error;

use crate::backend::domain::form_validation::FormError;

/// Boxed underlying cause of a transport failure
pub type TransportSource = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response (DNS, connect, TLS, body read)
    #[error("sheets API request failed while {action}: {source}")]
    Transport {
        action: String,
        #[source]
        source: TransportSource,
    },

    /// A response arrived with a non-success HTTP status
    #[error("sheets API answered HTTP {status} while {action}")]
    HttpStatus { action: String, status: u16 },

    /// The body was not JSON, or not the shape the call expects
    #[error("malformed response while {action}: {detail}")]
    MalformedResponse { action: String, detail: String },

    /// A create request came back with a status other than "success"
    #[error("sheets API rejected the write with status {status:?}")]
    Rejected {
        status: String,
        message: Option<String>,
    },

    #[error("local cache failure: {0}")]
    Cache(String),

    #[error("export failed: {0}")]
    Export(String),

    #[error(transparent)]
    Validation(#[from] FormError),
}

impl ClientError {
    pub fn transport(action: impl Into<String>, source: impl Into<TransportSource>) -> Self {
        ClientError::Transport {
            action: action.into(),
            source: source.into(),
        }
    }

    pub fn malformed(action: impl Into<String>, detail: impl Into<String>) -> Self {
        ClientError::MalformedResponse {
            action: action.into(),
            detail: detail.into(),
        }
    }

    /// Failures caught at the fetch boundary: the request or its response
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            ClientError::Transport { .. }
                | ClientError::HttpStatus { .. }
                | ClientError::MalformedResponse { .. }
        )
    }
}
