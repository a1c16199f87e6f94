use bridge_traits::BridgeError;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RequestError {
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Request failed with status {status}")]
    Status { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(#[from] BridgeError),

    #[error("Invalid request options: {0}")]
    InvalidOptions(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RequestError {
    /// HTTP status of a rejected request.
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Response body of a rejected request.
    pub fn body(&self) -> Option<&str> {
        match self {
            RequestError::Status { body, .. } => Some(body),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, RequestError>;
