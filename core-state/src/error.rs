use bridge_traits::BridgeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StateError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] BridgeError),

    #[error("No async runtime available: {0}")]
    RuntimeUnavailable(String),
}

pub type Result<T> = std::result::Result<T, StateError>;
