use bridge_traits::BridgeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoggerError {
    #[error("Log delivery failed: {0}")]
    Delivery(#[from] BridgeError),

    #[error("Logging endpoint responded with status {0}")]
    Status(u16),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LoggerError>;
