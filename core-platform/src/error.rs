use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    #[error("Invalid ID number: {0}")]
    InvalidId(String),

    #[error("Unknown environment: {0}")]
    UnknownEnvironment(String),
}

pub type Result<T> = std::result::Result<T, PlatformError>;
