use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Core initialization failed: {0}")]
    InitializationFailed(String),

    #[error("Capability missing: {capability} - {message}")]
    CapabilityMissing { capability: String, message: String },

    #[error("Runtime error: {0}")]
    Runtime(#[from] core_runtime::Error),

    #[error("State error: {0}")]
    State(#[from] core_state::StateError),

    #[error("Request error: {0}")]
    Request(#[from] core_request::RequestError),

    #[error("Logger error: {0}")]
    Logger(#[from] core_logger::LoggerError),

    #[error("Platform error: {0}")]
    Platform(#[from] core_platform::PlatformError),
}

pub type Result<T> = std::result::Result<T, CoreError>;
