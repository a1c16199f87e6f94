//! # Remote Logger
//!
//! Ships log lines to an HTTP logging backend.
//!
//! - [`RemoteLogger`] filters lines by [`RemoteLogLevel`] and POSTs
//!   `{"level": "<NAME>", "message": "<text>"}` to the configured URL.
//! - [`LoggerId`] carries an optional identifier (usually the user ID) sent
//!   with every line in the `uoh-logger-id` header.
//!
//! [`RemoteLogLevel`]: bridge_traits::RemoteLogLevel

pub mod error;
pub mod id;
pub mod remote;

pub use error::{LoggerError, Result};
pub use id::LoggerId;
pub use remote::RemoteLogger;
