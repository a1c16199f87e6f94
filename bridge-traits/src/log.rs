//! Logging Abstractions
//!
//! Two families of log types live here:
//! - [`LogLevel`], [`LogEntry`] and [`LoggerSink`] mirror `tracing` events
//!   into a host pipeline.
//! - [`RemoteLogLevel`] and [`RemoteLog`] define the wire contract of the
//!   remote logging backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{BridgeError, Result};

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

/// Structured log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// Log level
    pub level: LogLevel,
    /// Timestamp
    pub timestamp: DateTime<Utc>,
    /// Target module/component
    pub target: String,
    /// Log message
    pub message: String,
    /// Structured fields
    pub fields: HashMap<String, String>,
    /// Name of the span the event was recorded in
    pub span_id: Option<String>,
}

impl LogEntry {
    pub fn new(level: LogLevel, target: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            timestamp: Utc::now(),
            target: target.into(),
            message: message.into(),
            fields: HashMap::new(),
            span_id: None,
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn with_span_id(mut self, span_id: impl Into<String>) -> Self {
        self.span_id = Some(span_id.into());
        self
    }
}

/// Logger sink trait
///
/// Receives log entries mirrored from `tracing`:
/// - **Remote**: the HTTP logging backend (`core-logger`)
/// - **Desktop**: console or file logs
/// - **Tests**: in-memory recorders
///
/// Implementations must not emit `tracing` events at or above their own
/// `min_level` while handling an entry, or they will feed themselves.
#[async_trait::async_trait]
pub trait LoggerSink: Send + Sync {
    /// Forward a log entry to the host logging system
    async fn log(&self, entry: LogEntry) -> Result<()>;

    /// Flush any buffered logs
    async fn flush(&self) -> Result<()> {
        Ok(())
    }

    /// Get the minimum log level that will be processed
    ///
    /// Logs below this level can be filtered out at the source for performance.
    fn min_level(&self) -> LogLevel {
        LogLevel::Info
    }
}

/// Console logger implementation for testing/development
#[derive(Debug, Clone)]
pub struct ConsoleLogger {
    pub min_level: LogLevel,
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
        }
    }
}

#[async_trait::async_trait]
impl LoggerSink for ConsoleLogger {
    async fn log(&self, entry: LogEntry) -> Result<()> {
        if entry.level >= self.min_level {
            let level_str = match entry.level {
                LogLevel::Trace => "TRACE",
                LogLevel::Debug => "DEBUG",
                LogLevel::Info => "INFO",
                LogLevel::Warn => "WARN",
                LogLevel::Error => "ERROR",
            };

            println!(
                "[{}] {} {}: {}",
                entry.timestamp.format("%Y-%m-%d %H:%M:%S%.3f"),
                level_str,
                entry.target,
                entry.message
            );

            if !entry.fields.is_empty() {
                println!("  Fields: {:?}", entry.fields);
            }
        }
        Ok(())
    }

    fn min_level(&self) -> LogLevel {
        self.min_level
    }
}

/// Severity of a remote log line.
///
/// Ordered from most severe (`Fatal`) to most verbose (`All`). A line is
/// transmitted when its level is less than or equal to the configured
/// threshold.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum RemoteLogLevel {
    Fatal = 0,
    Error = 1,
    Warn = 2,
    #[default]
    Info = 3,
    Debug = 4,
    All = 5,
}

impl RemoteLogLevel {
    /// Upper-case name sent on the wire.
    pub fn name(&self) -> &'static str {
        match self {
            RemoteLogLevel::Fatal => "FATAL",
            RemoteLogLevel::Error => "ERROR",
            RemoteLogLevel::Warn => "WARN",
            RemoteLogLevel::Info => "INFO",
            RemoteLogLevel::Debug => "DEBUG",
            RemoteLogLevel::All => "ALL",
        }
    }

    /// Whether a line at this level passes `threshold`.
    pub fn is_enabled_for(&self, threshold: RemoteLogLevel) -> bool {
        *self <= threshold
    }
}

impl fmt::Display for RemoteLogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RemoteLogLevel {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FATAL" => Ok(RemoteLogLevel::Fatal),
            "ERROR" => Ok(RemoteLogLevel::Error),
            "WARN" | "WARNING" => Ok(RemoteLogLevel::Warn),
            "INFO" => Ok(RemoteLogLevel::Info),
            "DEBUG" => Ok(RemoteLogLevel::Debug),
            "ALL" => Ok(RemoteLogLevel::All),
            other => Err(BridgeError::OperationFailed(format!(
                "Unknown remote log level: {}",
                other
            ))),
        }
    }
}

impl From<LogLevel> for RemoteLogLevel {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => RemoteLogLevel::All,
            LogLevel::Debug => RemoteLogLevel::Debug,
            LogLevel::Info => RemoteLogLevel::Info,
            LogLevel::Warn => RemoteLogLevel::Warn,
            LogLevel::Error => RemoteLogLevel::Error,
        }
    }
}

/// Body of a remote log request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteLog {
    pub level: String,
    pub message: String,
}

impl RemoteLog {
    pub fn new(level: RemoteLogLevel, message: impl Into<String>) -> Self {
        Self {
            level: level.name().to_string(),
            message: message.into(),
        }
    }
}
