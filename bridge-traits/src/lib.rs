//! # Host Bridge Traits
//!
//! Platform abstraction traits that must be implemented by each host.
//!
//! ## Overview
//!
//! This crate defines the contract between the utility crates and the
//! environment they run in. Each trait represents a capability the core
//! requires but that is provided differently per host (browser, desktop,
//! tests).
//!
//! ## Traits
//!
//! - [`HttpClient`](http::HttpClient) - Single-shot async HTTP exchange
//! - [`SessionStorage`](storage::SessionStorage) - Key/value slot store for state snapshots
//! - [`HostEnvironment`](host::HostEnvironment) - Document/window introspection
//! - [`LoggerSink`](log::LoggerSink) - Forward structured logs to a host pipeline
//!
//! ## Platform Requirements
//!
//! | Host     | Implementation Crate | Status |
//! |----------|---------------------|--------|
//! | Desktop  | `bridge-desktop`    | ✅ Available |
//! | Browser  | TBD                 | 📋 Planned |
//!
//! ## Fail-Fast Strategy
//!
//! The core fails fast with descriptive errors when a required capability is
//! missing:
//!
//! ```ignore
//! use core_runtime::error::Error;
//!
//! let http_client = config.http_client
//!     .ok_or_else(|| Error::CapabilityMissing {
//!         capability: "HttpClient".to_string(),
//!         message: "No HTTP client implementation provided.".to_string(),
//!     })?;
//! ```
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Implementations
//! should convert platform-specific errors to `BridgeError` and keep the
//! context (key names, URLs) in the message.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so implementations can be shared
//! across async tasks behind an `Arc`.

pub mod error;
pub mod host;
pub mod http;
pub mod log;
pub mod storage;

pub use error::BridgeError;

// Re-export commonly used types
pub use host::{
    DetachedHost, DocumentInfo, ElementMetrics, HostEnvironment, NavigatorInfo,
    RtlScrollAxisType, ScreenMetrics, WindowInfo,
};
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use log::{ConsoleLogger, LogEntry, LogLevel, LoggerSink, RemoteLog, RemoteLogLevel};
pub use storage::SessionStorage;
