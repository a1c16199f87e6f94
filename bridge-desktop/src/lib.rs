//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for native hosts
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! - `HttpClient` using `reqwest`
//! - `SessionStorage` in memory, or as a JSON file on disk
//! - `HostEnvironment` describing a window-less desktop process
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{MemorySessionStorage, ReqwestHttpClient};
//! use std::sync::Arc;
//!
//! let http_client = Arc::new(ReqwestHttpClient::new());
//! let storage = Arc::new(MemorySessionStorage::new());
//!
//! // Use in ToolsConfig
//! ```

mod host;
mod http;
mod storage;

pub use host::DesktopHost;
pub use http::ReqwestHttpClient;
pub use storage::{FileSessionStorage, MemorySessionStorage};
