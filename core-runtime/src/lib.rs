//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the tools crates:
//! - Logging and tracing infrastructure
//! - Configuration management
//!
//! ## Overview
//!
//! This crate contains the runtime utilities that the other modules depend on.
//! It establishes the logging conventions and the configuration object from
//! which the request pipeline, the remote logger and the stores are wired.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{LoggerConfig, RequestConfig, ToolsConfig, ToolsConfigBuilder};
pub use error::{Error, Result};
