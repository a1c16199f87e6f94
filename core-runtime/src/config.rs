//! # Tools Configuration Module
//!
//! Provides configuration management for the tools crates.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a
//! `ToolsConfig` instance that holds every capability and setting the request
//! pipeline, the remote logger and the stores need. It enforces fail-fast
//! validation so a misconfigured application never gets past start-up.
//!
//! ## Required Dependencies
//!
//! - `HttpClient` - transport for the request pipeline and the remote logger
//!   (desktop default: reqwest)
//!
//! ## Optional Dependencies (with platform defaults)
//!
//! - `SessionStorage` - persistence for stores (desktop default: in-memory)
//! - `HostEnvironment` - document/window introspection (desktop default:
//!   a window-less host; otherwise the detached host)
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::ToolsConfig;
//! use bridge_traits::RemoteLogLevel;
//!
//! let config = ToolsConfig::builder()
//!     .origin_url("https://portal.example.ac.il")
//!     .logger_url("https://portal.example.ac.il/api/log")
//!     .logger_level(RemoteLogLevel::Warn)
//!     .build()?;
//! ```

use crate::error::{Error, Result};
use bridge_traits::{DetachedHost, HostEnvironment, HttpClient, RemoteLogLevel, SessionStorage};
use std::sync::Arc;
use std::time::Duration;

/// Per-request timeout applied by the error-handling interceptor.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Upper bound accepted for the request timeout.
pub const MAX_REQUEST_TIMEOUT: Duration = Duration::from_secs(600);

/// Settings consumed by the request pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestConfig {
    /// Origin prefixed to relative request URLs; resolved from the host
    /// document when `None`
    pub origin_url: Option<String>,
    /// Whether requests carrying a mock data path are redirected to it
    pub mock_requests: bool,
    /// Timeout applied to every request
    pub timeout: Duration,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            origin_url: None,
            mock_requests: false,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl RequestConfig {
    pub fn validate(&self) -> Result<()> {
        if self.timeout.is_zero() {
            return Err(Error::Config(
                "Request timeout must be greater than 0".to_string(),
            ));
        }

        if self.timeout > MAX_REQUEST_TIMEOUT {
            return Err(Error::Config(
                "Request timeout exceeds maximum of 10 minutes".to_string(),
            ));
        }

        if let Some(origin) = &self.origin_url {
            if origin.trim().is_empty() {
                return Err(Error::Config("Origin URL cannot be empty".to_string()));
            }
        }

        Ok(())
    }
}

/// Settings consumed by the remote logger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoggerConfig {
    /// Endpoint receiving log lines; remote logging is disabled when `None`
    pub url: Option<String>,
    /// Most verbose level still transmitted
    pub level: RemoteLogLevel,
}

impl LoggerConfig {
    pub fn validate(&self) -> Result<()> {
        if let Some(url) = &self.url {
            if url.trim().is_empty() {
                return Err(Error::Config("Logger URL cannot be empty".to_string()));
            }
        }
        Ok(())
    }

    pub fn is_enabled(&self) -> bool {
        self.url.is_some()
    }
}

/// Configuration for the tools façade.
///
/// Use [`ToolsConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct ToolsConfig {
    /// Transport used by the request pipeline and the remote logger
    pub http_client: Arc<dyn HttpClient>,

    /// Session storage for persisted stores (optional)
    pub session_storage: Option<Arc<dyn SessionStorage>>,

    /// Host environment introspection
    pub host: Arc<dyn HostEnvironment>,

    pub request: RequestConfig,

    pub logger: LoggerConfig,
}

impl std::fmt::Debug for ToolsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolsConfig")
            .field("http_client", &"HttpClient { ... }")
            .field(
                "session_storage",
                &self.session_storage.as_ref().map(|_| "SessionStorage { ... }"),
            )
            .field("host", &"HostEnvironment { ... }")
            .field("request", &self.request)
            .field("logger", &self.logger)
            .finish()
    }
}

impl ToolsConfig {
    /// Creates a new builder for constructing a `ToolsConfig`.
    pub fn builder() -> ToolsConfigBuilder {
        ToolsConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    pub fn validate(&self) -> Result<()> {
        self.request.validate()?;
        self.logger.validate()
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn http_client_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "HttpClient".to_string(),
        message: "HttpClient implementation is required for requests and remote logging. \
                 Desktop: ensure the 'desktop-shims' feature is enabled to use the default ReqwestHttpClient. \
                 Other hosts: inject an implementation with .http_client()."
            .to_string(),
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_http_client(timeout: Duration) -> Result<Arc<dyn HttpClient>> {
    use bridge_desktop::ReqwestHttpClient;

    // The pipeline enforces the configured timeout; the client bound only
    // keeps stray connections from hanging forever.
    let client = ReqwestHttpClient::with_timeout(timeout.saturating_mul(2))?;
    let client: Arc<dyn HttpClient> = Arc::new(client);
    Ok(client)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_http_client(_timeout: Duration) -> Result<Arc<dyn HttpClient>> {
    Err(http_client_missing_error())
}

#[cfg(feature = "desktop-shims")]
fn provide_default_session_storage() -> Option<Arc<dyn SessionStorage>> {
    use bridge_desktop::MemorySessionStorage;

    let storage: Arc<dyn SessionStorage> = Arc::new(MemorySessionStorage::new());
    Some(storage)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_session_storage() -> Option<Arc<dyn SessionStorage>> {
    None
}

#[cfg(feature = "desktop-shims")]
fn provide_default_host(origin_url: Option<&str>) -> Result<Arc<dyn HostEnvironment>> {
    use bridge_desktop::DesktopHost;

    let host = match origin_url {
        Some(url) => DesktopHost::with_document_url(url)?,
        None => DesktopHost::new(),
    };
    let host: Arc<dyn HostEnvironment> = Arc::new(host);
    Ok(host)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_host(_origin_url: Option<&str>) -> Result<Arc<dyn HostEnvironment>> {
    let host: Arc<dyn HostEnvironment> = Arc::new(DetachedHost);
    Ok(host)
}

/// Builder for constructing [`ToolsConfig`] instances.
#[derive(Default)]
pub struct ToolsConfigBuilder {
    origin_url: Option<String>,
    mock_requests: bool,
    request_timeout: Option<Duration>,
    logger_url: Option<String>,
    logger_level: Option<RemoteLogLevel>,
    http_client: Option<Arc<dyn HttpClient>>,
    session_storage: Option<Arc<dyn SessionStorage>>,
    host: Option<Arc<dyn HostEnvironment>>,
    detached: bool,
}

impl ToolsConfigBuilder {
    /// Sets the origin prefixed to relative request URLs.
    pub fn origin_url(mut self, url: impl Into<String>) -> Self {
        self.origin_url = Some(url.into());
        self
    }

    /// Enables redirection of requests that carry a mock data path.
    pub fn mock_requests(mut self, enabled: bool) -> Self {
        self.mock_requests = enabled;
        self
    }

    /// Sets the per-request timeout (default 10 seconds).
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Sets the remote logging endpoint.
    pub fn logger_url(mut self, url: impl Into<String>) -> Self {
        self.logger_url = Some(url.into());
        self
    }

    /// Sets the most verbose level sent to the remote logger.
    pub fn logger_level(mut self, level: RemoteLogLevel) -> Self {
        self.logger_level = Some(level);
        self
    }

    /// Injects the HTTP transport.
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Injects the session storage used by persisted stores.
    pub fn session_storage(mut self, storage: Arc<dyn SessionStorage>) -> Self {
        self.session_storage = Some(storage);
        self
    }

    /// Injects the host environment.
    pub fn host(mut self, host: Arc<dyn HostEnvironment>) -> Self {
        self.host = Some(host);
        self
    }

    /// Uses [`DetachedHost`] instead of any platform default.
    pub fn detached_host(mut self) -> Self {
        self.detached = true;
        self
    }

    /// Builds the final `ToolsConfig` instance.
    ///
    /// # Returns
    ///
    /// Returns `Ok(ToolsConfig)` on success, or an error if:
    /// - No `HttpClient` was injected and no platform default exists
    /// - A configuration value is invalid
    pub fn build(self) -> Result<ToolsConfig> {
        let request = RequestConfig {
            origin_url: self.origin_url,
            mock_requests: self.mock_requests,
            timeout: self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT),
        };
        let logger = LoggerConfig {
            url: self.logger_url,
            level: self.logger_level.unwrap_or_default(),
        };

        request.validate()?;
        logger.validate()?;

        let http_client = match self.http_client {
            Some(client) => client,
            None => provide_default_http_client(request.timeout)?,
        };

        let session_storage = self
            .session_storage
            .or_else(provide_default_session_storage);

        let host = match (self.host, self.detached) {
            (Some(host), _) => host,
            (None, true) => Arc::new(DetachedHost) as Arc<dyn HostEnvironment>,
            (None, false) => provide_default_host(request.origin_url.as_deref())?,
        };

        let config = ToolsConfig {
            http_client,
            session_storage,
            host,
            request,
            logger,
        };

        config.validate()?;

        Ok(config)
    }
}
