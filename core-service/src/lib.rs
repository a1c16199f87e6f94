//! Core service façade and bootstrap helpers.
//!
//! [`ToolsService`] wires the host-provided bridges of a [`ToolsConfig`]
//! into the shared tools: the request pipeline with its stock interceptors,
//! the HTTP error translator and its error state, the remote logger, the
//! platform helpers and factories for stores and timers. Desktop apps
//! typically enable the `desktop-shims` feature (which depends on
//! `bridge-desktop`) so that missing bridges get native defaults.
//!
//! ```no_run
//! # async fn example() -> core_service::Result<()> {
//! use core_service::{RequestOptions, ToolsConfig, ToolsService};
//!
//! let config = ToolsConfig::builder()
//!     .origin_url("https://portal.haifa.ac.il")
//!     .logger_url("https://portal.haifa.ac.il/api/log")
//!     .build()?;
//! let tools = ToolsService::new(config)?;
//!
//! let options = RequestOptions::new().handle_errors(Some("courses"));
//! let outcome = tools.pipeline().get("/api/courses", &options).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;

pub use error::{CoreError, Result};

pub use bridge_traits::{HostEnvironment, HttpClient, RemoteLogLevel, SessionStorage};
pub use core_logger::{LoggerId, RemoteLogger};
pub use core_platform::{
    get_origin, is_valid_id, validate_id, DeactivateGuard, Deactivatable, Deactivation,
    Environment, EnvironmentUrls, PlatformInfo,
};
pub use core_request::{
    ErrorClass, HttpErrorTranslator, Interceptor, Outcome, Pipeline, RequestError, RequestOptions,
};
pub use core_runtime::logging::{init_logging, LogFormat, LoggerSinkLayer, LoggingConfig};
pub use core_runtime::{LoggerConfig, RequestConfig, ToolsConfig, ToolsConfigBuilder};
pub use core_state::{CountdownTimer, ErrorRecord, ErrorState, Store};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Primary façade exposed to host applications.
///
/// Cheap to clone; clones share every component.
#[derive(Clone)]
pub struct ToolsService {
    inner: Arc<ServiceInner>,
}

struct ServiceInner {
    config: ToolsConfig,
    origin_url: Option<String>,
    environment: Environment,
    logger: RemoteLogger,
    errors: Arc<ErrorState>,
    translator: Arc<HttpErrorTranslator>,
    pipeline: Pipeline,
    platform: PlatformInfo,
    guard: DeactivateGuard,
}

impl ToolsService {
    /// Wires all components from `config`.
    ///
    /// Without an explicit origin URL, the origin of the host document is
    /// used; a host without a document leaves relative URLs untouched.
    pub fn new(config: ToolsConfig) -> Result<Self> {
        config.validate()?;

        let origin_url = config.request.origin_url.clone().or_else(|| {
            config
                .host
                .document()
                .map(|document| get_origin(&document.url).to_string())
                .filter(|origin| !origin.is_empty())
        });
        let environment = Environment::from_host(config.host.as_ref());

        let logger = RemoteLogger::new(Arc::clone(&config.http_client), &config.logger);
        let errors = Arc::new(ErrorState::new());
        let translator = Arc::new(HttpErrorTranslator::new(
            Arc::clone(&errors),
            logger.clone(),
        ));

        let request = RequestConfig {
            origin_url: origin_url.clone(),
            ..config.request.clone()
        };
        let pipeline = Pipeline::standard(
            Arc::clone(&config.http_client),
            &request,
            logger.clone(),
            Arc::clone(&translator),
        );
        let platform = PlatformInfo::new(Arc::clone(&config.host));

        info!(
            environment = %environment,
            origin = origin_url.as_deref().unwrap_or(""),
            remote_logging = config.logger.is_enabled(),
            mock_requests = request.mock_requests,
            "Tools service initialised"
        );

        Ok(Self {
            inner: Arc::new(ServiceInner {
                config,
                origin_url,
                environment,
                logger,
                errors,
                translator,
                pipeline,
                platform,
                guard: DeactivateGuard::new(),
            }),
        })
    }

    pub fn config(&self) -> &ToolsConfig {
        &self.inner.config
    }

    /// Origin prefixed to relative request URLs.
    pub fn origin_url(&self) -> Option<&str> {
        self.inner.origin_url.as_deref()
    }

    pub fn environment(&self) -> Environment {
        self.inner.environment
    }

    /// The URL of `urls` matching the running environment.
    pub fn environment_url<'a>(&self, urls: &'a EnvironmentUrls) -> &'a str {
        urls.resolve(self.inner.environment)
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.inner.pipeline
    }

    pub fn logger(&self) -> &RemoteLogger {
        &self.inner.logger
    }

    pub fn logger_id(&self) -> &Arc<LoggerId> {
        self.inner.logger.logger_id()
    }

    pub fn error_state(&self) -> &Arc<ErrorState> {
        &self.inner.errors
    }

    pub fn error_translator(&self) -> &Arc<HttpErrorTranslator> {
        &self.inner.translator
    }

    pub fn platform(&self) -> &PlatformInfo {
        &self.inner.platform
    }

    pub fn deactivate_guard(&self) -> &DeactivateGuard {
        &self.inner.guard
    }

    /// Sends the platform description to the remote logger at `INFO`.
    pub fn log_platform_info(&self) {
        self.inner
            .logger
            .info(["[ToolsService.log_platform_info]", self.inner.platform.info().as_str()]);
    }

    /// In-memory store starting at `initial`.
    pub fn store<T>(&self, initial: T) -> Store<T>
    where
        T: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
    {
        Store::new(initial)
    }

    /// Store persisted in the session storage under `key`.
    pub fn persisted_store<T>(&self, initial: T, key: &str) -> Result<Store<T>>
    where
        T: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
    {
        let storage = self.inner.config.session_storage.clone().ok_or_else(|| {
            CoreError::CapabilityMissing {
                capability: "SessionStorage".to_string(),
                message: "Persisted stores need a session storage. \
                          Inject one with .session_storage() or enable 'desktop-shims'."
                    .to_string(),
            }
        })?;
        debug!(key, "Creating persisted store");
        Ok(Store::persisted(initial, key, storage))
    }

    /// Countdown from `max_time` ticking once per second.
    pub fn timer(&self, max_time: i64) -> CountdownTimer {
        CountdownTimer::new(max_time)
    }
}
