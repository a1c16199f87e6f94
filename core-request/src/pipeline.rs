//! # Interceptor Pipeline
//!
//! Every request flows through an ordered list of [`Interceptor`]s and then
//! the transport. An interceptor may rewrite the request, observe it,
//! replace it, or wrap the remainder of the chain (timeouts, recovery).
//!
//! The transport maps non-2xx responses to [`RequestError::Status`], so
//! interceptors see failures as `Err` regardless of their origin.
//!
//! [`Pipeline::standard`] registers the stock chain in its fixed order:
//!
//! ```text
//! origin-url -> mock -> log-request -> error-handling -> transport
//! ```

use crate::error::{RequestError, Result};
use crate::interceptors::{
    ErrorHandlingInterceptor, LogRequestInterceptor, MockRequestInterceptor, OriginUrlInterceptor,
};
use crate::options::RequestOptions;
use crate::translator::HttpErrorTranslator;
use async_trait::async_trait;
use bridge_traits::{HttpClient, HttpRequest, HttpResponse};
use core_logger::RemoteLogger;
use core_runtime::config::RequestConfig;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Result of a request that went through the pipeline.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// The server answered with a 2xx response
    Completed(HttpResponse),
    /// The request failed and was replaced by a default value
    Recovered(Value),
}

impl Outcome {
    pub fn is_recovered(&self) -> bool {
        matches!(self, Outcome::Recovered(_))
    }

    pub fn response(&self) -> Option<&HttpResponse> {
        match self {
            Outcome::Completed(response) => Some(response),
            Outcome::Recovered(_) => None,
        }
    }

    /// Decodes the response body, or the recovered value.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        match self {
            Outcome::Completed(response) => Ok(serde_json::from_slice(&response.body)?),
            Outcome::Recovered(value) => Ok(serde_json::from_value(value.clone())?),
        }
    }
}

/// One step of the request chain.
#[async_trait]
pub trait Interceptor: Send + Sync {
    /// Short identifier used in diagnostics.
    fn name(&self) -> &'static str;

    /// Handles `request`, usually by passing it (possibly rewritten) to
    /// `next`.
    async fn intercept(
        &self,
        request: HttpRequest,
        options: &RequestOptions,
        next: Next<'_>,
    ) -> Result<Outcome>;
}

/// The rest of the chain after the current interceptor.
pub struct Next<'a> {
    interceptors: &'a [Arc<dyn Interceptor>],
    transport: &'a dyn HttpClient,
}

impl<'a> Next<'a> {
    pub async fn run(self, request: HttpRequest, options: &RequestOptions) -> Result<Outcome> {
        match self.interceptors.split_first() {
            Some((current, rest)) => {
                let next = Next {
                    interceptors: rest,
                    transport: self.transport,
                };
                current.intercept(request, options, next).await
            }
            None => {
                let response = self.transport.execute(request).await?;
                if !response.is_success() {
                    return Err(RequestError::Status {
                        status: response.status,
                        body: String::from_utf8_lossy(&response.body).into_owned(),
                    });
                }
                Ok(Outcome::Completed(response))
            }
        }
    }
}

/// Ordered interceptor chain in front of an [`HttpClient`].
pub struct Pipeline {
    interceptors: Vec<Arc<dyn Interceptor>>,
    transport: Arc<dyn HttpClient>,
}

impl Pipeline {
    /// Pipeline without interceptors.
    pub fn new(transport: Arc<dyn HttpClient>) -> Self {
        Self {
            interceptors: Vec::new(),
            transport,
        }
    }

    /// The stock chain: origin-url, mock, log-request, error-handling.
    ///
    /// `config.origin_url` must already be resolved; `None` leaves relative
    /// URLs untouched.
    pub fn standard(
        transport: Arc<dyn HttpClient>,
        config: &RequestConfig,
        logger: RemoteLogger,
        translator: Arc<HttpErrorTranslator>,
    ) -> Self {
        Self::new(transport)
            .with_interceptor(OriginUrlInterceptor::new(
                config.origin_url.clone().unwrap_or_default(),
            ))
            .with_interceptor(MockRequestInterceptor::new(config.mock_requests))
            .with_interceptor(LogRequestInterceptor::new(logger))
            .with_interceptor(ErrorHandlingInterceptor::new(config.timeout, translator))
    }

    /// Appends an interceptor; it runs after every one registered before.
    pub fn with_interceptor(mut self, interceptor: impl Interceptor + 'static) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    pub fn interceptor_names(&self) -> Vec<&'static str> {
        self.interceptors.iter().map(|i| i.name()).collect()
    }

    /// Sends `request` through the chain.
    #[instrument(skip(self, request, options), fields(method = %request.method, url = %request.url))]
    pub async fn send(&self, request: HttpRequest, options: &RequestOptions) -> Result<Outcome> {
        let next = Next {
            interceptors: &self.interceptors,
            transport: self.transport.as_ref(),
        };
        let outcome = next.run(request, options).await;
        debug!(
            recovered = matches!(outcome, Ok(Outcome::Recovered(_))),
            failed = outcome.is_err(),
            "Request finished"
        );
        outcome
    }

    /// Sends a request tagged with `Uoh-Interceptor-*` headers.
    pub async fn send_tagged(&self, mut request: HttpRequest) -> Result<Outcome> {
        let options = RequestOptions::from_headers(&mut request)?;
        self.send(request, &options).await
    }

    pub async fn get(&self, url: &str, options: &RequestOptions) -> Result<Outcome> {
        self.send(HttpRequest::get(url), options).await
    }

    pub async fn post_json<B: Serialize>(
        &self,
        url: &str,
        body: &B,
        options: &RequestOptions,
    ) -> Result<Outcome> {
        let request = HttpRequest::post(url).json(body)?;
        self.send(request, options).await
    }
}
