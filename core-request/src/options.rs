//! Per-request behaviour switches.
//!
//! [`RequestOptions`] is handed to the pipeline next to each request. Code
//! that still tags requests with the `Uoh-Interceptor-*` headers can convert
//! them with [`RequestOptions::from_headers`], which also strips them so
//! they never reach the server.

use crate::error::{RequestError, Result};
use bridge_traits::HttpRequest;
use serde_json::Value;

pub const ERROR_LABEL_HEADER: &str = "Uoh-Interceptor-Error-Handling-Label";
pub const SHOULD_HANDLE_HEADER: &str = "Uoh-Interceptor-Error-Handler-Should-Handle";
pub const DEFAULT_RESPONSE_HEADER: &str = "Uoh-Interceptor-Error-Handler-Default-Response";
pub const SHOULD_LOG_REQUEST_HEADER: &str = "Uoh-Interceptor-Log-Requests-Should-Log-Request";
/// Misspelled variant still sent by older clients.
pub const LEGACY_SHOULD_LOG_REQUEST_HEADER: &str =
    "Uoh-Interceptor-Log-Requests-Should-Log-Reqeust";
pub const MOCK_DATA_PATH_HEADER: &str = "Uoh-Interceptor-Mock-Request-Dummy-Data-Path";
pub const SHOULD_USE_ORIGIN_URL_HEADER: &str =
    "Uoh-Interceptor-Origin-Url-Should-Use-Origin-Url";

#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    /// Prefix relative URLs with the configured origin
    pub use_origin_url: bool,
    /// Path the request is redirected to when mocking is enabled
    pub mock_data_path: Option<String>,
    /// Send the request line and body to the remote logger
    pub log_request: bool,
    /// Recover failures into `default_response` instead of returning them
    pub handle_errors: bool,
    /// Label the recorded error is published under
    pub error_label: Option<String>,
    /// Value returned for a handled failure; `{}` when unset
    pub default_response: Option<Value>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            use_origin_url: true,
            mock_data_path: None,
            log_request: false,
            handle_errors: false,
            error_label: None,
            default_response: None,
        }
    }
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn without_origin_url(mut self) -> Self {
        self.use_origin_url = false;
        self
    }

    pub fn mock_data(mut self, path: impl Into<String>) -> Self {
        self.mock_data_path = Some(path.into());
        self
    }

    pub fn log_request(mut self) -> Self {
        self.log_request = true;
        self
    }

    /// Recovers failures, publishing them under `label`.
    pub fn handle_errors(mut self, label: Option<&str>) -> Self {
        self.handle_errors = true;
        self.error_label = label.map(str::to_string);
        self
    }

    pub fn default_response(mut self, value: Value) -> Self {
        self.default_response = Some(value);
        self
    }

    /// Reads and removes the `Uoh-Interceptor-*` headers of `request`.
    ///
    /// Fails when the default-response header is not valid JSON.
    pub fn from_headers(request: &mut HttpRequest) -> Result<Self> {
        let mut options = Self::default();

        if let Some(label) = request.remove_header(ERROR_LABEL_HEADER) {
            options.error_label = Some(label);
        }

        if let Some(flag) = request.remove_header(SHOULD_HANDLE_HEADER) {
            options.handle_errors = flag == "true";
        }

        if let Some(raw) = request.remove_header(DEFAULT_RESPONSE_HEADER) {
            if !raw.is_empty() {
                let value = serde_json::from_str(&raw).map_err(|e| {
                    RequestError::InvalidOptions(format!(
                        "{} is not valid JSON: {}",
                        DEFAULT_RESPONSE_HEADER, e
                    ))
                })?;
                options.default_response = Some(value);
            }
        }

        let log_flags = [
            request.remove_header(SHOULD_LOG_REQUEST_HEADER),
            request.remove_header(LEGACY_SHOULD_LOG_REQUEST_HEADER),
        ];
        options.log_request = log_flags.iter().flatten().any(|flag| !flag.is_empty());

        if let Some(path) = request.remove_header(MOCK_DATA_PATH_HEADER) {
            if !path.is_empty() {
                options.mock_data_path = Some(path);
            }
        }

        if let Some(flag) = request.remove_header(SHOULD_USE_ORIGIN_URL_HEADER) {
            options.use_origin_url = flag != "false";
        }

        Ok(options)
    }
}
