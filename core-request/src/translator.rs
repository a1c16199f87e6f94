//! # HTTP Error Translator
//!
//! Turns a failed request into a user-facing message. The error body is
//! inspected for the backend's error shapes:
//!
//! | Body                               | Class            |
//! |------------------------------------|------------------|
//! | `{"validation": true, ...}`        | `INPUT_ERROR`    |
//! | `{"bapi": <truthy>, "message": m}` | `m`              |
//! | any other JSON                     | `GENERAL_ERROR`  |
//! | missing, empty or not JSON         | `GENERAL_ERROR`  |
//!
//! Handling publishes the message to the [`ErrorState`], writes a local
//! `tracing` error and a remote `ERROR` line, and hands back the caller's
//! default value.

use crate::error::RequestError;
use core_logger::RemoteLogger;
use core_state::ErrorState;
use futures::Stream;
use serde_json::{json, Value};
use std::fmt;
use std::sync::Arc;
use tracing::error;

/// Classification of a failed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorClass {
    General,
    Input,
    Output,
    /// Message supplied by the backend
    Server(String),
}

impl ErrorClass {
    pub fn message(&self) -> &str {
        match self {
            ErrorClass::General => "GENERAL_ERROR",
            ErrorClass::Input => "INPUT_ERROR",
            ErrorClass::Output => "OUTPUT_ERROR",
            ErrorClass::Server(message) => message,
        }
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// JavaScript-style truthiness of a JSON value.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn raw_detail(error: &RequestError) -> Value {
    json!({
        "status": error.status(),
        "message": error.to_string(),
        "body": error.body().filter(|b| !b.is_empty()),
    })
}

/// Maps failed requests to messages in the shared [`ErrorState`].
pub struct HttpErrorTranslator {
    errors: Arc<ErrorState>,
    logger: RemoteLogger,
}

impl HttpErrorTranslator {
    pub fn new(errors: Arc<ErrorState>, logger: RemoteLogger) -> Self {
        Self { errors, logger }
    }

    pub fn error_state(&self) -> &Arc<ErrorState> {
        &self.errors
    }

    /// Classifies `error` and returns the detail worth logging with it.
    ///
    /// Never fails: a body that cannot be interpreted yields
    /// [`ErrorClass::General`] with the raw error as detail.
    pub fn parse_message(error: &RequestError) -> (ErrorClass, Value) {
        let body = error
            .body()
            .and_then(|raw| serde_json::from_str::<Value>(raw).ok())
            .filter(is_truthy);

        let Some(body) = body else {
            return (ErrorClass::General, raw_detail(error));
        };

        if body.get("validation") == Some(&Value::Bool(true)) {
            return (ErrorClass::Input, body);
        }

        if body.get("bapi").is_some_and(is_truthy) {
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty())
                .map(str::to_string);
            return match message {
                Some(message) => (ErrorClass::Server(message), body),
                None => (ErrorClass::General, body),
            };
        }

        (ErrorClass::General, body)
    }

    /// Records `error` and returns `output` in its place.
    ///
    /// `message` overrides the derived message shown to the user; the
    /// derived one is still logged.
    pub fn handle<T>(
        &self,
        error: &RequestError,
        output: T,
        label: Option<&str>,
        message: Option<&str>,
    ) -> T {
        let (class, detail) = Self::parse_message(error);
        let shown = message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| class.message());

        self.errors.handle(label, shown);

        let label_text = label.unwrap_or("null");
        let params = detail.to_string();
        error!(label = label_text, error_message = %class, params = %params, "HTTP error handled");
        self.logger.error([
            "[HttpErrorTranslator.handle] label:",
            label_text,
            "message:",
            class.message(),
            "params:",
            &params,
        ]);

        output
    }

    pub fn select(&self, label: Option<&str>) -> impl Stream<Item = String> + Send + 'static {
        self.errors.select(label)
    }

    pub fn clear(&self, label: Option<&str>) {
        self.errors.clear(label);
    }

    pub fn has_errors(&self) -> bool {
        self.errors.has_errors()
    }
}
