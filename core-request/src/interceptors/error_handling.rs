use crate::error::{RequestError, Result};
use crate::options::RequestOptions;
use crate::pipeline::{Interceptor, Next, Outcome};
use crate::translator::HttpErrorTranslator;
use async_trait::async_trait;
use bridge_traits::HttpRequest;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Bounds the rest of the chain by a timeout and, for requests that opted
/// in, turns failures into the request's default response.
///
/// Recovered failures are published through the [`HttpErrorTranslator`];
/// other failures are returned unchanged.
pub struct ErrorHandlingInterceptor {
    timeout: Duration,
    translator: Arc<HttpErrorTranslator>,
}

impl ErrorHandlingInterceptor {
    pub fn new(timeout: Duration, translator: Arc<HttpErrorTranslator>) -> Self {
        Self {
            timeout,
            translator,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl Interceptor for ErrorHandlingInterceptor {
    fn name(&self) -> &'static str {
        "error-handling"
    }

    async fn intercept(
        &self,
        request: HttpRequest,
        options: &RequestOptions,
        next: Next<'_>,
    ) -> Result<Outcome> {
        let result = match tokio::time::timeout(self.timeout, next.run(request, options)).await {
            Ok(result) => result,
            Err(_) => Err(RequestError::Timeout(self.timeout)),
        };

        let error = match result {
            Ok(outcome) => return Ok(outcome),
            Err(error) => error,
        };

        if !options.handle_errors {
            return Err(error);
        }

        warn!(error = %error, label = ?options.error_label, "Recovering failed request");
        let fallback = options
            .default_response
            .clone()
            .unwrap_or_else(|| json!({}));
        let value: Value =
            self.translator
                .handle(&error, fallback, options.error_label.as_deref(), None);
        Ok(Outcome::Recovered(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interceptors::testing::RecordingClient;
    use crate::pipeline::Pipeline;
    use async_trait::async_trait;
    use bridge_traits::error::Result as BridgeResult;
    use bridge_traits::{HttpClient, HttpResponse};
    use core_logger::RemoteLogger;
    use core_runtime::config::LoggerConfig;
    use core_state::ErrorState;

    /// Transport that never answers.
    struct Hanging;

    #[async_trait]
    impl HttpClient for Hanging {
        async fn execute(&self, _request: HttpRequest) -> BridgeResult<HttpResponse> {
            futures::future::pending().await
        }
    }

    fn translator(transport: Arc<dyn HttpClient>) -> Arc<HttpErrorTranslator> {
        let logger = RemoteLogger::new(transport, &LoggerConfig::default());
        Arc::new(HttpErrorTranslator::new(Arc::new(ErrorState::new()), logger))
    }

    fn pipeline(transport: Arc<dyn HttpClient>, timeout: Duration) -> (Pipeline, Arc<HttpErrorTranslator>) {
        let translator = translator(transport.clone());
        let pipeline = Pipeline::new(transport)
            .with_interceptor(ErrorHandlingInterceptor::new(timeout, translator.clone()));
        (pipeline, translator)
    }

    #[tokio::test]
    async fn test_success_passes_through() {
        let transport = Arc::new(RecordingClient::answering(200, r#"{"ok":true}"#));
        let (pipeline, translator) = pipeline(transport, Duration::from_secs(10));

        let outcome = pipeline
            .get("/x", &RequestOptions::new().handle_errors(None))
            .await
            .unwrap();

        assert!(!outcome.is_recovered());
        assert!(!translator.has_errors());
    }

    #[tokio::test]
    async fn test_handled_failure_recovers_with_default_response() {
        let transport = Arc::new(RecordingClient::answering(
            422,
            r#"{"validation":true,"field":"id"}"#,
        ));
        let (pipeline, translator) = pipeline(transport, Duration::from_secs(10));

        let options = RequestOptions::new()
            .handle_errors(Some("form"))
            .default_response(json!({ "items": [] }));
        let outcome = pipeline.get("/x", &options).await.unwrap();

        assert!(outcome.is_recovered());
        assert_eq!(outcome.json::<Value>().unwrap(), json!({ "items": [] }));
        let current = translator.error_state().current();
        assert_eq!(current.message, "INPUT_ERROR");
        assert_eq!(current.label.as_deref(), Some("form"));
    }

    #[tokio::test]
    async fn test_handled_failure_without_default_yields_empty_object() {
        let transport = Arc::new(RecordingClient::answering(500, ""));
        let (pipeline, translator) = pipeline(transport, Duration::from_secs(10));

        let outcome = pipeline
            .get("/x", &RequestOptions::new().handle_errors(None))
            .await
            .unwrap();

        assert_eq!(outcome.json::<Value>().unwrap(), json!({}));
        assert_eq!(translator.error_state().current().message, "GENERAL_ERROR");
    }

    #[tokio::test]
    async fn test_unhandled_failure_is_returned() {
        let transport = Arc::new(RecordingClient::answering(500, r#"{"bapi":true,"message":"M1"}"#));
        let (pipeline, translator) = pipeline(transport, Duration::from_secs(10));

        let error = pipeline.get("/x", &RequestOptions::default()).await.unwrap_err();

        assert_eq!(error.status(), Some(500));
        assert!(!translator.has_errors());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_fails_request() {
        let (pipeline, _) = pipeline(Arc::new(Hanging), Duration::from_secs(10));

        let error = pipeline.get("/x", &RequestOptions::default()).await.unwrap_err();
        assert!(matches!(error, RequestError::Timeout(d) if d == Duration::from_secs(10)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_handled_timeout_is_recovered() {
        let (pipeline, translator) = pipeline(Arc::new(Hanging), Duration::from_secs(3));

        let outcome = pipeline
            .get("/x", &RequestOptions::new().handle_errors(Some("slow")))
            .await
            .unwrap();

        assert!(outcome.is_recovered());
        assert_eq!(translator.error_state().current().message, "GENERAL_ERROR");
    }
}
