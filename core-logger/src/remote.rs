//! HTTP logging client.
//!
//! A line is transmitted when its level is at most the configured
//! threshold (`Fatal` is always sent unless logging is disabled, `All` only
//! when the threshold is `All`). The fire-and-forget methods never report
//! delivery failures; [`RemoteLogger::send`] does.
//!
//! Diagnostics of this module use the `core_logger` target, which the
//! logging layer never forwards back to a sink.

use crate::error::{LoggerError, Result};
use crate::id::LoggerId;
use async_trait::async_trait;
use bridge_traits::{
    error::Result as BridgeResult, HttpClient, HttpRequest, LogEntry, LogLevel, LoggerSink,
    RemoteLog, RemoteLogLevel,
};
use core_runtime::config::LoggerConfig;
use std::sync::Arc;
use tracing::debug;

/// Client for the remote logging backend.
#[derive(Clone)]
pub struct RemoteLogger {
    client: Arc<dyn HttpClient>,
    url: Option<String>,
    level: RemoteLogLevel,
    id: Arc<LoggerId>,
}

impl std::fmt::Debug for RemoteLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteLogger")
            .field("url", &self.url)
            .field("level", &self.level)
            .field("id", &self.id.get())
            .finish()
    }
}

impl RemoteLogger {
    /// Logger for `config`; sends nothing when `config.url` is `None`.
    pub fn new(client: Arc<dyn HttpClient>, config: &LoggerConfig) -> Self {
        Self {
            client,
            url: config.url.clone(),
            level: config.level,
            id: Arc::new(LoggerId::new()),
        }
    }

    /// Shares `id` instead of a private identifier.
    pub fn with_logger_id(mut self, id: Arc<LoggerId>) -> Self {
        self.id = id;
        self
    }

    pub fn logger_id(&self) -> &Arc<LoggerId> {
        &self.id
    }

    pub fn level(&self) -> RemoteLogLevel {
        self.level
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Whether a line at `level` would be transmitted.
    pub fn is_enabled_for(&self, level: RemoteLogLevel) -> bool {
        self.url.is_some() && level.is_enabled_for(self.level)
    }

    pub fn fatal<I, S>(&self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.log(RemoteLogLevel::Fatal, values);
    }

    pub fn error<I, S>(&self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.log(RemoteLogLevel::Error, values);
    }

    pub fn warn<I, S>(&self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.log(RemoteLogLevel::Warn, values);
    }

    pub fn info<I, S>(&self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.log(RemoteLogLevel::Info, values);
    }

    pub fn debug<I, S>(&self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.log(RemoteLogLevel::Debug, values);
    }

    pub fn all<I, S>(&self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.log(RemoteLogLevel::All, values);
    }

    /// Joins `values` with single spaces and transmits them in the
    /// background.
    ///
    /// Needs a Tokio runtime; without one the line is dropped.
    pub fn log<I, S>(&self, level: RemoteLogLevel, values: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if !self.is_enabled_for(level) {
            return;
        }

        let request = match self.build_request(level, concatenate(values)) {
            Ok(Some(request)) => request,
            Ok(None) => return,
            Err(e) => {
                debug!(error = %e, "Failed to encode log line");
                return;
            }
        };

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            debug!("No runtime available, dropping log line");
            return;
        };

        let client = Arc::clone(&self.client);
        handle.spawn(async move {
            match client.execute(request).await {
                Ok(response) if !response.is_success() => {
                    debug!(status = response.status, "Logging endpoint rejected line");
                }
                Ok(_) => {}
                Err(e) => debug!(error = %e, "Log delivery failed"),
            }
        });
    }

    /// Transmits one line and waits for the backend to accept it.
    ///
    /// Lines filtered out by the threshold succeed without a request.
    pub async fn send(&self, level: RemoteLogLevel, message: impl Into<String>) -> Result<()> {
        if !self.is_enabled_for(level) {
            return Ok(());
        }

        let Some(request) = self.build_request(level, message.into())? else {
            return Ok(());
        };

        let response = self.client.execute(request).await?;
        if !response.is_success() {
            return Err(LoggerError::Status(response.status));
        }
        Ok(())
    }

    fn build_request(&self, level: RemoteLogLevel, message: String) -> Result<Option<HttpRequest>> {
        let Some(url) = self.url.as_deref() else {
            return Ok(None);
        };

        let body = serde_json::to_vec(&RemoteLog::new(level, message))?;
        let mut request = HttpRequest::post(url)
            .header("Content-Type", "application/json")
            .body(body.into());

        if let Some(id) = self.id.get() {
            request = request.header(LoggerId::HEADER_KEY, id);
        }

        Ok(Some(request))
    }
}

fn concatenate<I, S>(values: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .map(|v| v.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[async_trait]
impl LoggerSink for RemoteLogger {
    async fn log(&self, entry: LogEntry) -> BridgeResult<()> {
        let mut message = format!("{}: {}", entry.target, entry.message);
        let mut fields: Vec<_> = entry.fields.iter().collect();
        fields.sort();
        for (key, value) in fields {
            message.push_str(&format!(" {}={}", key, value));
        }

        self.send(RemoteLogLevel::from(entry.level), message)
            .await
            .map_err(|e| bridge_traits::BridgeError::OperationFailed(e.to_string()))
    }

    fn min_level(&self) -> LogLevel {
        match self.level {
            RemoteLogLevel::Fatal | RemoteLogLevel::Error => LogLevel::Error,
            RemoteLogLevel::Warn => LogLevel::Warn,
            RemoteLogLevel::Info => LogLevel::Info,
            RemoteLogLevel::Debug => LogLevel::Debug,
            RemoteLogLevel::All => LogLevel::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::{BridgeError, HttpResponse};
    use mockall::mock;
    use mockall::predicate::always;

    mock! {
        HttpClient {}

        #[async_trait]
        impl HttpClient for HttpClient {
            async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
        }
    }

    fn config(level: RemoteLogLevel) -> LoggerConfig {
        LoggerConfig {
            url: Some("https://logs.example.ac.il/api/log".to_string()),
            level,
        }
    }

    #[tokio::test]
    async fn test_send_posts_json_line() {
        let mut client = MockHttpClient::new();
        client
            .expect_execute()
            .withf(|request| {
                request.url == "https://logs.example.ac.il/api/log"
                    && request.header_value("content-type") == Some("application/json")
                    && request.body_text() == r#"{"level":"ERROR","message":"save failed 42"}"#
                    && request.header_value(LoggerId::HEADER_KEY).is_none()
            })
            .times(1)
            .returning(|_| Ok(HttpResponse::new(200, "")));

        let logger = RemoteLogger::new(Arc::new(client), &config(RemoteLogLevel::Info));
        logger
            .send(RemoteLogLevel::Error, concatenate(["save", "failed", "42"]))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_send_includes_logger_id_header() {
        let mut client = MockHttpClient::new();
        client
            .expect_execute()
            .withf(|request| request.header_value("uoh-logger-id") == Some("user-7"))
            .times(1)
            .returning(|_| Ok(HttpResponse::new(204, "")));

        let logger = RemoteLogger::new(Arc::new(client), &config(RemoteLogLevel::Info));
        logger.logger_id().set("user-7");

        logger.send(RemoteLogLevel::Info, "hello").await.unwrap();
    }

    #[tokio::test]
    async fn test_threshold_filters_verbose_levels() {
        let mut client = MockHttpClient::new();
        client.expect_execute().with(always()).times(0);

        let logger = RemoteLogger::new(Arc::new(client), &config(RemoteLogLevel::Info));

        assert!(logger.is_enabled_for(RemoteLogLevel::Fatal));
        assert!(logger.is_enabled_for(RemoteLogLevel::Info));
        assert!(!logger.is_enabled_for(RemoteLogLevel::Debug));

        logger.send(RemoteLogLevel::Debug, "noise").await.unwrap();
        logger.send(RemoteLogLevel::All, "more noise").await.unwrap();
    }

    #[tokio::test]
    async fn test_disabled_logger_sends_nothing() {
        let mut client = MockHttpClient::new();
        client.expect_execute().times(0);

        let logger = RemoteLogger::new(Arc::new(client), &LoggerConfig::default());

        assert!(!logger.is_enabled_for(RemoteLogLevel::Fatal));
        logger.send(RemoteLogLevel::Fatal, "lost").await.unwrap();
        logger.fatal(["lost", "too"]);
    }

    #[tokio::test]
    async fn test_send_reports_failures() {
        let mut client = MockHttpClient::new();
        let mut responses = vec![
            Err(BridgeError::OperationFailed("connection refused".to_string())),
            Ok(HttpResponse::new(500, "")),
        ]
        .into_iter();
        client
            .expect_execute()
            .times(2)
            .returning(move |_| responses.next().unwrap_or_else(|| Ok(HttpResponse::new(200, ""))));

        let logger = RemoteLogger::new(Arc::new(client), &config(RemoteLogLevel::All));

        assert!(matches!(
            logger.send(RemoteLogLevel::Warn, "a").await,
            Err(LoggerError::Delivery(_))
        ));
        assert!(matches!(
            logger.send(RemoteLogLevel::Warn, "b").await,
            Err(LoggerError::Status(500))
        ));
    }

    #[tokio::test]
    async fn test_log_is_fire_and_forget() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut client = MockHttpClient::new();
        client.expect_execute().times(1).returning(move |request| {
            let _ = tx.send(request.body_text());
            Ok(HttpResponse::new(200, ""))
        });

        let logger = RemoteLogger::new(Arc::new(client), &config(RemoteLogLevel::Debug));
        logger.debug(["GET", "/api/items?page=1", "null"]);

        let body = tokio::time::timeout(std::time::Duration::from_secs(1), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(body, r#"{"level":"DEBUG","message":"GET /api/items?page=1 null"}"#);
    }

    #[test]
    fn test_log_without_runtime_is_dropped() {
        let mut client = MockHttpClient::new();
        client.expect_execute().times(0);

        let logger = RemoteLogger::new(Arc::new(client), &config(RemoteLogLevel::All));
        logger.error(["no", "runtime"]);
    }

    #[test]
    fn test_sink_min_level_follows_threshold() {
        let client = MockHttpClient::new();
        let logger = RemoteLogger::new(Arc::new(client), &config(RemoteLogLevel::Warn));

        assert_eq!(LoggerSink::min_level(&logger), LogLevel::Warn);
    }
}
