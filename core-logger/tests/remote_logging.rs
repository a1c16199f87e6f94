use bridge_desktop::ReqwestHttpClient;
use bridge_traits::RemoteLogLevel;
use core_logger::{LoggerId, RemoteLogger};
use core_runtime::config::LoggerConfig;
use std::sync::Arc;
use wiremock::matchers::{body_json_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn logger_for(server: &MockServer, level: RemoteLogLevel) -> RemoteLogger {
    let config = LoggerConfig {
        url: Some(format!("{}/api/log", server.uri())),
        level,
    };
    RemoteLogger::new(Arc::new(ReqwestHttpClient::new()), &config)
}

#[tokio::test]
async fn delivers_line_with_logger_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/log"))
        .and(header("content-type", "application/json"))
        .and(header(LoggerId::HEADER_KEY, "user-1"))
        .and(body_json_string(r#"{"level":"WARN","message":"disk almost full"}"#))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let id = Arc::new(LoggerId::new());
    id.set("user-1");
    let logger = logger_for(&server, RemoteLogLevel::Info)
        .await
        .with_logger_id(id);

    logger
        .send(RemoteLogLevel::Warn, "disk almost full")
        .await
        .unwrap();
}

#[tokio::test]
async fn filtered_lines_never_reach_the_backend() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let logger = logger_for(&server, RemoteLogLevel::Error).await;

    logger.send(RemoteLogLevel::Info, "ignored").await.unwrap();
    logger.send(RemoteLogLevel::Debug, "ignored").await.unwrap();
}

#[tokio::test]
async fn backend_rejection_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let logger = logger_for(&server, RemoteLogLevel::All).await;
    let result = logger.send(RemoteLogLevel::Fatal, "down").await;

    assert!(matches!(result, Err(core_logger::LoggerError::Status(503))));
}
