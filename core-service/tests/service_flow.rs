#![cfg(feature = "desktop-shims")]

use core_service::{RemoteLogLevel, RequestOptions, ToolsConfig, ToolsService};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Wizard {
    step: u32,
    name: String,
}

async fn tools_for(server: &MockServer) -> ToolsService {
    let config = ToolsConfig::builder()
        .origin_url(server.uri())
        .logger_url(format!("{}/api/log", server.uri()))
        .logger_level(RemoteLogLevel::Info)
        .build()
        .unwrap();
    ToolsService::new(config).unwrap()
}

#[tokio::test]
async fn handled_failure_reaches_error_state_and_logging_backend() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/payments"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "bapi": true, "message": "SAP down" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/log"))
        .and(header("uoh-logger-id", "student-7"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let tools = tools_for(&server).await;
    tools.logger_id().set("student-7");
    let mut payment_errors = Box::pin(tools.error_translator().select(Some("payments")));

    let options = RequestOptions::new()
        .handle_errors(Some("payments"))
        .default_response(json!([]));
    let outcome = tools.pipeline().get("/api/payments", &options).await.unwrap();

    assert_eq!(outcome.json::<Vec<Value>>().unwrap(), Vec::<Value>::new());
    assert_eq!(payment_errors.next().await.as_deref(), Some("SAP down"));
    assert!(tools.error_state().has_errors());

    // Remote delivery is fire-and-forget.
    for _ in 0..50 {
        let delivered = server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .any(|r| r.url.path() == "/api/log");
        if delivered {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

#[tokio::test]
async fn persisted_store_survives_service_restart() {
    let server = MockServer::start().await;
    let tools = tools_for(&server).await;

    let store = tools
        .persisted_store(
            Wizard {
                step: 1,
                name: String::new(),
            },
            "wizard",
        )
        .unwrap();
    store.set_state(&json!({ "step": 3 })).unwrap();

    // A second store over the same session storage restores the snapshot.
    let restored = tools
        .persisted_store(
            Wizard {
                step: 1,
                name: String::new(),
            },
            "wizard",
        )
        .unwrap();
    assert_eq!(restored.get_state().step, 3);

    restored.reset().unwrap();
    assert_eq!(restored.get_state().step, 3);
}

#[tokio::test(start_paused = true)]
async fn timer_counts_down_to_zero() {
    let config = ToolsConfig::builder().detached_host().build().unwrap();
    let tools = ToolsService::new(config).unwrap();

    let timer = tools.timer(2);
    let mut ticks = Box::pin(timer.time());
    timer.start().unwrap();

    let values: Vec<i64> = ticks.by_ref().take(3).collect().await;
    assert_eq!(values, vec![2, 1, 0]);
}
