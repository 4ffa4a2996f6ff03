//! Bounded retry of idempotent requests.

use std::time::Duration;

use api::{ClientConfig, RequestContext};
use daemon_client::{HttpClient, Method, TransportOptions};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer, retries: u32) -> HttpClient {
    let transport = TransportOptions {
        request_retries: retries,
        retry_backoff: Duration::from_millis(10),
        ..TransportOptions::default()
    };
    HttpClient::with_transport(&server.uri(), ClientConfig::default(), &transport).unwrap()
}

async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.unwrap_or_default().len()
}

#[tokio::test]
async fn nothing_is_retried_by_default() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/status"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let err = client
        .get::<serde_json::Value>(&RequestContext::background(), "/api/v1/status")
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(503));
    assert_eq!(request_count(&server).await, 1);
}

#[tokio::test]
async fn idempotent_request_recovers_from_transient_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/status"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "running"})))
        .with_priority(2)
        .mount(&server)
        .await;

    let value: serde_json::Value = client(&server, 3)
        .get(&RequestContext::background(), "/api/v1/status")
        .await
        .unwrap();

    assert_eq!(value["status"], "running");
    assert_eq!(request_count(&server).await, 3);
}

#[tokio::test]
async fn retries_stop_when_the_budget_is_spent() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/instances/box"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let err = client(&server, 2)
        .send::<()>(
            &RequestContext::background(),
            Method::DELETE,
            "/api/v1/instances/box",
            None,
        )
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(502));
    assert!(err.to_string().contains("bad gateway"));
    assert_eq!(request_count(&server).await, 3);
}

#[tokio::test]
async fn non_idempotent_request_is_never_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/instances"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client(&server, 5)
        .send(
            &RequestContext::background(),
            Method::POST,
            "/api/v1/instances",
            Some(&json!({"template": "t", "name": "n"})),
        )
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(503));
    assert_eq!(request_count(&server).await, 1);
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/instances/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client(&server, 3)
        .get::<serde_json::Value>(&RequestContext::background(), "/api/v1/instances/missing")
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(404));
    assert_eq!(request_count(&server).await, 1);
}

#[tokio::test]
async fn cancellation_interrupts_backoff() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/status"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "30"))
        .mount(&server)
        .await;

    let client = client(&server, 3);
    let ctx = RequestContext::with_timeout(Duration::from_millis(200));
    let err = client
        .get::<serde_json::Value>(&ctx, "/api/v1/status")
        .await
        .unwrap_err();

    assert!(err.is_timeout(), "{err:?}");
    assert_eq!(request_count(&server).await, 1);
}
