//! Cancellation, deadlines and transport timeouts.

use std::time::{Duration, Instant};

use api::{ClientConfig, DaemonControl, RequestContext};
use daemon_client::{HttpClient, TransportOptions};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn slow_status_server(delay: Duration) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/status"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"version": "1.0.0"}))
                .set_delay(delay),
        )
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn cancelled_context_fails_before_dispatch() {
    let server = slow_status_server(Duration::ZERO).await;
    let client = HttpClient::new(&server.uri()).unwrap();

    let ctx = RequestContext::background();
    ctx.cancel();
    let err = client.status(&ctx).await.unwrap_err();

    assert!(err.is_cancelled(), "{err:?}");
    assert!(err.to_string().contains("cancel"));
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn cancellation_aborts_an_in_flight_request() {
    let server = slow_status_server(Duration::from_secs(10)).await;
    let client = HttpClient::new(&server.uri()).unwrap();

    let ctx = RequestContext::background();
    let canceller = {
        let ctx = ctx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            ctx.cancel();
        })
    };

    let started = Instant::now();
    let err = client.status(&ctx).await.unwrap_err();
    canceller.await.unwrap();

    assert!(err.is_cancelled(), "{err:?}");
    assert!(err.to_string().contains("cancel"));
    assert!(err.to_string().contains("GET /api/v1/status"));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn child_context_is_cancelled_with_its_parent() {
    let server = slow_status_server(Duration::from_secs(10)).await;
    let client = HttpClient::new(&server.uri()).unwrap();

    let parent = RequestContext::background();
    let child = parent.child();
    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        parent.cancel();
    });

    let err = client.status(&child).await.unwrap_err();
    canceller.await.unwrap();
    assert!(err.is_cancelled(), "{err:?}");
}

#[tokio::test]
async fn deadline_expiry_is_a_timeout() {
    let server = slow_status_server(Duration::from_secs(10)).await;
    let client = HttpClient::new(&server.uri()).unwrap();

    let ctx = RequestContext::with_timeout(Duration::from_millis(150));
    let err = client.status(&ctx).await.unwrap_err();

    assert!(err.is_timeout(), "{err:?}");
    assert!(!err.is_cancelled());
    assert!(err.to_string().contains("timeout"));
}

#[tokio::test]
async fn configured_request_timeout_applies_without_a_deadline() {
    let server = slow_status_server(Duration::from_secs(10)).await;
    let transport = TransportOptions {
        timeout: Duration::from_millis(200),
        ..TransportOptions::default()
    };
    let client =
        HttpClient::with_transport(&server.uri(), ClientConfig::default(), &transport).unwrap();

    let err = client
        .status(&RequestContext::background())
        .await
        .unwrap_err();
    assert!(err.is_timeout(), "{err:?}");
}

#[tokio::test]
async fn unreachable_daemon_is_a_transport_error() {
    // Bind and drop a listener to get a port nothing is listening on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let client = HttpClient::new(&format!("http://127.0.0.1:{port}")).unwrap();
    let err = client.ping(&RequestContext::background()).await.unwrap_err();

    assert!(
        matches!(err, api::ClientError::Transport { connect: true, .. }),
        "{err:?}"
    );
    assert!(err.retry_policy().is_retryable());
}
