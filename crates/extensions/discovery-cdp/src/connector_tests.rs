use std::net::TcpListener;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;

fn config() -> CdpConfig {
    CdpConfig {
        connect_timeout_ms: 1000,
        ..Default::default()
    }
}

fn connector_for(uri: &str) -> CdpConnector {
    let url = url::Url::parse(uri).unwrap();
    CdpConnector::new(
        url.host_str().unwrap(),
        url.port().unwrap(),
        &config(),
        BreakerPolicy::default(),
    )
    .with_retry(RetryPolicy::none())
}

/// A loopback port with nothing listening on it.
fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

#[tokio::test]
async fn test_probe_version() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json/version"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "Browser": "Chrome/120.0.0.0",
            "Protocol-Version": "1.3",
            "webSocketDebuggerUrl": "ws://127.0.0.1:9222/devtools/browser/abc"
        })))
        .mount(&server)
        .await;

    let version = connector_for(&server.uri()).probe_version().await.unwrap();
    assert_eq!(version.browser, "Chrome/120.0.0.0");
}

#[tokio::test]
async fn test_probe_without_debugger_url_is_not_enabled() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json/version"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"Browser": "x"})))
        .mount(&server)
        .await;

    let err = connector_for(&server.uri()).probe_version().await.unwrap_err();
    assert!(err.is_not_enabled(), "got {err:?}");
}

#[tokio::test]
async fn test_probe_404_is_not_enabled() {
    let server = MockServer::start().await;
    let err = connector_for(&server.uri()).probe_version().await.unwrap_err();
    assert!(err.is_not_enabled(), "got {err:?}");
}

#[tokio::test]
async fn test_refused_is_not_enabled() {
    let connector = CdpConnector::new("127.0.0.1", closed_port(), &config(), BreakerPolicy::default())
        .with_retry(RetryPolicy::none());
    let err = connector.connect().await.unwrap_err();
    assert!(err.is_not_enabled(), "got {err:?}");
}

#[tokio::test]
async fn test_slow_endpoint_is_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json/version"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let url = url::Url::parse(&server.uri()).unwrap();
    let config = CdpConfig {
        connect_timeout_ms: 100,
        ..Default::default()
    };
    let connector = CdpConnector::new("127.0.0.1", url.port().unwrap(), &config, BreakerPolicy::default())
        .with_retry(RetryPolicy::none());
    let err = connector.connect().await.unwrap_err();
    assert!(matches!(err, ConnectionError::Timeout(_)), "got {err:?}");
}

#[tokio::test]
async fn test_breaker_opens_after_threshold() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json/version"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let connector = connector_for(&server.uri());
    for _ in 0..3 {
        assert!(connector.connect().await.unwrap_err().is_not_enabled());
    }
    assert!(matches!(connector.breaker_state(), CircuitState::Open { .. }));

    match connector.connect().await {
        Err(ConnectionError::CircuitOpen { endpoint, retry_in_ms }) => {
            assert_eq!(endpoint, connector.endpoint());
            assert!(retry_in_ms > 0);
        }
        Err(other) => panic!("expected CircuitOpen, got {other:?}"),
        Ok(_) => panic!("expected CircuitOpen, got a connection"),
    }
    // `expect(3)` verifies the fourth call did no I/O.
}

#[tokio::test]
async fn test_retries_inside_one_breaker_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json/version"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let connector = connector_for(&server.uri())
        .with_retry(RetryPolicy::new(2, Duration::from_millis(1)));
    assert!(connector.connect().await.is_err());
    assert_eq!(connector.breaker_state(), CircuitState::Closed);
}

#[test]
fn test_mentions_refused() {
    assert!(mentions_refused("IO error: Connection refused (os error 111)"));
    assert!(mentions_refused(
        "No connection could be made because the target machine actively refused it."
    ));
    assert!(!mentions_refused("connection reset by peer"));
}

#[test]
fn test_classify_cdp() {
    assert!(matches!(
        classify_cdp("h:1", CdpError::Timeout("x".into())),
        ConnectionError::Timeout(_)
    ));
    assert!(classify_cdp("h:1", CdpError::WebSocket("Connection refused".into())).is_not_enabled());
    assert!(matches!(
        classify_cdp("h:1", CdpError::WebSocket("handshake failed".into())),
        ConnectionError::ConnectionFailed(_)
    ));
}
