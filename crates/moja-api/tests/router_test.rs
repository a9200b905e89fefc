#![allow(clippy::unwrap_used)]
// Integration tests for `ConnectivityRouter` and `ReachabilityProbe` using wiremock.

use std::time::{Duration, Instant};

use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use moja_api::{
    ConnectivityRouter, DEFAULT_PROBE_TIMEOUT, Error, ReachabilityProbe, RequestClient, Route,
    RouteConfig, StaticToken,
};

// ── Helpers ─────────────────────────────────────────────────────────

/// An origin nothing listens on: connection refused immediately.
const DEAD_ORIGIN: &str = "http://127.0.0.1:1";

fn identity() -> StaticToken {
    StaticToken::new(SecretString::from("test-token".to_owned()))
}

fn router(local_template: String, fallback_template: String) -> ConnectivityRouter {
    ConnectivityRouter::new(
        RequestClient::with_client(reqwest::Client::new()),
        ReachabilityProbe::with_client(reqwest::Client::new(), DEFAULT_PROBE_TIMEOUT),
        RouteConfig::new(local_template, fallback_template),
    )
}

async fn servers() -> (MockServer, MockServer) {
    (MockServer::start().await, MockServer::start().await)
}

fn local_template(server: &MockServer) -> String {
    format!("{}/{{name}}", server.uri())
}

fn fallback_template(server: &MockServer) -> String {
    format!("{}/get/{{name}}", server.uri())
}

// ── Route selection ─────────────────────────────────────────────────

#[tokio::test]
async fn test_reachable_device_uses_local_origin() {
    let (local, cloud) = servers().await;

    Mock::given(method("GET"))
        .and(path("/kitchen/status"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "recording": false })))
        .expect(1)
        .mount(&local)
        .await;
    Mock::given(method("GET"))
        .and(path("/kitchen/status"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&local)
        .await;

    let router = router(local_template(&local), fallback_template(&cloud));
    let routed = router.route(&identity(), "kitchen", "/status").await.unwrap();

    assert_eq!(routed.base.route(), Route::Local);
    assert_eq!(routed.base.as_str(), format!("{}/kitchen", local.uri()));
    assert_eq!(
        routed.response.json::<serde_json::Value>().unwrap(),
        json!({ "recording": false })
    );
    assert!(cloud.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_error_status_still_counts_as_reachable() {
    let (local, cloud) = servers().await;

    Mock::given(method("GET"))
        .and(path("/kitchen/status"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&local)
        .await;

    let router = router(local_template(&local), fallback_template(&cloud));
    let base = router.resolve("kitchen").await;

    assert!(base.is_local());
}

#[tokio::test]
async fn test_unreachable_device_uses_fallback_origin() {
    let cloud = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/get/kitchen/sensor"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "temperature": 21.5, "humidity": 40.0 })),
        )
        .expect(1)
        .mount(&cloud)
        .await;

    let router = router(format!("{DEAD_ORIGIN}/{{name}}"), fallback_template(&cloud));
    let routed = router.route(&identity(), "kitchen", "/sensor").await.unwrap();

    assert_eq!(routed.base.route(), Route::Fallback);
    assert_eq!(routed.base.as_str(), format!("{}/get/kitchen", cloud.uri()));
    assert!(routed.response.is_success());
}

#[tokio::test]
async fn test_resolve_for_both_presets_when_unreachable() {
    let recorder = router(
        format!("{DEAD_ORIGIN}/{{name}}"),
        RouteConfig::recorder("https://recorder.example.com/").fallback_origin_template,
    );
    assert_eq!(
        recorder.resolve("porch").await.as_str(),
        "https://recorder.example.com/get/porch"
    );

    let relay = router(
        format!("{DEAD_ORIGIN}/{{name}}"),
        RouteConfig::relay("https://relay.example.com/").fallback_origin_template,
    );
    assert_eq!(relay.resolve("porch").await.as_str(), "https://relay.example.com/porch");
}

// ── No cross-path retry ─────────────────────────────────────────────

#[tokio::test]
async fn test_failed_local_request_is_not_rerouted() {
    let (local, cloud) = servers().await;

    Mock::given(method("GET"))
        .and(path("/kitchen/status"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&local)
        .await;
    Mock::given(method("GET"))
        .and(path("/kitchen/status"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&local)
        .await;

    let router = router(local_template(&local), fallback_template(&cloud));
    let routed = router.route(&identity(), "kitchen", "/status").await.unwrap();

    assert!(routed.base.is_local());
    assert_eq!(routed.response.status().as_u16(), 503);
    assert!(cloud.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_fallback_transport_error_propagates() {
    let router = router(
        format!("{DEAD_ORIGIN}/{{name}}"),
        format!("{DEAD_ORIGIN}/get/{{name}}"),
    );
    let result = router.route(&identity(), "kitchen", "/status").await;

    assert!(
        matches!(result, Err(Error::Transport(_))),
        "expected Transport error, got: {result:?}"
    );
}

// ── Authentication ──────────────────────────────────────────────────

#[tokio::test]
async fn test_missing_credential_fails_before_any_request() {
    let (local, cloud) = servers().await;

    let router = router(local_template(&local), fallback_template(&cloud));
    let anonymous = StaticToken::new(SecretString::from(String::new()));
    let result = router.route(&anonymous, "kitchen", "/status").await;

    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
    assert!(local.received_requests().await.unwrap().is_empty());
    assert!(cloud.received_requests().await.unwrap().is_empty());
}

// ── Probe deadline ──────────────────────────────────────────────────

#[tokio::test]
async fn test_probe_deadline_is_enforced() {
    let local = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(10)))
        .mount(&local)
        .await;

    let probe = ReachabilityProbe::with_client(reqwest::Client::new(), DEFAULT_PROBE_TIMEOUT);
    let started = Instant::now();
    let reachable = probe.is_reachable(&local.uri()).await;
    let elapsed = started.elapsed();

    assert!(!reachable);
    assert!(elapsed >= DEFAULT_PROBE_TIMEOUT);
    assert!(elapsed < DEFAULT_PROBE_TIMEOUT + Duration::from_secs(2), "took {elapsed:?}");
}

#[tokio::test]
async fn test_probe_refused_connection_is_unreachable() {
    let probe = ReachabilityProbe::with_client(reqwest::Client::new(), DEFAULT_PROBE_TIMEOUT);
    assert!(!probe.is_reachable(DEAD_ORIGIN).await);
}

#[tokio::test]
async fn test_probe_sends_no_credential() {
    let local = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&local)
        .await;

    let probe = ReachabilityProbe::with_client(reqwest::Client::new(), DEFAULT_PROBE_TIMEOUT);
    assert!(probe.is_reachable(&local.uri()).await);

    let requests = local.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("authorization"));
}

// ── Per-route clients ───────────────────────────────────────────────

fn tagged_client(tag: &'static str) -> RequestClient {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert("x-client", reqwest::header::HeaderValue::from_static(tag));
    RequestClient::with_client(
        reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .unwrap(),
    )
}

fn split_router(local_template: String, fallback_template: String) -> ConnectivityRouter {
    ConnectivityRouter::new(
        tagged_client("cloud"),
        ReachabilityProbe::with_client(reqwest::Client::new(), DEFAULT_PROBE_TIMEOUT),
        RouteConfig::new(local_template, fallback_template),
    )
    .with_local_client(tagged_client("lan"))
}

#[tokio::test]
async fn test_local_route_uses_local_client() {
    let (local, cloud) = servers().await;

    Mock::given(method("GET"))
        .and(path("/kitchen/status"))
        .and(header("x-client", "lan"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&local)
        .await;
    // The reachability check on the same server
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&local)
        .await;

    let routed = split_router(local_template(&local), fallback_template(&cloud))
        .route(&identity(), "kitchen", "/status")
        .await
        .unwrap();
    assert_eq!(routed.base.route(), Route::Local);
    assert_eq!(routed.response.status(), 200);
}

#[tokio::test]
async fn test_fallback_route_keeps_cloud_client() {
    let cloud = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/get/kitchen/status"))
        .and(header("x-client", "cloud"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&cloud)
        .await;

    let routed = split_router(
        format!("{DEAD_ORIGIN}/{{name}}"),
        fallback_template(&cloud),
    )
    .route(&identity(), "kitchen", "/status")
    .await
    .unwrap();
    assert_eq!(routed.base.route(), Route::Fallback);
    assert_eq!(routed.response.status(), 200);
}
