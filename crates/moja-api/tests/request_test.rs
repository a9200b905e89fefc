#![allow(clippy::unwrap_used)]
// Integration tests for `RequestClient` using wiremock.

use reqwest::header::{HeaderName, HeaderValue};
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use moja_api::{Error, RequestClient, RequestOptions, StaticToken};

fn identity() -> StaticToken {
    StaticToken::new(SecretString::from("test-token".to_owned()))
}

fn client() -> RequestClient {
    RequestClient::with_client(reqwest::Client::new())
}

#[tokio::test]
async fn test_get_attaches_bearer() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/status"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client()
        .get(&identity(), &server.uri(), "/status")
        .await
        .unwrap();

    assert!(resp.is_success());
    assert_eq!(resp.json::<serde_json::Value>().unwrap(), json!({ "ok": true }));
}

#[tokio::test]
async fn test_non_success_is_returned_not_raised() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let resp = client()
        .get(&identity(), &server.uri(), "/status")
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 502);
    assert_eq!(resp.text(), "bad gateway");
}

#[tokio::test]
async fn test_post_body_is_json() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/set_roles/kitchen"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!(["admin"])))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client()
        .send(
            &identity(),
            &format!("{}/", server.uri()),
            "set_roles/kitchen",
            RequestOptions::post(json!(["admin"])),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_caller_header_is_forwarded() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/status"))
        .and(header("x-request-id", "abc"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let options = RequestOptions::get().header(
        HeaderName::from_static("x-request-id"),
        HeaderValue::from_static("abc"),
    );
    client()
        .send(&identity(), &server.uri(), "/status", options)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_no_credential_sends_nothing() {
    let server = MockServer::start().await;

    let anonymous = StaticToken::new(SecretString::from("   ".to_owned()));
    let result = client().get(&anonymous, &server.uri(), "/status").await;

    assert!(matches!(result, Err(Error::Authentication { .. })));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_base_is_invalid_url() {
    let result = client().get(&identity(), "not a url", "/status").await;
    assert!(matches!(result, Err(Error::InvalidUrl(_))));
}
