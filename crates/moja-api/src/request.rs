// Authenticated request client
//
// Every call to a recorder, relay, or device goes through `RequestClient`:
// obtain a bearer credential from the caller's identity, build the absolute
// URL by plain concatenation, attach `Authorization`, and hand back the raw
// response. Status validation is left to the caller.

use bytes::Bytes;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::auth::Identity;
use crate::error::Error;
use crate::transport::TransportConfig;

/// Per-request options: method, optional JSON body, extra headers.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<serde_json::Value>,
    pub headers: HeaderMap,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            body: None,
            headers: HeaderMap::new(),
        }
    }
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post(body: serde_json::Value) -> Self {
        Self {
            method: Method::POST,
            body: Some(body),
            headers: HeaderMap::new(),
        }
    }

    /// Add a caller header. Caller headers win over the ones the client sets.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }
}

/// A completed HTTP exchange, whatever its status.
#[derive(Debug, Clone)]
pub struct RawResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl RawResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body as UTF-8, lossily.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        serde_json::from_slice(&self.body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: self.text(),
        })
    }

    /// Turn a non-2xx response into [`Error::Upstream`].
    pub fn error_for_status(self) -> Result<Self, Error> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::Upstream {
                status: self.status.as_u16(),
                body: self.text(),
            })
        }
    }
}

/// HTTP client that injects the caller's bearer credential on every request.
#[derive(Debug, Clone)]
pub struct RequestClient {
    http: reqwest::Client,
}

impl RequestClient {
    /// Create a request client from a `TransportConfig`.
    pub fn new(transport: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
        })
    }

    /// Wrap a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Send `GET {base}{endpoint}` with the identity's credential.
    pub async fn get<I: Identity>(
        &self,
        identity: &I,
        base: &str,
        endpoint: &str,
    ) -> Result<RawResponse, Error> {
        self.send(identity, base, endpoint, RequestOptions::get())
            .await
    }

    /// Send a request to `{base}{endpoint}` with the identity's credential.
    ///
    /// Fails with [`Error::Authentication`] before touching the network if
    /// the identity cannot produce a token. Non-2xx responses are returned,
    /// not raised.
    pub async fn send<I: Identity>(
        &self,
        identity: &I,
        base: &str,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<RawResponse, Error> {
        let token = Self::credential(identity).await?;
        self.send_with_credential(&token, base, endpoint, options)
            .await
    }

    /// Obtain a non-empty bearer token from the identity.
    pub(crate) async fn credential<I: Identity>(identity: &I) -> Result<SecretString, Error> {
        let token = identity.bearer_token().await?;
        if token.expose_secret().is_empty() {
            return Err(Error::Authentication {
                message: "identity produced an empty bearer token".into(),
            });
        }
        Ok(token)
    }

    pub(crate) async fn send_with_credential(
        &self,
        token: &SecretString,
        base: &str,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<RawResponse, Error> {
        // Plain concatenation: endpoint carries its own separator.
        let url = Url::parse(&format!("{base}{endpoint}"))?;
        debug!("{} {}", options.method, url);

        let headers = merge_headers(token, options.headers, options.body.is_some())?;
        let mut builder = self.http.request(options.method, url).headers(headers);
        if let Some(body) = options.body {
            builder = builder.body(serde_json::to_vec(&body)?);
        }

        let resp = builder.send().await.map_err(Error::Transport)?;
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp.bytes().await.map_err(Error::Transport)?;

        Ok(RawResponse::new(status, headers, body))
    }
}

/// Bearer first, then caller headers (replacing any same-named entry),
/// then a JSON content type if a body is present and none was given.
fn merge_headers(
    token: &SecretString,
    caller: HeaderMap,
    has_body: bool,
) -> Result<HeaderMap, Error> {
    let mut auth = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
        .map_err(|e| Error::InvalidHeader(format!("bearer token: {e}")))?;
    auth.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, auth);

    for name in caller.keys() {
        headers.remove(name);
    }
    for (name, value) in &caller {
        headers.append(name.clone(), value.clone());
    }

    if has_body && !headers.contains_key(CONTENT_TYPE) {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }

    Ok(headers)
}
