// Recorder HTTP client
//
// Wraps `RequestClient` with the recorder origin and the JSON decode /
// status check shared by every typed endpoint. Endpoint groups (users,
// devices, history) are inherent methods in sibling files.

use serde::de::DeserializeOwned;

use crate::auth::Identity;
use crate::error::Error;
use crate::request::{RawResponse, RequestClient, RequestOptions};

/// Client for the cloud recorder service.
///
/// `origin` is the configured recorder URL and is expected to end with `/`;
/// endpoint paths are appended without a leading separator
/// (`{origin}list_devices`).
#[derive(Debug, Clone)]
pub struct RecorderClient {
    requests: RequestClient,
    origin: String,
}

impl RecorderClient {
    pub fn new(requests: RequestClient, origin: impl Into<String>) -> Self {
        Self {
            requests,
            origin: origin.into(),
        }
    }

    /// The recorder origin.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn requests(&self) -> &RequestClient {
        &self.requests
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a request to `{origin}{endpoint}` and return it unchecked.
    pub(crate) async fn send<I: Identity>(
        &self,
        identity: &I,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<RawResponse, Error> {
        self.requests
            .send(identity, &self.origin, endpoint, options)
            .await
    }

    /// GET, require 2xx, decode JSON.
    pub(crate) async fn get_json<I: Identity, T: DeserializeOwned>(
        &self,
        identity: &I,
        endpoint: &str,
    ) -> Result<T, Error> {
        self.send(identity, endpoint, RequestOptions::get())
            .await?
            .error_for_status()?
            .json()
    }

    /// GET, decode JSON on 2xx, `None` on any other status.
    pub(crate) async fn get_json_optional<I: Identity, T: DeserializeOwned>(
        &self,
        identity: &I,
        endpoint: &str,
    ) -> Result<Option<T>, Error> {
        let resp = self.send(identity, endpoint, RequestOptions::get()).await?;
        if !resp.is_success() {
            return Ok(None);
        }
        resp.json().map(Some)
    }

    /// POST a JSON body, require 2xx.
    pub(crate) async fn post_json<I: Identity>(
        &self,
        identity: &I,
        endpoint: &str,
        body: serde_json::Value,
    ) -> Result<RawResponse, Error> {
        self.send(identity, endpoint, RequestOptions::post(body))
            .await?
            .error_for_status()
    }
}
