// Connectivity-aware router
//
// Decides, per call, whether a device is addressed directly on the LAN or
// through the cloud fallback (recorder `get/{name}` proxy or bare relay).
// One probe per call; the chosen route is final for that call.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::auth::Identity;
use crate::error::Error;
use crate::probe::ReachabilityProbe;
use crate::request::{RawResponse, RequestClient, RequestOptions};

/// Placeholder substituted with the device name in origin templates.
pub const NAME_PLACEHOLDER: &str = "{name}";

/// Which path a call took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Route {
    /// Direct to the device on the local network.
    Local,
    /// Through the recorder or relay service.
    Fallback,
}

/// The origin actually used for one call.
///
/// Relative paths in a response (e.g. a playlist) must be resolved against
/// this value and nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BaseAddress {
    origin: String,
    route: Route,
}

impl BaseAddress {
    pub fn local(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            route: Route::Local,
        }
    }

    pub fn fallback(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            route: Route::Fallback,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.origin
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn is_local(&self) -> bool {
        self.route == Route::Local
    }

    /// `self + relative`, with no separator normalization.
    pub fn join(&self, relative: &str) -> String {
        format!("{}{relative}", self.origin)
    }
}

impl fmt::Display for BaseAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.origin)
    }
}

impl AsRef<str> for BaseAddress {
    fn as_ref(&self) -> &str {
        &self.origin
    }
}

/// A response paired with the base address that produced it.
#[derive(Debug, Clone)]
pub struct Routed<T> {
    pub response: T,
    pub base: BaseAddress,
}

impl<T> Routed<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Routed<U> {
        Routed {
            response: f(self.response),
            base: self.base,
        }
    }

    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<Routed<U>, E> {
        Ok(Routed {
            response: f(self.response)?,
            base: self.base,
        })
    }
}

/// Upstream deployment flavour; each has its own local and fallback origins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum UpstreamVariant {
    /// Recorder service proxying live calls through `get/{name}`.
    #[default]
    Recorder,
    /// Bare relay addressing devices as `{relay}{name}`.
    Relay,
}

/// Local and fallback origin templates for one deployment.
///
/// Both templates use [`NAME_PLACEHOLDER`] for the device name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteConfig {
    pub local_origin_template: String,
    pub fallback_origin_template: String,
}

impl RouteConfig {
    pub fn new(local: impl Into<String>, fallback: impl Into<String>) -> Self {
        Self {
            local_origin_template: local.into(),
            fallback_origin_template: fallback.into(),
        }
    }

    /// Recorder deployment: `https://{name}.local` or `{recorder}get/{name}`.
    pub fn recorder(recorder_origin: &str) -> Self {
        Self::new(
            "https://{name}.local",
            format!("{recorder_origin}get/{NAME_PLACEHOLDER}"),
        )
    }

    /// Relay deployment: `http://{name}.local:8000` or `{relay}{name}`.
    pub fn relay(relay_origin: &str) -> Self {
        Self::new(
            "http://{name}.local:8000",
            format!("{relay_origin}{NAME_PLACEHOLDER}"),
        )
    }

    pub fn for_variant(variant: UpstreamVariant, origin: &str) -> Self {
        match variant {
            UpstreamVariant::Recorder => Self::recorder(origin),
            UpstreamVariant::Relay => Self::relay(origin),
        }
    }

    pub fn local_origin(&self, device: &str) -> String {
        self.local_origin_template.replace(NAME_PLACEHOLDER, device)
    }

    pub fn fallback_origin(&self, device: &str) -> String {
        self.fallback_origin_template.replace(NAME_PLACEHOLDER, device)
    }
}

/// Probe-then-send router for live device calls.
///
/// No retries: if the chosen route fails, the failure is the caller's.
/// Local and fallback calls may use different clients; relaxed TLS for LAN
/// devices must never reach the cloud upstream.
#[derive(Debug, Clone)]
pub struct ConnectivityRouter {
    local: RequestClient,
    fallback: RequestClient,
    probe: ReachabilityProbe,
    config: RouteConfig,
}

impl ConnectivityRouter {
    /// Router sending both routes through `client`.
    pub fn new(client: RequestClient, probe: ReachabilityProbe, config: RouteConfig) -> Self {
        Self {
            local: client.clone(),
            fallback: client,
            probe,
            config,
        }
    }

    /// Use `local` for calls that go direct to the device.
    pub fn with_local_client(mut self, local: RequestClient) -> Self {
        self.local = local;
        self
    }

    pub fn config(&self) -> &RouteConfig {
        &self.config
    }

    /// Client for the given route.
    pub fn client(&self, route: Route) -> &RequestClient {
        match route {
            Route::Local => &self.local,
            Route::Fallback => &self.fallback,
        }
    }

    /// Probe the device and pick its base address for this call.
    pub async fn resolve(&self, device: &str) -> BaseAddress {
        let local = self.config.local_origin(device);
        let base = if self.probe.is_reachable(&local).await {
            BaseAddress::local(local)
        } else {
            BaseAddress::fallback(self.config.fallback_origin(device))
        };
        debug!(device, base = %base, route = %base.route(), "resolved device route");
        base
    }

    /// `GET {base}{endpoint}` on the route chosen for `device`.
    ///
    /// The credential is obtained before the probe, so an unauthenticated
    /// call fails without any network traffic.
    pub async fn route<I: Identity>(
        &self,
        identity: &I,
        device: &str,
        endpoint: &str,
    ) -> Result<Routed<RawResponse>, Error> {
        let token = RequestClient::credential(identity).await?;
        let base = self.resolve(device).await;
        let response = self
            .client(base.route())
            .send_with_credential(&token, base.as_str(), endpoint, RequestOptions::get())
            .await?;
        Ok(Routed { response, base })
    }
}
