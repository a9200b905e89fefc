// ── Device API facade ──
//
// One typed entry point over the three upstreams. Historical and
// administrative calls always go to the recorder; live calls (`status`,
// `sensor`, `start_stream`) go through the connectivity router and carry
// the base address they were served from.

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, info};

use moja_api::recorder::models::{SensorSampleEntry, StartResponse};
use moja_api::{
    ConnectivityRouter, Identity, RawResponse, ReachabilityProbe, RecorderClient, RelayClient,
    RequestClient, Role, Routed,
};

use crate::config::DeviceApiConfig;
use crate::convert::{role_from_value, try_collect};
use crate::error::CoreError;
use crate::model::{Device, Health, Recording, SensorReading, SensorSample, StreamSession, User};

/// Stream start parameters, sent as-is.
pub const START_STREAM_ENDPOINT: &str = "/start?bitrate=500000&framerate=24";

/// Typed client for a moja deployment.
///
/// Holds no identity and no per-call state; share it by reference.
#[derive(Debug, Clone)]
pub struct DeviceApi {
    recorder: RecorderClient,
    relay: Option<RelayClient>,
    router: ConnectivityRouter,
}

impl DeviceApi {
    /// Build every client from one configuration.
    pub fn new(config: &DeviceApiConfig) -> Result<Self, CoreError> {
        let requests = RequestClient::new(&config.transport)?;
        let local_transport = config.local_transport();
        let local_requests = RequestClient::new(&local_transport)?;
        let probe = ReachabilityProbe::new(&local_transport, config.probe_timeout)?;
        let routes = config.route_config()?;

        let recorder = RecorderClient::new(requests.clone(), config.recorder_url.clone());
        let relay = config
            .relay_url
            .as_ref()
            .map(|url| RelayClient::new(requests.clone(), url.clone()));
        let router =
            ConnectivityRouter::new(requests, probe, routes).with_local_client(local_requests);

        debug!(
            recorder = %config.recorder_url,
            relay = ?config.relay_url,
            variant = %config.variant,
            local_tls = ?config.local_tls,
            "device api configured"
        );
        Ok(Self::from_parts(recorder, relay, router))
    }

    /// Assemble from pre-built clients.
    pub fn from_parts(
        recorder: RecorderClient,
        relay: Option<RelayClient>,
        router: ConnectivityRouter,
    ) -> Self {
        Self {
            recorder,
            relay,
            router,
        }
    }

    pub fn recorder(&self) -> &RecorderClient {
        &self.recorder
    }

    pub fn router(&self) -> &ConnectivityRouter {
        &self.router
    }

    // ── Users ────────────────────────────────────────────────────────

    /// The signed-in user's record.
    pub async fn me<I: Identity>(&self, identity: &I) -> Result<User, CoreError> {
        User::try_from(self.recorder.me(identity).await?)
    }

    pub async fn list_users<I: Identity>(&self, identity: &I) -> Result<Vec<User>, CoreError> {
        try_collect(self.recorder.list_users(identity).await?)
    }

    /// The signed-in user's role, or `None` if they have none or the
    /// recorder refuses to say.
    pub async fn get_user_role<I: Identity>(
        &self,
        identity: &I,
    ) -> Result<Option<Role>, CoreError> {
        let me = self.recorder.me_optional(identity).await?;
        Ok(me.and_then(|u| role_from_value(u.role.as_ref())))
    }

    pub async fn set_user_role<I: Identity>(
        &self,
        identity: &I,
        user_id: &str,
        role: Option<Role>,
    ) -> Result<(), CoreError> {
        self.recorder.set_user_role(identity, user_id, role).await?;
        info!(user_id, role = ?role, "user role updated");
        Ok(())
    }

    // ── Devices ──────────────────────────────────────────────────────

    pub async fn list_devices<I: Identity>(&self, identity: &I) -> Result<Vec<Device>, CoreError> {
        let entries = self.recorder.list_devices(identity).await?;
        Ok(entries.into_iter().map(Device::from).collect())
    }

    /// A single device, or `None` if the recorder does not return it.
    pub async fn get_device<I: Identity>(
        &self,
        identity: &I,
        name: &str,
    ) -> Result<Option<Device>, CoreError> {
        let entry = self.recorder.get_device(identity, name).await?;
        Ok(entry.map(Device::from))
    }

    pub async fn set_device_roles<I: Identity>(
        &self,
        identity: &I,
        name: &str,
        roles: &[Role],
    ) -> Result<(), CoreError> {
        self.recorder.set_device_roles(identity, name, roles).await?;
        info!(device = name, roles = ?roles, "device roles updated");
        Ok(())
    }

    /// Device names registered with the relay.
    pub async fn relay_devices<I: Identity>(&self, identity: &I) -> Result<Vec<String>, CoreError> {
        let relay = self.relay.as_ref().ok_or_else(|| CoreError::Config {
            message: "no relay URL configured".into(),
        })?;
        Ok(relay.list_devices(identity).await?)
    }

    // ── History ──────────────────────────────────────────────────────

    /// Recordings for a device in `[from, to]`; either bound may be left
    /// to the recorder's default.
    pub async fn recordings<I: Identity>(
        &self,
        identity: &I,
        name: &str,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<Recording>, CoreError> {
        try_collect(self.recorder.recordings(identity, name, from, to).await?)
    }

    /// Logged sensor readings for a device in `[from, to]`.
    pub async fn sensor_history<I: Identity>(
        &self,
        identity: &I,
        name: &str,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<SensorReading>, CoreError> {
        try_collect(self.recorder.sensors(identity, name, from, to).await?)
    }

    /// Recorder liveness. Any HTTP answer is a result; only transport and
    /// credential failures are errors.
    pub async fn health<I: Identity>(&self, identity: &I) -> Result<Health, CoreError> {
        let status = self.recorder.healthz(identity).await?;
        Ok(Health {
            healthy: status.is_success(),
            status: status.as_u16(),
        })
    }

    // ── Live ─────────────────────────────────────────────────────────

    /// The device's `/status` document, unchanged.
    pub async fn status<I: Identity>(
        &self,
        identity: &I,
        name: &str,
    ) -> Result<Routed<Value>, CoreError> {
        let routed = self.router.route(identity, name, "/status").await?;
        Ok(routed.try_map(decode::<Value>)?)
    }

    /// A live sensor sample.
    pub async fn sensor<I: Identity>(
        &self,
        identity: &I,
        name: &str,
    ) -> Result<Routed<SensorSample>, CoreError> {
        let routed = self.router.route(identity, name, "/sensor").await?;
        let routed = routed.try_map(decode::<SensorSampleEntry>)?;
        Ok(routed.map(SensorSample::from))
    }

    /// Start the live stream and resolve its playlist against the origin
    /// that served the start call.
    pub async fn start_stream<I: Identity>(
        &self,
        identity: &I,
        name: &str,
    ) -> Result<StreamSession, CoreError> {
        let routed = self
            .router
            .route(identity, name, START_STREAM_ENDPOINT)
            .await?;
        let Routed { response, base } = routed.try_map(decode::<StartResponse>)?;

        let url = base.join(&response.playlist);
        info!(device = name, %url, route = %base.route(), "stream started");
        Ok(StreamSession { url, base })
    }
}

fn decode<T: serde::de::DeserializeOwned>(resp: RawResponse) -> Result<T, moja_api::Error> {
    resp.error_for_status()?.json()
}

#[cfg(test)]
mod tests {
    use moja_api::RouteConfig;

    use super::*;

    #[test]
    fn local_status_url_form() {
        let routes = RouteConfig::recorder("https://recorder.example.com/");
        assert_eq!(
            format!("{}{}", routes.local_origin("kitchen"), "/status"),
            "https://kitchen.local/status"
        );
    }

    #[test]
    fn fallback_start_url_form() {
        let routes = RouteConfig::recorder("https://recorder.example.com/");
        assert_eq!(
            format!("{}{START_STREAM_ENDPOINT}", routes.fallback_origin("kitchen")),
            "https://recorder.example.com/get/kitchen/start?bitrate=500000&framerate=24"
        );
    }
}
