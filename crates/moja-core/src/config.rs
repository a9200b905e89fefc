// ── Runtime client configuration ──
//
// Describes *where* the upstreams live and how to reach them. Never
// touches disk: the CLI builds a `DeviceApiConfig` from its profile and
// hands it in.

use std::time::Duration;

use moja_api::{DEFAULT_PROBE_TIMEOUT, RouteConfig, TlsMode, TransportConfig, UpstreamVariant};

use crate::error::CoreError;

/// Configuration for one deployment (recorder plus optional relay).
#[derive(Debug, Clone)]
pub struct DeviceApiConfig {
    /// Recorder origin, with a trailing `/`.
    pub recorder_url: String,
    /// Relay origin, with a trailing `/`. Required for the relay variant.
    pub relay_url: Option<String>,
    /// Which upstream live calls fall back to.
    pub variant: UpstreamVariant,
    /// Deadline for the local reachability probe.
    pub probe_timeout: Duration,
    /// TLS and request-timeout settings for the recorder and relay.
    pub transport: TransportConfig,
    /// TLS mode for device-local origins (probe and local route only).
    pub local_tls: TlsMode,
}

impl DeviceApiConfig {
    /// Recorder deployment with the canonical probe deadline.
    pub fn recorder(recorder_url: impl Into<String>) -> Self {
        Self {
            recorder_url: recorder_url.into(),
            relay_url: None,
            variant: UpstreamVariant::Recorder,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            transport: TransportConfig::default(),
            local_tls: TlsMode::System,
        }
    }

    /// Relay deployment with the canonical probe deadline.
    pub fn relay(recorder_url: impl Into<String>, relay_url: impl Into<String>) -> Self {
        Self {
            recorder_url: recorder_url.into(),
            relay_url: Some(relay_url.into()),
            variant: UpstreamVariant::Relay,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            transport: TransportConfig::default(),
            local_tls: TlsMode::System,
        }
    }

    /// Transport for device-local calls: the shared timeouts with
    /// `local_tls`.
    pub fn local_transport(&self) -> TransportConfig {
        self.transport.clone().with_tls(self.local_tls.clone())
    }

    /// Origin templates for live calls under the configured variant.
    pub fn route_config(&self) -> Result<RouteConfig, CoreError> {
        match self.variant {
            UpstreamVariant::Recorder => Ok(RouteConfig::recorder(&self.recorder_url)),
            UpstreamVariant::Relay => {
                let relay = self.relay_url.as_deref().ok_or_else(|| CoreError::Config {
                    message: "relay variant selected but no relay URL configured".into(),
                })?;
                Ok(RouteConfig::relay(relay))
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn recorder_variant_routes_through_recorder() {
        let config = DeviceApiConfig::recorder("https://recorder.example.com/");
        let routes = config.route_config().unwrap();
        assert_eq!(
            routes.fallback_origin("kitchen"),
            "https://recorder.example.com/get/kitchen"
        );
        assert_eq!(config.probe_timeout, Duration::from_millis(500));
    }

    #[test]
    fn relay_variant_needs_relay_url() {
        let mut config = DeviceApiConfig::relay("https://recorder.example.com/", "https://relay.example.com/");
        assert_eq!(
            config.route_config().unwrap().fallback_origin("kitchen"),
            "https://relay.example.com/kitchen"
        );
        assert_eq!(config.probe_timeout, Duration::from_millis(500));

        config.relay_url = None;
        assert!(matches!(config.route_config(), Err(CoreError::Config { .. })));
    }

    #[test]
    fn local_tls_leaves_cloud_transport_alone() {
        let mut config = DeviceApiConfig::recorder("https://recorder.example.com/");
        config.transport = config.transport.with_timeout(Duration::from_secs(9));
        config.local_tls = TlsMode::DangerAcceptInvalid;

        let local = config.local_transport();
        assert_eq!(local.tls, TlsMode::DangerAcceptInvalid);
        assert_eq!(local.timeout, Some(Duration::from_secs(9)));
        assert_eq!(config.transport.tls, TlsMode::System);
    }
}
