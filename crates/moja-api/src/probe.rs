// Local-network reachability probe
//
// A liveness check, not a health or authorization check: any completed HTTP
// exchange counts as reachable. The deadline is a scoped `tokio` timer that
// is dropped (and the in-flight request aborted) on every exit path.

use std::time::Duration;

use tracing::{debug, warn};

use crate::error::Error;
use crate::transport::TransportConfig;

/// Canonical probe deadline.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(500);

/// Bounded-time check of whether a device answers on the local network.
#[derive(Debug, Clone)]
pub struct ReachabilityProbe {
    http: reqwest::Client,
    deadline: Duration,
}

impl ReachabilityProbe {
    /// Build a probe with its own HTTP client from `transport`.
    ///
    /// The transport's request timeout is ignored here; the probe enforces
    /// `deadline` itself.
    pub fn new(transport: &TransportConfig, deadline: Duration) -> Result<Self, Error> {
        let transport = TransportConfig {
            timeout: None,
            ..transport.clone()
        };
        Ok(Self {
            http: transport.build_client()?,
            deadline,
        })
    }

    /// Wrap a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, deadline: Duration) -> Self {
        Self { http, deadline }
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// `GET {local_origin}/status` within the deadline. Never fails.
    pub async fn is_reachable(&self, local_origin: &str) -> bool {
        let url = format!("{local_origin}/status");

        match tokio::time::timeout(self.deadline, self.http.get(&url).send()).await {
            Ok(Ok(resp)) => {
                debug!(%url, status = %resp.status(), "device answered probe");
                true
            }
            Ok(Err(e)) if e.is_timeout() => {
                debug!(%url, "probe request timed out");
                false
            }
            Ok(Err(e)) => {
                warn!(%url, error = %e, "device unreachable, but DNS may have resolved");
                false
            }
            Err(_) => {
                debug!(%url, deadline = ?self.deadline, "probe deadline elapsed");
                false
            }
        }
    }
}
