// Relay service client
//
// The relay only proxies live calls (handled by `ConnectivityRouter`) and
// lists the devices currently registered with it.

use tracing::debug;

use crate::auth::Identity;
use crate::error::Error;
use crate::recorder::models::RelayDeviceEntry;
use crate::request::RequestClient;

/// Client for the bare relay service.
#[derive(Debug, Clone)]
pub struct RelayClient {
    requests: RequestClient,
    origin: String,
}

impl RelayClient {
    pub fn new(requests: RequestClient, origin: impl Into<String>) -> Self {
        Self {
            requests,
            origin: origin.into(),
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Names of devices currently registered with the relay.
    ///
    /// `GET list` → `[{"name": ...}]`
    pub async fn list_devices<I: Identity>(&self, identity: &I) -> Result<Vec<String>, Error> {
        debug!("listing relay devices");
        let entries: Vec<RelayDeviceEntry> = self
            .requests
            .get(identity, &self.origin, "list")
            .await?
            .error_for_status()?
            .json()?;
        Ok(entries.into_iter().map(|e| e.name).collect())
    }
}
