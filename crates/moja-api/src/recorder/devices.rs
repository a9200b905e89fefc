// Recorder device endpoints
//
// Device listing with liveness, per-device role allowlists.

use serde_json::json;
use tracing::debug;

use crate::auth::{Identity, Role};
use crate::error::Error;
use crate::recorder::client::RecorderClient;
use crate::recorder::models::DeviceEntry;

impl RecorderClient {
    /// Devices visible to the caller's role, with liveness.
    ///
    /// `GET list_devices`
    pub async fn list_devices<I: Identity>(
        &self,
        identity: &I,
    ) -> Result<Vec<DeviceEntry>, Error> {
        debug!("listing devices");
        self.get_json(identity, "list_devices").await
    }

    /// A single device, or `None` if unknown or not visible to the caller.
    ///
    /// `GET device/{name}`
    pub async fn get_device<I: Identity>(
        &self,
        identity: &I,
        name: &str,
    ) -> Result<Option<DeviceEntry>, Error> {
        self.get_json_optional(identity, &format!("device/{name}"))
            .await
    }

    /// Replace a device's role allowlist.
    ///
    /// `POST set_roles/{name}` with `["admin", "user"]`
    pub async fn set_device_roles<I: Identity>(
        &self,
        identity: &I,
        name: &str,
        roles: &[Role],
    ) -> Result<(), Error> {
        debug!(device = name, roles = ?roles, "setting device roles");
        self.post_json(identity, &format!("set_roles/{name}"), json!(roles))
            .await?;
        Ok(())
    }
}
