// ── Device domain type ──

use std::collections::BTreeSet;

use moja_api::Role;
use serde::{Deserialize, Serialize};

/// A registered edge device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub name: String,
    /// Roles allowed to see this device. Unknown roles from the upstream
    /// are dropped, so an empty set means "nobody but the server's defaults".
    pub allowed_roles: BTreeSet<Role>,
    /// Whether the device is currently registered with the upstream.
    pub active: bool,
}
