// Recorder and device wire types
//
// Raw JSON shapes as the upstreams send them. Timestamps stay strings and
// role fields stay untyped JSON here; `moja-core` parses and normalizes them.
// Fields use `#[serde(default)]` liberally because the upstreams are
// inconsistent about field presence.

use serde::{Deserialize, Serialize};

// ── Users ────────────────────────────────────────────────────────────

/// User row from `GET me` / `GET users`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserEntry {
    pub id: String,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    /// `"admin"`, `"user"`, `null`, or something newer.
    #[serde(default)]
    pub role: Option<serde_json::Value>,
}

// ── Devices ──────────────────────────────────────────────────────────

/// Device row from `GET list_devices` / `GET device/{name}`.
///
/// `list_devices` sends `{name, active}`; `device/{name}` adds the role
/// allowlist. Missing fields default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceEntry {
    pub name: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub allowed_roles: Vec<serde_json::Value>,
}

// ── History ──────────────────────────────────────────────────────────

/// One entry from `GET recordings/{name}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingEntry {
    pub url: String,
    pub created_at: String,
}

/// One entry from `GET sensors/{name}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorEntry {
    pub created_at: String,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
    #[serde(default)]
    pub cpu_temperature: Option<f64>,
}

// ── Live device payloads ─────────────────────────────────────────────

/// Body of `GET /start`: a playlist path relative to the origin used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartResponse {
    pub playlist: String,
}

/// Body of `GET /sensor` on a device (directly or via fallback).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SensorSampleEntry {
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
    #[serde(default)]
    pub cpu_temperature: Option<f64>,
}

/// Entry from the relay's `GET list`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayDeviceEntry {
    pub name: String,
}
