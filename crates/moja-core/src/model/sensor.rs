// ── Sensor readings ──
//
// Every numeric field is optional. A field the upstream did not send stays
// `None`; nothing here fills in zeros.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A logged reading from the recorder's sensor history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub created_at: DateTime<Utc>,
    /// Degrees Celsius.
    pub temperature: Option<f64>,
    /// Relative humidity, percent.
    pub humidity: Option<f64>,
    /// Device SoC temperature, degrees Celsius.
    pub cpu_temperature: Option<f64>,
}

/// A live reading taken from the device's `/sensor` endpoint.
///
/// Carries no timestamp: the device does not send one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorSample {
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub cpu_temperature: Option<f64>,
}
