// ── Domain model ──
//
// Canonical shapes for everything the recorder, relay and devices return.
// Timestamps are parsed, roles are normalized, and optional numerics stay
// optional; see `crate::convert` for the wire-to-domain rules.

pub mod device;
pub mod health;
pub mod recording;
pub mod sensor;
pub mod stream;
pub mod user;

// ── Re-exports ──────────────────────────────────────────────────────

pub use device::Device;
pub use health::Health;
pub use recording::Recording;
pub use sensor::{SensorReading, SensorSample};
pub use stream::StreamSession;
pub use user::User;
