// moja-core: Typed device client between moja-api and consumers (CLI).

pub mod api;
pub mod config;
pub mod convert;
pub mod error;
pub mod model;

// ── Primary re-exports ──────────────────────────────────────────────
pub use api::{DeviceApi, START_STREAM_ENDPOINT};
pub use config::DeviceApiConfig;
pub use error::CoreError;

pub use model::{Device, Health, Recording, SensorReading, SensorSample, StreamSession, User};

// Routing and identity types callers need alongside the facade.
pub use moja_api::{BaseAddress, Identity, Role, Route, Routed, StaticToken, UpstreamVariant};
