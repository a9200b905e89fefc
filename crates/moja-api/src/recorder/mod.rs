// Recorder service client modules
//
// Hand-written client for the cloud recorder: user and device administration,
// recordings and sensor history. Live device calls do not go through here;
// they are routed by `ConnectivityRouter` and only fall back to the
// recorder's `get/{name}` proxy.

pub mod client;
pub mod devices;
pub mod history;
pub mod models;
pub mod users;

pub use client::RecorderClient;
