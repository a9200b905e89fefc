use serde::Serialize;

/// The recorder's answer to its liveness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Health {
    /// `status` is 2xx.
    pub healthy: bool,
    pub status: u16,
}
