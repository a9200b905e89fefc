// ── Core error types ──
//
// User-facing errors from moja-core. Consumers see what went wrong with a
// device call, not which reqwest or serde failure produced it.
// The `From<moja_api::Error>` impl translates transport-layer errors
// into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Identity ─────────────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    // ── Upstream errors ──────────────────────────────────────────────
    #[error("Upstream rejected the request (HTTP {status}): {message}")]
    Upstream { status: u16, message: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Invalid timestamp in `{field}`: {value:?}")]
    InvalidTimestamp { field: &'static str, value: String },

    #[error("Unexpected response shape: {message}")]
    Deserialization { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// HTTP status of a completed-but-rejected request, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::AuthenticationFailed { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<moja_api::Error> for CoreError {
    fn from(err: moja_api::Error) -> Self {
        match err {
            moja_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            moja_api::Error::Transport(ref e) => {
                let url = e
                    .url()
                    .map_or_else(|| "<unknown>".into(), ToString::to_string);
                if e.is_timeout() {
                    CoreError::Timeout { url }
                } else {
                    CoreError::ConnectionFailed {
                        url,
                        reason: e.to_string(),
                    }
                }
            }
            moja_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            moja_api::Error::InvalidHeader(msg) => CoreError::AuthenticationFailed {
                message: format!("Unusable credential: {msg}"),
            },
            moja_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            moja_api::Error::Upstream { status, body } => CoreError::Upstream {
                status,
                message: body,
            },
            moja_api::Error::Deserialization { message, body: _ } => {
                CoreError::Deserialization { message }
            }
            moja_api::Error::Serialization(e) => CoreError::Internal(format!(
                "Request body serialization failed: {e}"
            )),
        }
    }
}
