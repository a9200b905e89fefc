//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use moja_config::ConfigError;
use moja_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to {url}")]
    #[diagnostic(
        code(moja::connection_failed),
        help(
            "Check that the recorder (or relay) URL is right and reachable.\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request to {url} timed out")]
    #[diagnostic(
        code(moja::timeout),
        help("Increase the limit with --timeout, or drop it to rely on transport defaults.")
    )]
    Timeout { url: String },

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(moja::auth_failed),
        help(
            "Your token may be missing, expired, or malformed.\n\
             Pass a fresh one with --token or MOJA_TOKEN."
        )
    )]
    AuthFailed { message: String },

    #[error("No token configured for profile '{profile}'")]
    #[diagnostic(
        code(moja::no_credentials),
        help(
            "Pass --token, set MOJA_TOKEN, or store one with:\n\
             moja --token <TOKEN> config init --keyring --recorder-url <URL>"
        )
    )]
    NoCredentials { profile: String },

    // ── Upstream ─────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(moja::not_found),
        help("Run: moja {list_command} to see what is visible to you")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("Permission denied (HTTP {status}): {message}")]
    #[diagnostic(
        code(moja::forbidden),
        help("This needs a role you don't have. Check it with: moja users role")
    )]
    Forbidden { status: u16, message: String },

    #[error("Recorder at {url} is unhealthy (HTTP {status})")]
    #[diagnostic(code(moja::unhealthy))]
    Unhealthy { url: String, status: u16 },

    #[error("Upstream error (HTTP {status}): {message}")]
    #[diagnostic(code(moja::upstream))]
    Upstream { status: u16, message: String },

    #[error("Unexpected response: {message}")]
    #[diagnostic(
        code(moja::invalid_response),
        help("The upstream answered with data this client cannot read. Re-run with -vv for details.")
    )]
    InvalidResponse { message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(moja::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(moja::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: moja config init --name {name} --recorder-url <URL>"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No recorder configured")]
    #[diagnostic(
        code(moja::no_config),
        help(
            "Pass --recorder <URL>, or create a profile with: moja config init\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(moja::config))]
    Config(Box<ConfigError>),

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(moja::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    #[diagnostic(code(moja::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Forbidden { .. } => exit_code::PERMISSION,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },

            CoreError::Timeout { url } => CliError::Timeout { url },

            CoreError::Upstream { status, message } if status == 401 => {
                CliError::AuthFailed { message }
            }

            CoreError::Upstream { status, message } if status == 403 => {
                CliError::Forbidden { status, message }
            }

            CoreError::Upstream { status, message } => CliError::Upstream { status, message },

            CoreError::InvalidTimestamp { field, value } => CliError::InvalidResponse {
                message: format!("unparseable timestamp in `{field}`: {value:?}"),
            },

            CoreError::Deserialization { message } | CoreError::Internal(message) => {
                CliError::InvalidResponse { message }
            }

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::ProfileNotFound { name } => CliError::ProfileNotFound {
                name,
                available: String::new(),
            },
            other => CliError::Config(Box::new(other)),
        }
    }
}
