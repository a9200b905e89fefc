//! Shared configuration for moja tools.
//!
//! TOML profiles, token resolution (env + keyring + plaintext), and
//! translation to `moja_core::DeviceApiConfig`. The CLI adds
//! `GlobalOpts`-aware wrappers on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use moja_api::{TlsMode, TransportConfig, UpstreamVariant};
use moja_core::DeviceApiConfig;

/// Keyring service name; entries are keyed `<profile>/token`.
pub const KEYRING_SERVICE: &str = "moja";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no token configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{name}' not found in config")]
    ProfileNotFound { name: String },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named deployment profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::ProfileNotFound { name: name.into() })
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Local reachability probe deadline, milliseconds.
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,

    #[serde(default)]
    pub insecure: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            probe_timeout_ms: default_probe_timeout_ms(),
            insecure: false,
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_probe_timeout_ms() -> u64 {
    500
}

/// A named deployment profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Recorder service URL (e.g., "https://recorder.example.com/").
    pub recorder_url: String,

    /// Relay service URL, for relay deployments.
    pub relay_url: Option<String>,

    /// Fallback upstream for live calls: "recorder" or "relay".
    #[serde(default = "default_variant")]
    pub variant: String,

    /// Bearer token (plaintext; prefer keyring or env var).
    pub token: Option<String>,

    /// Environment variable name containing the bearer token.
    pub token_env: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Accept self-signed certificates from devices on `.local`. Never
    /// applies to the recorder or relay.
    pub insecure: Option<bool>,

    /// Request timeout for real (non-probe) requests, seconds. Unset means
    /// no client-side limit.
    pub timeout: Option<u64>,

    /// Override the probe deadline, milliseconds.
    pub probe_timeout_ms: Option<u64>,
}

fn default_variant() -> String {
    "recorder".into()
}

impl Profile {
    pub fn new(recorder_url: impl Into<String>) -> Self {
        Self {
            recorder_url: recorder_url.into(),
            relay_url: None,
            variant: default_variant(),
            token: None,
            token_env: None,
            ca_cert: None,
            insecure: None,
            timeout: None,
            probe_timeout_ms: None,
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "moja", "moja").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("moja");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load Config from `path` + environment.
///
/// A missing file yields the defaults; a file that exists but does not
/// parse is an error.
///
/// Env vars use the `MOJA_` prefix with `__` between nesting levels,
/// e.g. `MOJA_DEFAULT_PROFILE` or `MOJA_DEFAULTS__OUTPUT=json`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("MOJA_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Token resolution (without CLI flags) ────────────────────────────

/// Resolve a bearer token from the credential chain (no CLI flag step).
///
/// Order: the profile's `token_env` variable, the system keyring, then
/// plaintext `token` in the config file.
pub fn resolve_token(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Profile's token_env → env var lookup
    if let Some(ref env_name) = profile.token_env {
        if let Ok(val) = std::env::var(env_name) {
            if !val.trim().is_empty() {
                return Ok(SecretString::from(val));
            }
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &keyring_user(profile_name)) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    if let Some(ref token) = profile.token {
        return Ok(SecretString::from(token.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Store a token in the system keyring for `profile_name`.
pub fn store_token(profile_name: &str, token: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &keyring_user(profile_name))?;
    entry.set_password(token)?;
    Ok(())
}

fn keyring_user(profile_name: &str) -> String {
    format!("{profile_name}/token")
}

// ── Profile → DeviceApiConfig ───────────────────────────────────────

/// Validate an upstream URL and make sure it ends with `/`, since
/// endpoint paths are appended to it verbatim.
pub fn normalize_origin(field: &str, raw: &str) -> Result<String, ConfigError> {
    let raw = raw.trim();
    let url: url::Url = raw.parse().map_err(|_| ConfigError::Validation {
        field: field.into(),
        reason: format!("invalid URL: {raw}"),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: field.into(),
            reason: format!("expected an http(s) URL, got scheme '{}'", url.scheme()),
        });
    }
    if raw.ends_with('/') {
        Ok(raw.to_owned())
    } else {
        Ok(format!("{raw}/"))
    }
}

pub fn parse_variant(raw: &str) -> Result<UpstreamVariant, ConfigError> {
    raw.parse().map_err(|_| ConfigError::Validation {
        field: "variant".into(),
        reason: format!("expected 'recorder' or 'relay', got '{raw}'"),
    })
}

/// Build a `DeviceApiConfig` from a profile and global defaults, with no
/// CLI flag overrides.
pub fn profile_to_api_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<DeviceApiConfig, ConfigError> {
    let recorder_url = normalize_origin("recorder_url", &profile.recorder_url)?;
    let relay_url = profile
        .relay_url
        .as_deref()
        .map(|raw| normalize_origin("relay_url", raw))
        .transpose()?;
    let variant = parse_variant(&profile.variant)?;

    if variant == UpstreamVariant::Relay && relay_url.is_none() {
        return Err(ConfigError::Validation {
            field: "relay_url".into(),
            reason: "required when variant is 'relay'".into(),
        });
    }

    let tls = profile
        .ca_cert
        .as_ref()
        .map_or(TlsMode::System, |ca_path| TlsMode::CustomCa(ca_path.clone()));
    let local_tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsMode::DangerAcceptInvalid
    } else {
        tls.clone()
    };

    let transport = TransportConfig {
        tls,
        timeout: profile.timeout.map(Duration::from_secs),
        ..TransportConfig::default()
    };

    Ok(DeviceApiConfig {
        recorder_url,
        relay_url,
        variant,
        probe_timeout: Duration::from_millis(
            profile.probe_timeout_ms.unwrap_or(defaults.probe_timeout_ms),
        ),
        transport,
        local_tls,
    })
}
