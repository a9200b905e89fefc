//! CLI configuration: thin wrapper around `moja_config` shared types.
//!
//! Re-exports the shared types and adds resolution that respects
//! `GlobalOpts` flag overrides (--recorder, --token, etc.).

use std::time::Duration;

use secrecy::SecretString;

use moja_api::TlsMode;
use moja_core::DeviceApiConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use moja_config::{Config, Profile, config_path, load_config, save_config};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build a `DeviceApiConfig` from the config file, active profile, and
/// CLI overrides.
///
/// Without a matching profile, `--recorder` alone is enough.
pub fn resolve_api_config(
    global: &GlobalOpts,
    config: &Config,
) -> Result<DeviceApiConfig, CliError> {
    let profile_name = active_profile_name(global, config);

    let profile = match (config.profiles.get(&profile_name), &global.recorder) {
        (Some(profile), _) => profile.clone(),
        (None, Some(recorder)) => Profile::new(recorder.clone()),
        (None, None) if global.profile.is_some() => {
            let mut names: Vec<_> = config.profiles.keys().cloned().collect();
            names.sort();
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: if names.is_empty() {
                    "(none)".into()
                } else {
                    names.join(", ")
                },
            });
        }
        (None, None) => {
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
    };

    let profile = apply_overrides(profile, global);
    let mut api = moja_config::profile_to_api_config(&profile, &config.defaults)?;

    // Device-local origins only; the recorder and relay keep verifying.
    if global.insecure {
        api.local_tls = TlsMode::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        api.transport = api.transport.with_timeout(Duration::from_secs(secs));
    }
    if let Some(ms) = global.probe_timeout_ms {
        api.probe_timeout = Duration::from_millis(ms);
    }

    Ok(api)
}

/// Flag values replace the corresponding profile fields.
fn apply_overrides(mut profile: Profile, global: &GlobalOpts) -> Profile {
    if let Some(ref recorder) = global.recorder {
        profile.recorder_url.clone_from(recorder);
    }
    if let Some(ref relay) = global.relay {
        profile.relay_url = Some(relay.clone());
    }
    if let Some(variant) = global.variant {
        profile.variant = moja_core::UpstreamVariant::from(variant).to_string();
    }
    profile
}

/// Resolve the bearer token: `--token` / `MOJA_TOKEN` first, then the
/// profile's chain (token_env, keyring, plaintext).
pub fn resolve_token(global: &GlobalOpts, config: &Config) -> Result<SecretString, CliError> {
    if let Some(ref token) = global.token {
        return Ok(SecretString::from(token.clone()));
    }

    let profile_name = active_profile_name(global, config);
    let profile = config
        .profiles
        .get(&profile_name)
        .ok_or_else(|| CliError::NoCredentials {
            profile: profile_name.clone(),
        })?;
    Ok(moja_config::resolve_token(profile, &profile_name)?)
}
