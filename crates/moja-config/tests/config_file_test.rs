#![allow(clippy::unwrap_used)]
// Loading and saving config files on disk.

use std::time::Duration;

use pretty_assertions::assert_eq;

use moja_api::{TlsMode, UpstreamVariant};
use moja_config::{Config, ConfigError, Profile, load_config_from, profile_to_api_config, save_config_to};

const SAMPLE: &str = r#"
default_profile = "home"

[defaults]
output = "json"
probe_timeout_ms = 750

[profiles.home]
recorder_url = "https://recorder.example.com"
token_env = "MOJA_HOME_TOKEN"

[profiles.cabin]
recorder_url = "https://recorder.example.com/"
relay_url = "https://relay.example.com"
variant = "relay"
insecure = true
timeout = 20
"#;

#[test]
fn test_load_profiles_and_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, SAMPLE).unwrap();

    let config = load_config_from(&path).unwrap();

    assert_eq!(config.default_profile.as_deref(), Some("home"));
    assert_eq!(config.defaults.output, "json");
    assert_eq!(config.defaults.probe_timeout_ms, 750);
    assert_eq!(config.defaults.color, "auto");
    assert_eq!(config.profiles.len(), 2);

    let home = config.profile("home").unwrap();
    assert_eq!(home.variant, "recorder");
    assert_eq!(home.token_env.as_deref(), Some("MOJA_HOME_TOKEN"));
}

#[test]
fn test_missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_config_from(&dir.path().join("absent.toml")).unwrap();

    assert_eq!(config.default_profile.as_deref(), Some("default"));
    assert_eq!(config.defaults.probe_timeout_ms, 500);
    assert!(config.profiles.is_empty());
}

#[test]
fn test_unparseable_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[defaults]\nprobe_timeout_ms = \"fast\"\n").unwrap();

    assert!(matches!(load_config_from(&path), Err(ConfigError::Figment(_))));
}

#[test]
fn test_insecure_profile_keeps_cloud_verification() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, SAMPLE).unwrap();
    let config = load_config_from(&path).unwrap();

    let cabin = profile_to_api_config(config.profile("cabin").unwrap(), &config.defaults).unwrap();
    assert_eq!(cabin.local_tls, TlsMode::DangerAcceptInvalid);
    assert_eq!(cabin.transport.tls, TlsMode::System);
}

#[test]
fn test_unknown_profile_is_reported() {
    let config = Config::default();
    assert!(matches!(
        config.profile("nowhere"),
        Err(ConfigError::ProfileNotFound { .. })
    ));
}

#[test]
fn test_profiles_translate_to_api_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, SAMPLE).unwrap();
    let config = load_config_from(&path).unwrap();

    let home = profile_to_api_config(config.profile("home").unwrap(), &config.defaults).unwrap();
    assert_eq!(home.recorder_url, "https://recorder.example.com/");
    assert_eq!(home.variant, UpstreamVariant::Recorder);
    assert_eq!(home.probe_timeout, Duration::from_millis(750));
    assert_eq!(home.transport.timeout, None);

    let cabin = profile_to_api_config(config.profile("cabin").unwrap(), &config.defaults).unwrap();
    assert_eq!(cabin.variant, UpstreamVariant::Relay);
    assert_eq!(cabin.relay_url.as_deref(), Some("https://relay.example.com/"));
    assert_eq!(cabin.transport.timeout, Some(Duration::from_secs(20)));
}

#[test]
fn test_saved_config_loads_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut config = Config::default();
    config.default_profile = Some("lab".into());
    let mut profile = Profile::new("https://recorder.lab.example.com/");
    profile.token_env = Some("LAB_TOKEN".into());
    config.profiles.insert("lab".into(), profile);

    save_config_to(&config, &path).unwrap();
    let loaded = load_config_from(&path).unwrap();

    assert_eq!(loaded.default_profile.as_deref(), Some("lab"));
    let lab = loaded.profile("lab").unwrap();
    assert_eq!(lab.recorder_url, "https://recorder.lab.example.com/");
    assert_eq!(lab.token_env.as_deref(), Some("LAB_TOKEN"));
    assert_eq!(lab.token, None);
}
