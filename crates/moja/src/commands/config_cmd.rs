//! Config subcommand handlers.

use std::fmt::Write as _;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, InitArgs};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config for display, masking the plaintext token.
fn format_config_redacted(cfg: &Config) -> String {
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "probe_timeout_ms = {}", cfg.defaults.probe_timeout_ms);
    let _ = writeln!(out, "insecure = {}", cfg.defaults.insecure);

    let mut names: Vec<_> = cfg.profiles.iter().collect();
    names.sort_by(|a, b| a.0.cmp(b.0));
    for (name, p) in names {
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "recorder_url = \"{}\"", p.recorder_url);
        if let Some(ref relay) = p.relay_url {
            let _ = writeln!(out, "relay_url = \"{relay}\"");
        }
        let _ = writeln!(out, "variant = \"{}\"", p.variant);
        if p.token.is_some() {
            let _ = writeln!(out, "token = \"****\"");
        }
        if let Some(ref env) = p.token_env {
            let _ = writeln!(out, "token_env = \"{env}\"");
        }
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
        if let Some(ms) = p.probe_timeout_ms {
            let _ = writeln!(out, "probe_timeout_ms = {ms}");
        }
    }

    out
}

fn init(args: InitArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let recorder_url = moja_config::normalize_origin("recorder_url", &args.recorder_url)?;
    let relay_url = args
        .relay_url
        .as_deref()
        .map(|raw| moja_config::normalize_origin("relay_url", raw))
        .transpose()?;

    if matches!(args.variant, crate::cli::VariantArg::Relay) && relay_url.is_none() {
        return Err(CliError::Validation {
            field: "--relay-url".into(),
            reason: "required with --variant relay".into(),
        });
    }

    // Refuse to rewrite a file we could not read.
    let mut cfg = config::load_config()?;

    if args.keyring {
        let token = global.token.as_deref().ok_or_else(|| CliError::Validation {
            field: "--keyring".into(),
            reason: "pass the token to store with --token or MOJA_TOKEN".into(),
        })?;
        moja_config::store_token(&args.name, token)?;
        if !global.quiet {
            eprintln!("Token for '{}' stored in the system keyring", args.name);
        }
    }

    let mut profile = Profile::new(recorder_url);
    profile.relay_url = relay_url;
    profile.variant = moja_core::UpstreamVariant::from(args.variant).to_string();
    profile.token_env = args.token_env;
    cfg.profiles.insert(args.name.clone(), profile);
    if args.default || cfg.profiles.len() == 1 {
        cfg.default_profile = Some(args.name.clone());
    }

    let path = config::save_config(&cfg)?;
    if !global.quiet {
        eprintln!("Profile '{}' written to {}", args.name, path.display());
    }
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            output::print_output(&format_config_redacted(&cfg), global.quiet);
            Ok(())
        }

        ConfigCommand::Init(init_args) => init(init_args, global),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plaintext_token_is_masked() {
        let mut cfg = Config::default();
        let mut profile = Profile::new("https://recorder.example.com/");
        profile.token = Some("super-secret".into());
        profile.token_env = Some("MOJA_HOME_TOKEN".into());
        cfg.profiles.insert("home".into(), profile);

        let shown = format_config_redacted(&cfg);
        assert!(shown.contains("token = \"****\""));
        assert!(shown.contains("token_env = \"MOJA_HOME_TOKEN\""));
        assert!(!shown.contains("super-secret"));
    }
}
