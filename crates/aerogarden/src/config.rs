//! CLI configuration -- thin wrapper around `aerogarden_config` shared types.
//!
//! Re-exports the shared types and adds resolution that respects
//! `GlobalOpts` flag overrides (--host, --username, --insecure, --timeout).

use aerogarden_core::ControllerConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use aerogarden_config::{
    Config, Profile, config_path, load_config_or_default, save_config, store_password,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.active_profile_name(global.profile.as_deref())
}

/// Comma-separated profile names for help text.
pub fn available_profiles(config: &Config) -> String {
    if config.profiles.is_empty() {
        "(none)".into()
    } else {
        config.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

/// Copy of `profile` with CLI flags applied on top.
pub fn apply_overrides(profile: &Profile, global: &GlobalOpts) -> Profile {
    let mut merged = profile.clone();
    if let Some(ref host) = global.host {
        merged.host = Some(host.clone());
    }
    if let Some(ref username) = global.username {
        merged.username = Some(username.clone());
    }
    if global.insecure {
        merged.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        merged.timeout = Some(timeout);
    }
    merged
}

/// Translate a `Profile` + global flags into a `ControllerConfig`.
pub fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    config: &Config,
    global: &GlobalOpts,
) -> Result<ControllerConfig, CliError> {
    let merged = apply_overrides(profile, global);
    Ok(aerogarden_config::profile_to_controller_config(
        &merged,
        profile_name,
        &config.defaults,
    )?)
}

/// Build the `ControllerConfig` for the active profile.
///
/// Without a stored profile, the account comes from `--username` (or
/// `AEROGARDEN_USERNAME`) and the password from the usual chain.
pub fn controller_config(global: &GlobalOpts) -> Result<ControllerConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    if let Some(profile) = cfg.profiles.get(&profile_name) {
        return resolve_profile(profile, &profile_name, &cfg, global);
    }

    if global.profile.is_some() {
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: available_profiles(&cfg),
        });
    }

    if global.username.is_none() {
        return Err(CliError::NoConfig {
            path: config_path().display().to_string(),
        });
    }

    resolve_profile(&Profile::default(), &profile_name, &cfg, global)
}

/// One `(profile name, ControllerConfig)` per stored profile.
pub fn all_controller_configs(
    global: &GlobalOpts,
) -> Result<Vec<(String, ControllerConfig)>, CliError> {
    let cfg = load_config_or_default();
    if cfg.profiles.is_empty() {
        return Err(CliError::NoConfig {
            path: config_path().display().to_string(),
        });
    }
    cfg.profiles
        .iter()
        .map(|(name, profile)| Ok((name.clone(), resolve_profile(profile, name, &cfg, global)?)))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    #[test]
    fn flags_override_profile_values() {
        let cli = Cli::try_parse_from([
            "aerogarden",
            "--host",
            "http://localhost:9",
            "-u",
            "other@example.com",
            "-k",
            "--timeout",
            "3",
            "login",
        ])
        .unwrap();
        let profile = Profile {
            username: Some("grower@example.com".into()),
            host: Some("https://example.com".into()),
            poll_interval_secs: Some(60),
            ..Profile::default()
        };

        let merged = apply_overrides(&profile, &cli.global);
        assert_eq!(merged.username.as_deref(), Some("other@example.com"));
        assert_eq!(merged.host.as_deref(), Some("http://localhost:9"));
        assert_eq!(merged.insecure, Some(true));
        assert_eq!(merged.timeout, Some(3));
        assert_eq!(merged.poll_interval_secs, Some(60));
    }

    #[test]
    fn available_profiles_lists_names() {
        let mut cfg = Config::default();
        assert_eq!(available_profiles(&cfg), "(none)");
        cfg.profiles.insert("home".into(), Profile::default());
        cfg.profiles.insert("cabin".into(), Profile::default());
        assert_eq!(available_profiles(&cfg), "cabin, home");
    }
}
