//! Shared configuration for aerogarden tools.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! and translation to `aerogarden_core::ControllerConfig`. The CLI adds
//! flag-aware wrappers on top.

use std::collections::BTreeMap;
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
use tracing::debug;

use aerogarden_api::DEFAULT_HOST;
use aerogarden_core::{ControllerConfig, DEFAULT_POLL_INTERVAL, DEFAULT_THROTTLE, TlsVerification};

/// Service name for keyring entries.
pub const KEYRING_SERVICE: &str = "aerogarden";

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "AEROGARDEN_";

/// Password override read before the keyring.
pub const PASSWORD_ENV: &str = "AEROGARDEN_PASSWORD";

/// Username fallback when a profile has none.
pub const USERNAME_ENV: &str = "AEROGARDEN_USERNAME";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{name}' not found")]
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
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named account profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Name of the profile to use: the override, else `default_profile`,
    /// else `"default"`.
    pub fn active_profile_name(&self, requested: Option<&str>) -> String {
        requested
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into())
    }

    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::ProfileNotFound { name: name.into() })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    10
}

/// A named account profile.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Profile {
    /// Account e-mail address.
    pub username: Option<String>,

    /// Password (plaintext, prefer keyring or env var).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Service base URL. Defaults to the production host.
    pub host: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override per-request timeout (seconds).
    pub timeout: Option<u64>,

    /// Throttled refresh window (seconds).
    pub throttle_secs: Option<u64>,

    /// Background poll period (seconds). 0 disables polling.
    pub poll_interval_secs: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "aerogarden", "aerogarden").map_or_else(
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
    p.push("aerogarden");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from a specific file, layered as defaults → TOML → env.
///
/// Env keys use `__` as the nesting separator, e.g.
/// `AEROGARDEN_DEFAULTS__OUTPUT=json`. A missing file is not an error.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist or is broken.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(&config_path(), cfg)
}

pub fn save_config_to(path: &Path, cfg: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Keyring account name for a profile's password.
pub fn keyring_account(profile_name: &str) -> String {
    format!("{profile_name}/password")
}

/// Store a profile's password in the system keyring.
pub fn store_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &keyring_account(profile_name))?;
    entry.set_password(password)?;
    Ok(())
}

fn keyring_password(profile_name: &str) -> Option<String> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &keyring_account(profile_name)).ok()?;
    entry.get_password().ok()
}

/// Resolve the account username: profile, then `AEROGARDEN_USERNAME`.
pub fn resolve_username(profile: &Profile, profile_name: &str) -> Result<String, ConfigError> {
    resolve_username_with(profile, profile_name, |name| std::env::var(name).ok())
}

/// Resolve the password from the credential chain.
///
/// Order: the profile's `password_env` variable, `AEROGARDEN_PASSWORD`,
/// the system keyring, then the plaintext `password` field.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    resolve_password_with(
        profile,
        profile_name,
        |name| std::env::var(name).ok(),
        keyring_password,
    )
}

/// [`resolve_username`] with an explicit environment lookup.
pub fn resolve_username_with(
    profile: &Profile,
    profile_name: &str,
    env: impl Fn(&str) -> Option<String>,
) -> Result<String, ConfigError> {
    profile
        .username
        .clone()
        .or_else(|| env(USERNAME_ENV))
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })
}

/// [`resolve_password`] with explicit environment and keyring lookups.
pub fn resolve_password_with(
    profile: &Profile,
    profile_name: &str,
    env: impl Fn(&str) -> Option<String>,
    keyring: impl Fn(&str) -> Option<String>,
) -> Result<SecretString, ConfigError> {
    // 1. Profile's password_env → env var lookup
    if let Some(pw) = profile.password_env.as_deref().and_then(&env) {
        return Ok(SecretString::from(pw));
    }

    // 2. Global env var
    if let Some(pw) = env(PASSWORD_ENV) {
        return Ok(SecretString::from(pw));
    }

    // 3. System keyring
    if let Some(pw) = keyring(profile_name) {
        return Ok(SecretString::from(pw));
    }

    // 4. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

// ── Translation to core config ──────────────────────────────────────

/// Parse a host string, falling back to the production host.
pub fn parse_host(host: Option<&str>) -> Result<url::Url, ConfigError> {
    let raw = host.unwrap_or(DEFAULT_HOST);
    raw.parse().map_err(|_| ConfigError::Validation {
        field: "host".into(),
        reason: format!("invalid URL: {raw}"),
    })
}

/// TLS mode from a profile: `insecure` wins over `ca_cert`.
pub fn profile_tls(profile: &Profile, defaults: &Defaults) -> TlsVerification {
    if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    }
}

/// Build a `ControllerConfig` from a profile with no CLI flag overrides.
pub fn profile_to_controller_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<ControllerConfig, ConfigError> {
    let username = resolve_username(profile, profile_name)?;
    let password = resolve_password(profile, profile_name)?;
    build_controller_config(profile, defaults, username, password)
}

/// Assemble a `ControllerConfig` from a profile and resolved credentials.
pub fn build_controller_config(
    profile: &Profile,
    defaults: &Defaults,
    username: String,
    password: SecretString,
) -> Result<ControllerConfig, ConfigError> {
    let host = parse_host(profile.host.as_deref())?;

    Ok(ControllerConfig {
        host,
        username,
        password,
        tls: profile_tls(profile, defaults),
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
        throttle: profile
            .throttle_secs
            .map_or(DEFAULT_THROTTLE, Duration::from_secs),
        poll_interval: profile
            .poll_interval_secs
            .map_or(DEFAULT_POLL_INTERVAL, Duration::from_secs),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert_eq!(cfg.defaults.timeout, 10);
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn profiles_round_trip_through_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.profiles.insert(
            "home".into(),
            Profile {
                username: Some("grower@example.com".into()),
                password_env: Some("GARDEN_PW".into()),
                poll_interval_secs: Some(60),
                ..Profile::default()
            },
        );
        save_config_to(&path, &cfg).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.profiles, cfg.profiles);
        assert_eq!(loaded.active_profile_name(Some("home")), "home");
        assert!(loaded.profile("home").is_ok());
        assert!(matches!(
            loaded.profile("work"),
            Err(ConfigError::ProfileNotFound { .. })
        ));
    }

    #[test]
    fn hand_written_toml_is_understood() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
default_profile = "kitchen"

[defaults]
output = "json"

[profiles.kitchen]
username = "grower@example.com"
password = "plain"
host = "https://staging.example.com:8443"
insecure = true
throttle_secs = 5
"#,
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.active_profile_name(None), "kitchen");
        assert_eq!(cfg.defaults.output, "json");
        assert_eq!(cfg.defaults.color, "auto");

        let profile = cfg.profile("kitchen").unwrap();
        let controller = build_controller_config(
            profile,
            &cfg.defaults,
            "grower@example.com".into(),
            SecretString::from("plain".to_owned()),
        )
        .unwrap();
        assert_eq!(controller.host.as_str(), "https://staging.example.com:8443/");
        assert_eq!(controller.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(controller.throttle, Duration::from_secs(5));
        assert_eq!(controller.poll_interval, DEFAULT_POLL_INTERVAL);
        assert_eq!(controller.timeout, Duration::from_secs(10));
    }

    #[test]
    fn password_chain_prefers_profile_env_then_global_env() {
        let profile = Profile {
            password: Some("plain".into()),
            password_env: Some("GARDEN_PW".into()),
            ..Profile::default()
        };
        let env = |name: &str| match name {
            "GARDEN_PW" => Some("from-profile-env".to_owned()),
            PASSWORD_ENV => Some("from-global-env".to_owned()),
            _ => None,
        };
        let pw = resolve_password_with(&profile, "home", env, |_| Some("kr".into())).unwrap();
        assert_eq!(pw.expose_secret(), "from-profile-env");

        let env = |name: &str| (name == PASSWORD_ENV).then(|| "from-global-env".to_owned());
        let pw = resolve_password_with(&profile, "home", env, |_| Some("kr".into())).unwrap();
        assert_eq!(pw.expose_secret(), "from-global-env");
    }

    #[test]
    fn password_chain_prefers_keyring_over_plaintext() {
        let profile = Profile {
            password: Some("plain".into()),
            ..Profile::default()
        };
        let pw = resolve_password_with(&profile, "home", no_env, |name| {
            (name == "home").then(|| "from-keyring".to_owned())
        })
        .unwrap();
        assert_eq!(pw.expose_secret(), "from-keyring");

        let pw = resolve_password_with(&profile, "home", no_env, |_| None).unwrap();
        assert_eq!(pw.expose_secret(), "plain");
    }

    #[test]
    fn no_password_anywhere_is_an_error() {
        let result = resolve_password_with(&Profile::default(), "home", no_env, |_| None);
        assert!(matches!(result, Err(ConfigError::NoCredentials { .. })));
    }

    #[test]
    fn username_falls_back_to_env() {
        let profile = Profile::default();
        let env = |name: &str| (name == USERNAME_ENV).then(|| "env@example.com".to_owned());
        assert_eq!(
            resolve_username_with(&profile, "home", env).unwrap(),
            "env@example.com"
        );
        assert!(resolve_username_with(&profile, "home", no_env).is_err());
    }

    #[test]
    fn bad_host_is_a_validation_error() {
        let result = parse_host(Some("not a url"));
        assert!(matches!(result, Err(ConfigError::Validation { .. })));
        assert_eq!(
            parse_host(None).unwrap().as_str(),
            "https://app3.aerogarden.com:8443/"
        );
    }

    #[test]
    fn ca_cert_is_used_when_not_insecure() {
        let profile = Profile {
            ca_cert: Some(PathBuf::from("/etc/ssl/garden.pem")),
            ..Profile::default()
        };
        assert_eq!(
            profile_tls(&profile, &Defaults::default()),
            TlsVerification::CustomCa(PathBuf::from("/etc/ssl/garden.pem"))
        );
    }
}
