// ── Runtime connection configuration ──
//
// Describes how to reach the garden service for one account. Carries
// credentials and tuning, never touches disk: the CLI (or any other
// host adapter) builds a `ControllerConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use aerogarden_api::{Credentials, DEFAULT_HOST, DEFAULT_TIMEOUT, TlsMode, TransportConfig};
use secrecy::SecretString;
use url::Url;

/// Minimum spacing between throttled refreshes.
pub const DEFAULT_THROTTLE: Duration = Duration::from_secs(30);

/// Background poll period.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict). The service has a public certificate.
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification.
    DangerAcceptInvalid,
}

/// Configuration for one garden account.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Service root (e.g. `https://app3.aerogarden.com:8443`).
    pub host: Url,
    /// Account e-mail address.
    pub username: String,
    pub password: SecretString,
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Window for [`Controller::throttled_update`](crate::Controller::throttled_update).
    pub throttle: Duration,
    /// Background poll period. Zero disables the poller.
    pub poll_interval: Duration,
}

impl ControllerConfig {
    /// Config for the production host with default tuning.
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            host: default_host(),
            username: username.into(),
            password,
            tls: TlsVerification::default(),
            timeout: DEFAULT_TIMEOUT,
            throttle: DEFAULT_THROTTLE,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Same config pointed at another host.
    pub fn with_host(mut self, host: Url) -> Self {
        self.host = host;
        self
    }

    pub(crate) fn credentials(&self) -> Credentials {
        Credentials::new(self.username.clone(), self.password.clone())
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            timeout: self.timeout,
        }
    }
}

/// The production service URL.
pub fn default_host() -> Url {
    // Constant input; cannot fail.
    Url::parse(DEFAULT_HOST).expect("default host is a valid URL")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_service_expectations() {
        let cfg = ControllerConfig::new("grower@example.com", SecretString::from("pw".to_owned()));
        assert_eq!(cfg.host.as_str(), "https://app3.aerogarden.com:8443/");
        assert_eq!(cfg.timeout, Duration::from_secs(10));
        assert_eq!(cfg.throttle, Duration::from_secs(30));
        assert_eq!(cfg.poll_interval, Duration::from_secs(30));
        assert_eq!(cfg.transport().tls, TlsMode::System);
    }

    #[test]
    fn insecure_tls_maps_to_transport() {
        let mut cfg = ControllerConfig::new("a@b.c", SecretString::from("pw".to_owned()));
        cfg.tls = TlsVerification::DangerAcceptInvalid;
        assert_eq!(cfg.transport().tls, TlsMode::DangerAcceptInvalid);
    }
}
