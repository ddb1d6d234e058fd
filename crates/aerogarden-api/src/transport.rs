// Shared transport configuration for building reqwest::Client instances.
//
// Every garden endpoint goes through one client built here, so the
// timeout, user agent, and TLS settings are decided in a single place.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::Error;

/// Production host of the garden cloud service.
pub const DEFAULT_HOST: &str = "https://app3.aerogarden.com:8443";

/// Fixed per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// `User-Agent` sent with every request.
pub const CLIENT_USER_AGENT: &str = concat!("aerogarden-rs/", env!("CARGO_PKG_VERSION"));

/// `Content-Type` sent with every request. The cloud service expects the
/// form content type even on the JSON-bodied config update.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// TLS verification mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsMode {
    /// Use the bundled/system certificate store.
    #[default]
    System,
    /// Use a custom CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (for intercepting proxies and test rigs).
    DangerAcceptInvalid,
}

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::System,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(CLIENT_USER_AGENT);

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path)
                    .map_err(|e| Error::Tls(format!("failed to read CA cert: {e}")))?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }

    /// Same config with a different timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_transport_uses_fixed_timeout() {
        let cfg = TransportConfig::default();
        assert_eq!(cfg.timeout, Duration::from_secs(10));
        assert_eq!(cfg.tls, TlsMode::System);
    }

    #[test]
    fn missing_ca_file_is_a_tls_error() {
        let cfg = TransportConfig {
            tls: TlsMode::CustomCa(PathBuf::from("/nonexistent/aerogarden-ca.pem")),
            timeout: DEFAULT_TIMEOUT,
        };
        let err = cfg.build_client().err();
        assert!(matches!(err, Some(Error::Tls(_))), "got: {err:?}");
    }
}
