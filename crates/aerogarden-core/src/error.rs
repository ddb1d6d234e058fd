// ── Core error types ──
//
// User-facing errors from aerogarden-core. Consumers never see raw HTTP
// statuses or JSON parse failures; the `From<aerogarden_api::Error>` impl
// translates transport-layer errors into domain variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach garden service at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Garden service timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    // ── Service errors ───────────────────────────────────────────────
    /// The status query answered with a `Message` object.
    #[error("{message}")]
    Application { message: String },

    /// The config update answered with a code other than 1.
    #[error("{message}")]
    ToggleRejected { message: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Garden not found: {key}")]
    GardenNotFound { key: String },

    #[error("Invalid response from garden service: {message}")]
    InvalidResponse { message: String },

    #[error("Could not decode garden data: {message}")]
    Decode { message: String },

    // ── Registry errors ──────────────────────────────────────────────
    #[error("Account {username} is already configured")]
    AlreadyConfigured { username: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// The service could not be reached or answered garbage.
    pub fn is_connection(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed { .. } | Self::Timeout { .. } | Self::InvalidResponse { .. }
        )
    }

    /// The credentials were refused.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::AuthenticationFailed { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<aerogarden_api::Error> for CoreError {
    fn from(err: aerogarden_api::Error) -> Self {
        use aerogarden_api::Error as Api;

        match err {
            Api::Authentication { message } => CoreError::AuthenticationFailed { message },
            Api::NotLoggedIn => CoreError::AuthenticationFailed {
                message: "No active session -- login required".into(),
            },
            Api::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                }
            }
            Api::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            Api::HttpStatus { status, body } => CoreError::ConnectionFailed {
                url: String::new(),
                reason: if body.is_empty() {
                    format!("HTTP {status}")
                } else {
                    format!("HTTP {status}: {body}")
                },
            },
            Api::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            Api::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            Api::Deserialization { message, body: _ } => CoreError::InvalidResponse { message },
            Api::Encode(e) => CoreError::Internal(format!("failed to encode request: {e}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_map_to_domain_classes() {
        let auth: CoreError = aerogarden_api::Error::Authentication {
            message: "Login API call returned 0: Unknown error".into(),
        }
        .into();
        assert!(auth.is_auth());
        assert!(!auth.is_connection());

        let status: CoreError = aerogarden_api::Error::HttpStatus {
            status: 503,
            body: String::new(),
        }
        .into();
        assert!(status.is_connection());
        assert!(status.to_string().ends_with("HTTP 503"));

        let decode: CoreError = aerogarden_api::Error::Deserialization {
            message: "expected value".into(),
            body: "<html>".into(),
        }
        .into();
        assert!(decode.is_connection());
    }

    #[test]
    fn service_messages_display_verbatim() {
        let err = CoreError::ToggleRejected {
            message: "Didn't get code 1 from update API call: x".into(),
        };
        assert_eq!(err.to_string(), "Didn't get code 1 from update API call: x");
        assert!(!err.is_connection());
    }
}
