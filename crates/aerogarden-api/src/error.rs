use thiserror::Error;

/// Top-level error type for the `aerogarden-api` crate.
///
/// Covers every failure mode of the garden cloud API: authentication,
/// transport, HTTP status, and payload decoding. `aerogarden-core` maps
/// these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login rejected (`code <= 0`, missing code, or unreadable login reply).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// An endpoint that needs the user identifier was called before login.
    #[error("No active session -- login required")]
    NotLoggedIn,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// Request body could not be encoded.
    #[error("Failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),
}

impl Error {
    /// Returns `true` for credential or session failures. A fresh login
    /// is the only thing that can resolve these.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Authentication { .. } | Self::NotLoggedIn)
    }

    /// Returns `true` for failures of the network exchange itself:
    /// timeouts, transport errors, non-2xx replies, and undecodable bodies.
    pub fn is_connection(&self) -> bool {
        matches!(
            self,
            Self::Transport(_)
                | Self::Timeout { .. }
                | Self::HttpStatus { .. }
                | Self::Tls(_)
                | Self::Deserialization { .. }
        )
    }

    /// Returns `true` if this is a transient error a caller may retry.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } => true,
            Self::HttpStatus { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_and_connection_classes_are_disjoint() {
        let auth = Error::Authentication {
            message: "Login API call returned 0".into(),
        };
        assert!(auth.is_auth());
        assert!(!auth.is_connection());

        let status = Error::HttpStatus {
            status: 502,
            body: String::new(),
        };
        assert!(status.is_connection());
        assert!(!status.is_auth());
        assert!(status.is_transient());
    }

    #[test]
    fn client_errors_are_not_transient() {
        let status = Error::HttpStatus {
            status: 404,
            body: "not found".into(),
        };
        assert!(!status.is_transient());
        assert!(!Error::NotLoggedIn.is_transient());
    }
}
