//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use aerogarden_config::ConfigError;
use aerogarden_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the garden service at {url}")]
    #[diagnostic(
        code(aerogarden::connection_failed),
        help(
            "Check your network connection and the service host.\n\
             URL: {url}\n\
             Try: aerogarden login -v"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(aerogarden::timeout),
        help("Increase the timeout with --timeout or try again later.")
    )]
    Timeout { seconds: u64 },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(aerogarden::auth_failed),
        help(
            "Verify the e-mail address and password of your AeroGarden account.\n\
             Run: aerogarden config set-password"
        )
    )]
    AuthFailed { message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(aerogarden::no_credentials),
        help(
            "Configure credentials with: aerogarden config init\n\
             Or set AEROGARDEN_USERNAME and AEROGARDEN_PASSWORD."
        )
    )]
    NoCredentials { profile: String },

    // ── Gardens ──────────────────────────────────────────────────────
    #[error("Garden '{key}' not found")]
    #[diagnostic(
        code(aerogarden::not_found),
        help("Run: aerogarden gardens list to see available gardens")
    )]
    GardenNotFound { key: String },

    #[error("Garden '{key}' has no field '{field}'")]
    #[diagnostic(
        code(aerogarden::field_not_found),
        help("Run: aerogarden gardens show {key} to see its fields")
    )]
    FieldNotFound { key: String, field: String },

    #[error("Account {username} is already configured")]
    #[diagnostic(code(aerogarden::conflict))]
    Conflict { username: String },

    // ── Service ──────────────────────────────────────────────────────
    #[error("Garden service error: {message}")]
    #[diagnostic(code(aerogarden::service))]
    Service { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(aerogarden::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(aerogarden::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: aerogarden config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(aerogarden::no_config),
        help(
            "Create one with: aerogarden config init\n\
             Expected at: {path}\n\
             Or pass --username and set AEROGARDEN_PASSWORD."
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(aerogarden::config))]
    Config(Box<figment::Error>),

    #[error("Keyring error: {0}")]
    #[diagnostic(
        code(aerogarden::keyring),
        help("Store the password in the profile or AEROGARDEN_PASSWORD instead.")
    )]
    Keyring(String),

    #[error("Internal error: {0}")]
    #[diagnostic(code(aerogarden::internal))]
    Internal(String),

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::GardenNotFound { .. } | Self::FieldNotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },
            CoreError::InvalidResponse { message } => CliError::ConnectionFailed {
                url: "(unreadable reply)".into(),
                source: message.into(),
            },
            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },
            CoreError::GardenNotFound { key } => CliError::GardenNotFound { key },
            CoreError::AlreadyConfigured { username } => CliError::Conflict { username },
            CoreError::Application { message }
            | CoreError::ToggleRejected { message }
            | CoreError::Decode { message } => CliError::Service { message },
            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::ProfileNotFound { name } => CliError::ProfileNotFound {
                name,
                available: "(none)".into(),
            },
            ConfigError::Keyring(e) => CliError::Keyring(e.to_string()),
            ConfigError::Serialization(e) => CliError::Internal(e.to_string()),
            ConfigError::Figment(e) => CliError::Config(e),
            ConfigError::Io(e) => CliError::Io(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_exit_codes() {
        let auth: CliError = CoreError::AuthenticationFailed {
            message: "Login API call returned 0: bad password".into(),
        }
        .into();
        assert_eq!(auth.exit_code(), exit_code::AUTH);
        assert!(auth.to_string().contains("bad password"));

        let missing: CliError = CoreError::GardenNotFound { key: "nope".into() }.into();
        assert_eq!(missing.exit_code(), exit_code::NOT_FOUND);

        let offline: CliError = CoreError::ConnectionFailed {
            url: "https://example.invalid".into(),
            reason: "HTTP 503".into(),
        }
        .into();
        assert_eq!(offline.exit_code(), exit_code::CONNECTION);

        let slow: CliError = CoreError::Timeout { timeout_secs: 10 }.into();
        assert_eq!(slow.exit_code(), exit_code::TIMEOUT);

        let rejected: CliError = CoreError::ToggleRejected {
            message: "Didn't get code 1 from update API call: busy".into(),
        }
        .into();
        assert_eq!(rejected.exit_code(), exit_code::GENERAL);
    }

    #[test]
    fn missing_credentials_are_auth_errors() {
        let err: CliError = ConfigError::NoCredentials {
            profile: "home".into(),
        }
        .into();
        assert_eq!(err.exit_code(), exit_code::AUTH);
    }
}
