// Garden cloud HTTP client
//
// Wraps `reqwest::Client` with the service's URL layout, the fixed form
// content type, and the session identifier handed out at login. The
// endpoint calls live in `session.rs` and `devices.rs` as inherent
// methods so this module stays focused on transport mechanics.

use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::preview;
use crate::transport::{CLIENT_USER_AGENT, FORM_CONTENT_TYPE, TransportConfig};

/// The three endpoints the service exposes to account holders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Login,
    QueryUserDevice,
    UpdateDeviceConfig,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/api/Admin/Login",
            Self::QueryUserDevice => "/api/CustomData/QueryUserDevice",
            Self::UpdateDeviceConfig => "/api/Custom/UpdateDeviceConfig",
        }
    }
}

/// Session state held by the client.
///
/// `user_id` is present only after a successful login. `error` carries the
/// most recent failure message, already scrubbed of the password.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub user_id: Option<String>,
    pub error: Option<String>,
}

/// Raw HTTP client for the garden cloud service.
///
/// Every endpoint is a form-typed POST returning JSON. Methods return the
/// decoded payload; classifying it is left to the callers.
pub struct GardenClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
    session: RwLock<Session>,
}

impl GardenClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// `base_url` is the service root, e.g. `https://app3.aerogarden.com:8443`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            timeout: transport.timeout,
            session: RwLock::new(Session::default()),
        })
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            timeout: TransportConfig::default().timeout,
            session: RwLock::new(Session::default()),
        }
    }

    /// The service base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    // ── Session state ────────────────────────────────────────────────

    /// Snapshot of the session state.
    pub fn session(&self) -> Session {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// User identifier from the last successful login.
    pub fn user_id(&self) -> Option<String> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .user_id
            .clone()
    }

    /// `true` once a login has produced a user identifier.
    pub fn is_valid_login(&self) -> bool {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .user_id
            .is_some()
    }

    /// Most recent failure message, if any.
    pub fn error(&self) -> Option<String> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .error
            .clone()
    }

    /// Remember a failure message. Callers redact before recording.
    pub fn record_error(&self, message: impl Into<String>) {
        self.session
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .error = Some(message.into());
    }

    pub(crate) fn set_user_id(&self, user_id: String) {
        trace!("storing session user id");
        self.session
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .user_id = Some(user_id);
    }

    pub(crate) fn clear_user_id(&self) {
        self.session
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .user_id = None;
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build the full URL for an endpoint: `{base}{path}`.
    pub fn endpoint_url(&self, endpoint: Endpoint) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}{}", endpoint.path()))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// POST `body` to an endpoint and decode the JSON reply.
    ///
    /// The form content type is sent even when `body` is JSON; the service
    /// rejects anything else.
    pub(crate) async fn post(&self, endpoint: Endpoint, body: String) -> Result<Value, Error> {
        let url = self.endpoint_url(endpoint)?;
        debug!("POST {}", url);

        let resp = self
            .http
            .post(url)
            .timeout(self.timeout)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .body(body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: preview(&body),
            });
        }

        let body = resp.text().await.map_err(|e| self.classify(e))?;
        trace!(bytes = body.len(), "reply received");

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body,
        })
    }

    fn classify(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            Error::Transport(err)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> GardenClient {
        GardenClient::with_client(reqwest::Client::new(), Url::parse(base).unwrap())
    }

    #[test]
    fn endpoint_urls_join_without_double_slash() {
        let c = client("https://app3.aerogarden.com:8443/");
        assert_eq!(
            c.endpoint_url(Endpoint::Login).unwrap().as_str(),
            "https://app3.aerogarden.com:8443/api/Admin/Login"
        );
        assert_eq!(
            c.endpoint_url(Endpoint::UpdateDeviceConfig)
                .unwrap()
                .as_str(),
            "https://app3.aerogarden.com:8443/api/Custom/UpdateDeviceConfig"
        );
    }

    #[test]
    fn fresh_client_has_no_session() {
        let c = client("http://localhost:1");
        assert!(!c.is_valid_login());
        assert_eq!(c.session(), Session::default());
    }

    #[test]
    fn user_id_and_error_are_independent() {
        let c = client("http://localhost:1");
        c.set_user_id("42".into());
        c.record_error("boom");
        assert_eq!(c.user_id().as_deref(), Some("42"));
        assert_eq!(c.error().as_deref(), Some("boom"));

        c.clear_user_id();
        assert!(!c.is_valid_login());
        assert_eq!(c.error().as_deref(), Some("boom"));
    }

    #[test]
    fn session_survives_a_panicking_writer() {
        let c = client("http://localhost:1");
        c.set_user_id("42".into());
        let poisoned = std::thread::scope(|s| {
            s.spawn(|| {
                let _guard = c.session.write().unwrap();
                panic!("writer died mid-update");
            })
            .join()
        });
        assert!(poisoned.is_err());
        assert!(c.session.is_poisoned());

        c.record_error("after panic");
        assert_eq!(c.error().as_deref(), Some("after panic"));
        assert_eq!(c.user_id().as_deref(), Some("42"));
        c.clear_user_id();
        assert!(!c.is_valid_login());
        assert_eq!(c.session().error.as_deref(), Some("after panic"));
    }
}
