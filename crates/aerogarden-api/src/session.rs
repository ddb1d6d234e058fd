// Account login
//
// The login endpoint answers with `{"code": N}`; a positive code is the
// user identifier every other endpoint expects in its body. There is no
// cookie or token beyond that number.

use tracing::{debug, warn};

use crate::auth::Credentials;
use crate::client::{Endpoint, GardenClient};
use crate::error::Error;
use crate::models::LoginResponse;

impl GardenClient {
    /// Authenticate with the cloud service.
    ///
    /// On success the user identifier is stored in the session and used by
    /// every later request. A rejected login (non-positive or missing code,
    /// unreadable reply) clears any previous identifier and records the
    /// redacted server message. Network failures leave the session as it was.
    pub async fn login(&self, credentials: &Credentials) -> Result<(), Error> {
        debug!(username = credentials.username(), "logging in");

        let reply = match self.post(Endpoint::Login, credentials.login_form()).await {
            Ok(value) => value,
            Err(Error::Deserialization { message, .. }) => {
                return Err(self.reject(credentials, format!("unreadable login reply: {message}")));
            }
            Err(e) => {
                let message = credentials.redact(&e.to_string());
                warn!(error = %message, "login request failed");
                self.record_error(message);
                return Err(e);
            }
        };

        let response: LoginResponse = match serde_json::from_value(reply) {
            Ok(response) => response,
            Err(e) => {
                return Err(self.reject(credentials, format!("unreadable login reply: {e}")));
            }
        };

        match response.code {
            Some(code) if code > 0 => {
                self.set_user_id(code.to_string());
                debug!("login successful");
                Ok(())
            }
            code => {
                let code = code.map_or_else(|| "no code".to_owned(), |c| c.to_string());
                let msg = response.msg.as_deref().unwrap_or("Unknown error");
                Err(self.reject(
                    credentials,
                    format!("Login API call returned {code}: {msg}"),
                ))
            }
        }
    }

    fn reject(&self, credentials: &Credentials, message: String) -> Error {
        let message = credentials.redact(&message);
        warn!(error = %message, "login rejected");
        self.clear_user_id();
        self.record_error(message.clone());
        Error::Authentication { message }
    }
}
