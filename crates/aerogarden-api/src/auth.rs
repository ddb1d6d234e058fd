use secrecy::{ExposeSecret, SecretString};
use url::form_urlencoded;

/// Placeholder substituted for the password in diagnostics.
pub const PASSWORD_PLACEHOLDER: &str = "<password>";

/// Account credentials for the garden cloud service.
///
/// The password stays wrapped in [`SecretString`] so it never shows up in
/// `Debug` output or logs.
#[derive(Debug, Clone)]
pub struct Credentials {
    username: String,
    password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }

    /// The account e-mail address.
    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &SecretString {
        &self.password
    }

    /// Form body for the login endpoint: `mail=<email>&userPwd=<password>`.
    pub(crate) fn login_form(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair("mail", &self.username)
            .append_pair("userPwd", self.password.expose_secret())
            .finish()
    }

    /// Scrub this account's password from a diagnostic message.
    pub fn redact(&self, text: &str) -> String {
        redact_password(text, self.password.expose_secret())
    }
}

/// Replace every occurrence of `password` in `text` with `<password>`.
///
/// Both the raw and the form-encoded spelling are scrubbed, since server
/// replies and transport errors may echo either. An empty password leaves
/// the text untouched.
pub fn redact_password(text: &str, password: &str) -> String {
    if password.is_empty() {
        return text.to_owned();
    }

    let mut cleaned = text.replace(password, PASSWORD_PLACEHOLDER);
    let encoded: String = form_urlencoded::byte_serialize(password.as_bytes()).collect();
    if encoded != password {
        cleaned = cleaned.replace(&encoded, PASSWORD_PLACEHOLDER);
    }
    cleaned
}
