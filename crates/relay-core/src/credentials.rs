//! Credential extraction from the inbound `Authorization` header
//!
//! Routers send `Authorization: Basic base64(email:token)`. The pair is
//! decoded once per request, handed to the provider client, and dropped
//! with the request. No I/O happens here.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::error::{Error, Result};

/// Forwarded provider credentials, scoped to a single request
pub struct ClientCredentials {
    /// Provider account email
    pub email: String,
    /// Provider API token
    pub token: String,
}

// The token never appears in logs or debug output.
impl std::fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("email", &self.email)
            .field("token", &"<REDACTED>")
            .finish()
    }
}

impl ClientCredentials {
    /// Parse the raw `Authorization` header value into a credential pair.
    ///
    /// The expected shape is `<scheme> <base64(email:token)>`. The scheme
    /// itself is not inspected. Everything before the first `:` of the
    /// decoded text is the email; everything after it is the token, so
    /// tokens may themselves contain `:`.
    ///
    /// # Errors
    ///
    /// - [`Error::Auth`] if the header is absent, the decoded text has no
    ///   `:`, or it contains a control character (0x00-0x1F, 0x7F)
    /// - [`Error::Other`] if the header has no payload after the scheme
    /// - [`Error::Decode`] / [`Error::Utf8`] if the payload is not valid
    ///   base64 or does not decode to UTF-8 text
    pub fn from_authorization(header: Option<&str>) -> Result<Self> {
        let raw = header.ok_or_else(|| Error::auth("missing Authorization header"))?;

        let encoded = raw
            .split_whitespace()
            .nth(1)
            .ok_or_else(|| Error::other("malformed Authorization header"))?;

        let decoded = String::from_utf8(BASE64.decode(encoded)?)?;

        if decoded.bytes().any(|b| b < 0x20 || b == 0x7F) {
            return Err(Error::auth("credentials contain control characters"));
        }

        let (email, token) = decoded
            .split_once(':')
            .ok_or_else(|| Error::auth("credentials are not an email:token pair"))?;

        Ok(Self {
            email: email.to_string(),
            token: token.to_string(),
        })
    }
}
