//! Error types for the update endpoint
//!
//! Every fault in the request flow is one variant of a single tagged error,
//! mapped to an HTTP status once at the handler boundary. Variants that do
//! not correspond to a caller-visible condition render as a generic 500.

use thiserror::Error;

/// Result type alias for relay operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the update endpoint
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or unusable credentials, or a token the provider reports
    /// as not active
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Request parameter validation errors
    #[error("invalid request: {0}")]
    Validation(String),

    /// Zone or record resolution errors (zero or ambiguous matches)
    #[error("configuration error: {0}")]
    Config(String),

    /// Transport context errors (connecting IP undeterminable)
    #[error("server error: {0}")]
    Server(String),

    /// Base64 decoding errors while reading credentials
    #[error("credential decode error: {0}")]
    Decode(#[from] base64::DecodeError),

    /// Decoded credential bytes were not valid UTF-8
    #[error("credential decode error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Provider API errors (non-2xx responses, error envelopes,
    /// malformed payloads)
    #[error("provider error: {0}")]
    Provider(String),

    /// Transport errors talking to the provider API
    #[error("HTTP error: {0}")]
    Http(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    /// Create a request validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a server-side context error
    pub fn server(msg: impl Into<String>) -> Self {
        Self::Server(msg.into())
    }

    /// Create a provider error
    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }

    /// Create an HTTP transport error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// The HTTP status this error terminates the request with
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Auth(_) => 401,
            Self::Validation(_) => 422,
            Self::Config(_) => 400,
            _ => 500,
        }
    }

    /// The plain-text body sent to the caller.
    ///
    /// Classified conditions echo their message; everything else renders as
    /// a generic 500 body so provider and decode internals stay out of
    /// responses.
    pub fn response_body(&self) -> String {
        match self {
            Self::Auth(_) | Self::Validation(_) | Self::Config(_) | Self::Server(_) => {
                self.to_string()
            }
            _ => "Internal Server Error".to_string(),
        }
    }
}
