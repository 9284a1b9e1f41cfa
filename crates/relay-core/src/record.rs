//! Target record construction
//!
//! The record to write is derived from two request inputs only: the
//! `hostname` query parameter and the transport-observed connecting IP.
//! A client-claimed `ip` parameter is never an input here; DDNS clients
//! behind NAT or proxies cannot be trusted to report their own external
//! address.

use serde::Serialize;

use crate::error::{Error, Result};

/// TTL value the provider interprets as "automatic"
pub const TTL_AUTO: u32 = 1;

/// DNS record family, serialized as the provider's `type` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RecordKind {
    #[serde(rename = "A")]
    A,
    #[serde(rename = "AAAA")]
    Aaaa,
}

impl RecordKind {
    /// Derive the family from the content literal: anything containing a
    /// `.` is taken as IPv4, everything else is treated as IPv6. No
    /// address-family syntax validation beyond that.
    pub fn for_content(content: &str) -> Self {
        if content.contains('.') {
            Self::A
        } else {
            Self::Aaaa
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The record one request resolves and overwrites
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordTarget {
    /// Record name (the hostname to keep in sync)
    pub name: String,
    /// New record content: the caller's connecting IP literal
    pub content: String,
    /// Record family derived from `content`
    pub kind: RecordKind,
    /// Record TTL, fixed at the provider's "automatic" value
    pub ttl: u32,
}

impl RecordTarget {
    /// Build the target from the request's `hostname` parameter and the
    /// connecting IP observed at the transport layer.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] if `hostname` is absent or empty
    /// - [`Error::Server`] if no connecting IP could be determined
    pub fn from_request(hostname: Option<&str>, connecting_ip: Option<&str>) -> Result<Self> {
        let name = match hostname {
            Some(h) if !h.is_empty() => h.to_string(),
            _ => return Err(Error::validation("missing hostname parameter")),
        };

        let content = match connecting_ip {
            Some(ip) if !ip.is_empty() => ip.to_string(),
            _ => return Err(Error::server("unable to determine client IP")),
        };

        let kind = RecordKind::for_content(&content);

        Ok(Self {
            name,
            content,
            kind,
            ttl: TTL_AUTO,
        })
    }
}
