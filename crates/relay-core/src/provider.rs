//! DNS provider abstraction
//!
//! The trait covers exactly the four remote operations the update pipeline
//! performs. Implementations make one API call per method, propagate every
//! failure, and hold no state beyond the request's credentials: retries and
//! sequencing are owned by the pipeline's caller contract (there are none
//! of the former and [`run_update`](crate::pipeline::run_update) owns the
//! latter).

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;

use crate::credentials::ClientCredentials;
use crate::error::Result;
use crate::record::RecordKind;

/// A zone visible to the forwarded credentials
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Zone {
    /// Provider-assigned zone identifier
    pub id: String,
    /// Zone name (the apex domain)
    pub name: String,
}

/// A DNS record as returned by the provider
///
/// `id` stays optional: a listing entry without an identifier cannot be
/// updated and the pipeline rejects it rather than guessing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProviderRecord {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub content: String,
    #[serde(default)]
    pub proxied: Option<bool>,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Payload for the record update call
///
/// Carries the new content plus the attributes preserved from the existing
/// record, so an update rewrites the address without touching unrelated
/// metadata. An absent comment is omitted from the wire payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordUpdate {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: RecordKind,
    pub content: String,
    pub ttl: u32,
    pub proxied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Trait for DNS provider implementations
///
/// Implementations must be thread-safe and usable across async tasks. Each
/// method is a single request/response call authenticated by the
/// credentials the provider was constructed with.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Verify the forwarded token with the provider.
    ///
    /// Returns the provider-reported token status string; the pipeline
    /// accepts only `"active"`.
    async fn verify_token(&self) -> Result<String>;

    /// List every zone visible to the credentials.
    async fn list_zones(&self) -> Result<Vec<Zone>>;

    /// List the records in a zone matching `name` and `kind` exactly.
    async fn list_records(
        &self,
        zone_id: &str,
        name: &str,
        kind: RecordKind,
    ) -> Result<Vec<ProviderRecord>>;

    /// Overwrite an existing record by identifier.
    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        update: &RecordUpdate,
    ) -> Result<()>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}

/// Helper trait for constructing DNS providers per request
///
/// Credentials arrive with each inbound request, so providers cannot be
/// built once at startup; the daemon holds a factory and tests substitute
/// their own.
pub trait ProviderFactory: Send + Sync {
    /// Create a provider bound to one request's credentials
    fn create(&self, credentials: &ClientCredentials) -> Box<dyn DnsProvider>;
}
