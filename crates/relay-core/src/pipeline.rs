//! The update pipeline
//!
//! One inbound request runs exactly this sequence against the provider:
//!
//! 1. verify the forwarded token (must be "active")
//! 2. resolve the zone (credentials must see exactly one)
//! 3. resolve the existing record (exactly one match by name and kind)
//! 4. overwrite it, preserving `proxied` and `comment`
//!
//! The calls are strictly ordered because each consumes the identifier the
//! previous step resolved. Any failure short-circuits the remainder, so a
//! fault before step 4 leaves the remote record untouched. The pipeline
//! never creates a record: a hostname with no pre-existing record is a
//! configuration error, not an invitation.

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::provider::{DnsProvider, RecordUpdate};
use crate::record::RecordTarget;

/// What a completed update changed, for logging at the boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub zone_id: String,
    pub record_id: String,
    /// Record content before the update
    pub previous_content: String,
    /// Record content written by the update
    pub new_content: String,
}

/// Run the full update sequence for one request.
///
/// # Errors
///
/// - [`Error::Auth`] if the token status is anything but `"active"`
/// - [`Error::Config`] if the credentials see zero or multiple zones, the
///   record lookup matches zero or multiple records, or the sole match has
///   no identifier
/// - any provider-call failure, propagated unchanged
pub async fn run_update(
    provider: &dyn DnsProvider,
    target: &RecordTarget,
) -> Result<UpdateOutcome> {
    let status = provider.verify_token().await?;
    if status != "active" {
        return Err(Error::auth(format!("API token status is {status:?}, expected \"active\"")));
    }
    debug!(provider = provider.provider_name(), "token verified");

    let zones = provider.list_zones().await?;
    if zones.len() != 1 {
        return Err(Error::config(format!(
            "credentials must be scoped to exactly one zone, found {}",
            zones.len()
        )));
    }
    let zone = &zones[0];
    debug!(zone = %zone.name, zone_id = %zone.id, "zone resolved");

    let records = provider
        .list_records(&zone.id, &target.name, target.kind)
        .await?;
    if records.len() != 1 {
        return Err(Error::config(format!(
            "expected exactly one {} record named {:?}, found {}",
            target.kind,
            target.name,
            records.len()
        )));
    }
    let record = &records[0];
    let record_id = record
        .id
        .clone()
        .ok_or_else(|| Error::config(format!("record {:?} has no identifier", target.name)))?;
    debug!(record_id = %record_id, previous = %record.content, "record resolved");

    let update = RecordUpdate {
        name: target.name.clone(),
        kind: target.kind,
        content: target.content.clone(),
        ttl: target.ttl,
        proxied: record.proxied.unwrap_or(false),
        comment: record.comment.clone(),
    };
    provider.update_record(&zone.id, &record_id, &update).await?;

    info!(
        record = %target.name,
        kind = %target.kind,
        previous = %record.content,
        current = %target.content,
        "record updated"
    );

    Ok(UpdateOutcome {
        zone_id: zone.id.clone(),
        record_id,
        previous_content: record.content.clone(),
        new_content: target.content.clone(),
    })
}
