//! Test doubles and helpers for pipeline contract tests
//!
//! The scripted provider returns canned responses and counts every call,
//! so tests can assert which remote operations a failing pipeline run
//! never reached.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use relay_core::error::Result;
use relay_core::provider::{DnsProvider, ProviderRecord, RecordUpdate, Zone};
use relay_core::record::RecordKind;

/// A scripted DnsProvider that tracks calls
pub struct ScriptedProvider {
    token_status: String,
    zones: Vec<Zone>,
    records: Vec<ProviderRecord>,
    verify_calls: Arc<AtomicUsize>,
    zone_calls: Arc<AtomicUsize>,
    record_calls: Arc<AtomicUsize>,
    update_calls: Arc<AtomicUsize>,
    /// Arguments of the last list_records call: (zone_id, name, kind)
    pub last_record_query: Arc<Mutex<Option<(String, String, RecordKind)>>>,
    /// Arguments of the last update_record call: (zone_id, record_id, update)
    pub last_update: Arc<Mutex<Option<(String, String, RecordUpdate)>>>,
}

impl ScriptedProvider {
    pub fn new(token_status: &str, zones: Vec<Zone>, records: Vec<ProviderRecord>) -> Self {
        Self {
            token_status: token_status.to_string(),
            zones,
            records,
            verify_calls: Arc::new(AtomicUsize::new(0)),
            zone_calls: Arc::new(AtomicUsize::new(0)),
            record_calls: Arc::new(AtomicUsize::new(0)),
            update_calls: Arc::new(AtomicUsize::new(0)),
            last_record_query: Arc::new(Mutex::new(None)),
            last_update: Arc::new(Mutex::new(None)),
        }
    }

    pub fn verify_count(&self) -> usize {
        self.verify_calls.load(Ordering::SeqCst)
    }

    pub fn zone_count(&self) -> usize {
        self.zone_calls.load(Ordering::SeqCst)
    }

    pub fn record_count(&self) -> usize {
        self.record_calls.load(Ordering::SeqCst)
    }

    pub fn update_count(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DnsProvider for ScriptedProvider {
    async fn verify_token(&self) -> Result<String> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.token_status.clone())
    }

    async fn list_zones(&self) -> Result<Vec<Zone>> {
        self.zone_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.zones.clone())
    }

    async fn list_records(
        &self,
        zone_id: &str,
        name: &str,
        kind: RecordKind,
    ) -> Result<Vec<ProviderRecord>> {
        self.record_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_record_query.lock().unwrap() =
            Some((zone_id.to_string(), name.to_string(), kind));
        Ok(self.records.clone())
    }

    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        update: &RecordUpdate,
    ) -> Result<()> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_update.lock().unwrap() =
            Some((zone_id.to_string(), record_id.to_string(), update.clone()));
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }
}

pub fn zone(id: &str, name: &str) -> Zone {
    Zone {
        id: id.to_string(),
        name: name.to_string(),
    }
}

pub fn record(id: Option<&str>, name: &str, content: &str) -> ProviderRecord {
    ProviderRecord {
        id: id.map(str::to_string),
        name: name.to_string(),
        content: content.to_string(),
        proxied: None,
        comment: None,
    }
}

pub fn record_with_meta(
    id: &str,
    name: &str,
    content: &str,
    proxied: bool,
    comment: &str,
) -> ProviderRecord {
    ProviderRecord {
        id: Some(id.to_string()),
        name: name.to_string(),
        content: content.to_string(),
        proxied: Some(proxied),
        comment: Some(comment.to_string()),
    }
}
