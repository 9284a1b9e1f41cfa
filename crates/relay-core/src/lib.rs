// # relay-core
//
// Core library for the ddns-relay update endpoint.
//
// A router or gateway device calls the endpoint on every IP change with a
// hostname and Basic credentials; the library turns that single request into
// one update of the matching A/AAAA record at the DNS provider.
//
// ## Architecture Overview
//
// - **ClientCredentials**: forwarded provider credentials, decoded from the
//   inbound `Authorization` header
// - **RecordTarget**: the record to write, built from the `hostname`
//   parameter and the transport-observed connecting IP
// - **DnsProvider**: trait over the provider API operations (verify token,
//   list zones, list records, update record)
// - **run_update**: the strictly sequential pipeline wiring the above
//
// The flow is one request in, one response out. There is no cross-request
// state, no retry logic, and no record creation: the pipeline only rewrites
// a record that already exists.

pub mod credentials;
pub mod error;
pub mod pipeline;
pub mod provider;
pub mod record;

// Re-export core types for convenience
pub use credentials::ClientCredentials;
pub use error::{Error, Result};
pub use pipeline::{UpdateOutcome, run_update};
pub use provider::{DnsProvider, ProviderFactory, ProviderRecord, RecordUpdate, Zone};
pub use record::{RecordKind, RecordTarget, TTL_AUTO};
