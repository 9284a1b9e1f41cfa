// # Cloudflare DNS Provider
//
// Cloudflare API v4 implementation of the relay-core provider trait.
//
// Four operations, one HTTP request each, authenticated by the credentials
// forwarded with the inbound request:
//
// - Verify token: GET `/user/tokens/verify`
// - List zones: GET `/zones`
// - List DNS records: GET `/zones/:zone_id/dns_records?name=...&type=...`
// - Update DNS record: PUT `/zones/:zone_id/dns_records/:record_id`
//
// No retry logic, no caching, no background tasks: every failure is
// propagated to the pipeline, which terminates the request.
//
// ## Security
//
// The API token never appears in logs or Debug output.

use std::time::Duration;

use async_trait::async_trait;
use relay_core::credentials::ClientCredentials;
use relay_core::error::{Error, Result};
use relay_core::provider::{DnsProvider, ProviderFactory, ProviderRecord, RecordUpdate, Zone};
use relay_core::record::RecordKind;
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// Cloudflare API base URL
pub const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Response envelope wrapping every Cloudflare API payload
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    success: bool,
    #[serde(default)]
    errors: Vec<ApiError>,
    result: Option<T>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct TokenVerification {
    status: String,
}

fn format_errors(errors: &[ApiError]) -> String {
    if errors.is_empty() {
        return "no error detail".to_string();
    }
    errors
        .iter()
        .map(|e| format!("{} (code {})", e.message, e.code))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Cloudflare DNS provider bound to one request's credentials
pub struct CloudflareProvider {
    /// HTTP client for API requests
    client: reqwest::Client,
    api_base: String,
    email: String,
    api_token: String,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for CloudflareProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareProvider")
            .field("api_base", &self.api_base)
            .field("email", &self.email)
            .field("api_token", &"<REDACTED>")
            .finish()
    }
}

impl CloudflareProvider {
    /// Create a provider against the production Cloudflare API
    pub fn new(credentials: &ClientCredentials) -> Self {
        Self::with_base_url(CLOUDFLARE_API_BASE, credentials)
    }

    /// Create a provider against a custom API base URL.
    ///
    /// Mainly useful for pointing the client at a test server.
    pub fn with_base_url(api_base: impl Into<String>, credentials: &ClientCredentials) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self::with_client(client, api_base, credentials)
    }

    fn with_client(
        client: reqwest::Client,
        api_base: impl Into<String>,
        credentials: &ClientCredentials,
    ) -> Self {
        Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            email: credentials.email.clone(),
            api_token: credentials.token.clone(),
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.api_base, path))
            .bearer_auth(&self.api_token)
            .header("X-Auth-Email", &self.email)
            .header("Content-Type", "application/json")
    }

    /// Check the HTTP status and unwrap the Cloudflare response envelope.
    ///
    /// `what` names the operation for error messages; the raw body is
    /// only quoted for non-2xx responses, where it carries the API's own
    /// diagnostic.
    async fn read_envelope<T>(response: reqwest::Response, what: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unreadable response body".to_string());

            return Err(match status.as_u16() {
                429 => Error::provider(format!("{what}: rate limited by Cloudflare ({status})")),
                500..=599 => {
                    Error::provider(format!("{what}: Cloudflare server error {status}: {body}"))
                }
                _ => Error::provider(format!("{what}: unexpected status {status}: {body}")),
            });
        }

        let envelope: ApiEnvelope<T> = response
            .json()
            .await
            .map_err(|e| Error::provider(format!("{what}: invalid response: {e}")))?;

        if !envelope.success {
            return Err(Error::provider(format!(
                "{what}: API error: {}",
                format_errors(&envelope.errors)
            )));
        }

        envelope
            .result
            .ok_or_else(|| Error::provider(format!("{what}: response carries no result")))
    }
}

#[async_trait]
impl DnsProvider for CloudflareProvider {
    async fn verify_token(&self) -> Result<String> {
        let response = self
            .request(reqwest::Method::GET, "/user/tokens/verify")
            .send()
            .await
            .map_err(|e| Error::http(format!("token verification request failed: {e}")))?;

        // An outright rejection here is an authentication failure, not an
        // upstream fault: the caller's token is unusable.
        if matches!(response.status().as_u16(), 401 | 403) {
            return Err(Error::auth("Cloudflare rejected the API token"));
        }

        let verification: TokenVerification =
            Self::read_envelope(response, "verify token").await?;
        tracing::debug!(status = %verification.status, "token verification response");
        Ok(verification.status)
    }

    async fn list_zones(&self) -> Result<Vec<Zone>> {
        let response = self
            .request(reqwest::Method::GET, "/zones")
            .send()
            .await
            .map_err(|e| Error::http(format!("zone listing request failed: {e}")))?;

        Self::read_envelope(response, "list zones").await
    }

    async fn list_records(
        &self,
        zone_id: &str,
        name: &str,
        kind: RecordKind,
    ) -> Result<Vec<ProviderRecord>> {
        let response = self
            .request(
                reqwest::Method::GET,
                &format!("/zones/{zone_id}/dns_records"),
            )
            .query(&[("name", name), ("type", kind.as_str())])
            .send()
            .await
            .map_err(|e| Error::http(format!("record listing request failed: {e}")))?;

        Self::read_envelope(response, "list records").await
    }

    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        update: &RecordUpdate,
    ) -> Result<()> {
        let response = self
            .request(
                reqwest::Method::PUT,
                &format!("/zones/{zone_id}/dns_records/{record_id}"),
            )
            .json(update)
            .send()
            .await
            .map_err(|e| Error::http(format!("record update request failed: {e}")))?;

        // The updated record comes back in the envelope; only the success
        // flag matters here.
        let _: serde_json::Value = Self::read_envelope(response, "update record").await?;
        tracing::debug!(record_id, "record update acknowledged");
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "cloudflare"
    }
}

/// Factory building a provider per inbound request
pub struct CloudflareFactory {
    api_base: String,
    client: reqwest::Client,
}

impl CloudflareFactory {
    /// Create a factory for the given API base URL.
    ///
    /// The underlying HTTP client (and its connection pool) is shared by
    /// every provider the factory creates.
    pub fn new(api_base: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            api_base: api_base.into(),
            client,
        }
    }
}

impl Default for CloudflareFactory {
    fn default() -> Self {
        Self::new(CLOUDFLARE_API_BASE)
    }
}

impl ProviderFactory for CloudflareFactory {
    fn create(&self, credentials: &ClientCredentials) -> Box<dyn DnsProvider> {
        Box::new(CloudflareProvider::with_client(
            self.client.clone(),
            self.api_base.clone(),
            credentials,
        ))
    }
}
