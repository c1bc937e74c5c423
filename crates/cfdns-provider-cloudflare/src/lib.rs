// # Cloudflare API Client
//
// This crate implements `cfdns_core::DnsApi` on top of the Cloudflare API v4.
//
// ## Behaviour
//
// - One HTTP request per operation: no retries, no caching, no rate limiting
// - Every response is decoded through the generic `{success, errors, result}`
//   envelope; `success == false` becomes `Error::Api` with the provider's
//   `(code, message)` list
// - HTTP timeout configured (60 seconds)
// - Debug mode logs each request and the raw response body
//
// ## Security Requirements
//
// - The API key NEVER appears in logs or Debug output
// - Credentials are validated before the client is built
//
// ## API Reference
//
// - List Zones: GET `/zones?name=...&status=active`
// - List DNS Records: GET `/zones/:zone_id/dns_records?type=A&name=...`
// - Update DNS Record: PUT `/zones/:zone_id/dns_records/:record_id`
// - Purge Cache: DELETE `/zones/:zone_id/purge_cache`

use async_trait::async_trait;
use cfdns_core::traits::DnsApi;
use cfdns_core::{
    ApiResponse, Credentials, DnsRecord, Error, RecordFilter, Result, Zone, ZoneFilter,
};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, Url};
use serde::de::{DeserializeOwned, IgnoredAny};
use std::time::Duration;

/// Cloudflare API base URL
pub const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4/";

/// Default HTTP timeout for API requests (60 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(60);

/// Cloudflare API client authenticated with an email and API key
///
/// # Security
///
/// The Debug implementation does NOT expose the API key.
pub struct CloudflareClient {
    credentials: Credentials,

    /// Root every endpoint path is appended to
    base_url: Url,

    /// HTTP client for API requests
    client: reqwest::Client,

    /// Log each request and its raw response body at debug level
    debug: bool,
}

impl std::fmt::Debug for CloudflareClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareClient")
            .field("email", &self.credentials.email)
            .field("key", &"<REDACTED>")
            .field("base_url", &self.base_url.as_str())
            .field("debug", &self.debug)
            .finish()
    }
}

impl CloudflareClient {
    /// Create a client for the public Cloudflare API
    ///
    /// Fails with `Error::Config` if the credentials are incomplete.
    pub fn new(credentials: Credentials) -> Result<Self> {
        credentials.validate()?;

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::request(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            credentials,
            base_url: parse_base_url(CLOUDFLARE_API_BASE)?,
            client,
            debug: false,
        })
    }

    /// Point the client at another API root (e.g. a local mock server)
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        self.base_url = parse_base_url(base_url)?;
        Ok(self)
    }

    /// Enable request/response logging
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Build an endpoint URL; each segment is percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| Error::config(format!("Invalid API base URL: {}", self.base_url)))?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .header("X-Auth-Email", &self.credentials.email)
            .header("X-Auth-Key", self.credentials.key())
            .header(CONTENT_TYPE, "application/json")
    }

    /// Send one request and decode the response envelope
    ///
    /// Transport failures map to `Error::Request`, undecodable bodies to
    /// `Error::Decode`. The envelope itself is returned undigested so the
    /// caller decides how to read `result`.
    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        query: &[(&'static str, String)],
        body: Option<String>,
    ) -> Result<ApiResponse<T>> {
        if self.debug {
            tracing::debug!("{} {} {:?}", method, url, query);
        }

        let mut builder = self.request(method, url);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Error::request(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::request(format!("Unable to read response body: {}", e)))?;

        if self.debug {
            tracing::debug!("Response ({}): {}", status, text);
        }

        serde_json::from_str(&text).map_err(|e| {
            if status.is_success() {
                Error::decode(e.to_string())
            } else {
                // Not an API envelope, e.g. an HTML error page from a proxy
                Error::request(format!("Unexpected HTTP status {}", status))
            }
        })
    }
}

fn parse_base_url(base_url: &str) -> Result<Url> {
    let url = Url::parse(base_url)
        .map_err(|e| Error::config(format!("Invalid API base URL {}: {}", base_url, e)))?;
    if url.cannot_be_a_base() {
        return Err(Error::config(format!("Invalid API base URL: {}", base_url)));
    }
    Ok(url)
}

fn require(value: &str, what: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::invalid_argument(format!("You must provide {}", what)));
    }
    Ok(())
}

#[async_trait]
impl DnsApi for CloudflareClient {
    async fn list_zones(&self, filter: &ZoneFilter) -> Result<Vec<Zone>> {
        let url = self.endpoint(&["zones"])?;

        self.send::<Vec<Zone>>(Method::GET, url, &filter.query_pairs(), None)
            .await?
            .into_result("List zones")
    }

    async fn list_dns_records(
        &self,
        zone_id: &str,
        filter: &RecordFilter,
    ) -> Result<Vec<DnsRecord>> {
        require(zone_id, "a zone ID")?;
        let url = self.endpoint(&["zones", zone_id, "dns_records"])?;

        self.send::<Vec<DnsRecord>>(Method::GET, url, &filter.query_pairs(), None)
            .await?
            .into_result("List DNS records")
    }

    async fn update_dns_record(&self, record: &DnsRecord) -> Result<()> {
        require(&record.zone_id, "a zone ID")?;
        require(&record.id, "a record ID")?;
        let url = self.endpoint(&["zones", &record.zone_id, "dns_records", &record.id])?;

        let payload = serde_json::to_string(record)
            .map_err(|e| Error::decode(format!("Unable to encode DNS record: {}", e)))?;

        self.send::<IgnoredAny>(Method::PUT, url, &[], Some(payload.clone()))
            .await?
            .into_unit("Update DNS record")
            .map_err(|err| match err {
                Error::Api {
                    operation, errors, ..
                } => Error::Api {
                    operation,
                    errors,
                    payload: Some(payload),
                },
                other => other,
            })
    }

    async fn purge_all_cached_files(&self, zone_id: &str) -> Result<()> {
        require(zone_id, "a zone ID")?;
        let url = self.endpoint(&["zones", zone_id, "purge_cache"])?;
        let body = serde_json::json!({ "purge_everything": true }).to_string();

        self.send::<IgnoredAny>(Method::DELETE, url, &[], Some(body))
            .await?
            .into_unit("Purge cache")
    }
}
