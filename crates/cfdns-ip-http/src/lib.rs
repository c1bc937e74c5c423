// # HTTP IP Source
//
// Finds the host's external IP by asking a plain-text lookup service
// (e.g. icanhazip.com) and trusting whatever address it reports.
//
// ## Behaviour
//
// - One GET per call, no caching and no polling
// - The body is trimmed and parsed as an IP address
// - Any failure (transport, non-2xx status, unparsable body) is `Error::Lookup`

use cfdns_core::traits::IpSource;
use cfdns_core::{Error, Result};

use std::net::IpAddr;
use std::time::Duration;

/// Default lookup service; answers with the caller's IPv4 address only
pub const DEFAULT_IP_SERVICE: &str = "https://ipv4.icanhazip.com";

/// Default HTTP timeout for the lookup (10 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// External IP lookup over HTTP
#[derive(Debug, Clone)]
pub struct HttpIpSource {
    /// URL to fetch the IP from
    url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a source that asks [`DEFAULT_IP_SERVICE`]
    pub fn new() -> Result<Self> {
        Self::with_url(DEFAULT_IP_SERVICE)
    }

    /// Create a source that asks another plain-text service
    pub fn with_url(url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::lookup(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    /// URL this source asks
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait::async_trait]
impl IpSource for HttpIpSource {
    async fn current(&self) -> Result<IpAddr> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::lookup(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::lookup(format!("HTTP error: {}", response.status())));
        }

        let ip_text = response
            .text()
            .await
            .map_err(|e| Error::lookup(format!("Failed to read response: {}", e)))?;

        let ip_text = ip_text.trim();
        let ip: IpAddr = ip_text
            .parse()
            .map_err(|_| Error::lookup(format!("Invalid IP address: {:?}", ip_text)))?;

        tracing::debug!("Looked up external IP [{}] from {}", ip, self.url);
        Ok(ip)
    }
}
