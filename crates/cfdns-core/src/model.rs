//! Cloudflare API data model
//!
//! Zones and DNS records as the v4 API returns them, plus the generic
//! `{success, errors, result}` response envelope.

use crate::error::{ApiErrorDetail, Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Record type this workspace manages
pub const RECORD_TYPE_A: &str = "A";

/// A zone (hosted domain) under the account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub id: String,
    pub name: String,
}

/// A single DNS record
///
/// The update endpoint takes the full representation, so a record is fetched,
/// mutated in memory and sent back whole. These fields are assigned by the
/// server and must travel back unmodified:
///
/// - `id`
/// - `proxiable`
/// - `locked`
/// - `zone_id`
/// - `zone_name`
/// - `created_on`
/// - `modified_on`
///
/// Timestamps are kept as the exact strings the API returned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DnsRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub content: String,
    pub proxiable: bool,
    pub proxied: bool,
    pub ttl: u32,
    pub locked: bool,
    pub zone_id: String,
    pub zone_name: String,
    pub created_on: String,
    pub modified_on: String,
}

impl DnsRecord {
    /// True when the record is an A record named exactly `hostname`
    pub fn is_a_record_for(&self, hostname: &str) -> bool {
        self.name == hostname && self.record_type == RECORD_TYPE_A
    }

    /// Last modification time, if the API sent a parseable RFC 3339 timestamp
    pub fn modified_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.modified_on)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }
}

/// Generic Cloudflare response envelope
///
/// Decoded as-is, then turned into a typed result with
/// [`ApiResponse::into_result`].
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<ApiErrorDetail>,
    #[serde(default = "Option::default")]
    pub result: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Typed payload on success, the provider's error list otherwise
    ///
    /// `operation` names the call in the resulting [`Error::Api`].
    pub fn into_result(self, operation: &str) -> Result<T> {
        if !self.success {
            return Err(Error::api(operation, self.errors));
        }

        self.result
            .ok_or_else(|| Error::decode(format!("{} response has no result", operation)))
    }

    /// Success flag only, for calls whose payload is not needed
    pub fn into_unit(self, operation: &str) -> Result<()> {
        if self.success {
            Ok(())
        } else {
            Err(Error::api(operation, self.errors))
        }
    }
}
