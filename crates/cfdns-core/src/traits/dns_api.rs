// # DNS API Trait
//
// The typed operations the reconciler and the purge flow need from the
// provider's REST API.
//
// ## Implementations
//
// - Cloudflare v4: `cfdns-provider-cloudflare` crate
//
// ## Usage
//
// ```rust,ignore
// use cfdns_core::{DnsApi, ZoneFilter};
//
// async fn zone_ids(api: &dyn DnsApi) -> cfdns_core::Result<Vec<String>> {
//     let zones = api.list_zones(&ZoneFilter::by_name("example.com")).await?;
//     Ok(zones.into_iter().map(|z| z.id).collect())
// }
// ```

use crate::error::Result;
use crate::filter::{RecordFilter, ZoneFilter};
use crate::model::{DnsRecord, Zone};
use async_trait::async_trait;

/// Provider REST API
///
/// Every method performs exactly one outbound request. Implementations do not
/// retry, cache or rate-limit; a failed request is returned to the caller
/// as-is.
#[async_trait]
pub trait DnsApi: Send + Sync {
    /// List zones matching `filter`
    async fn list_zones(&self, filter: &ZoneFilter) -> Result<Vec<Zone>>;

    /// List DNS records of `zone_id` matching `filter`
    ///
    /// An empty `zone_id` is an [`Error::InvalidArgument`](crate::Error::InvalidArgument).
    async fn list_dns_records(&self, zone_id: &str, filter: &RecordFilter)
    -> Result<Vec<DnsRecord>>;

    /// Replace a record with `record`, sent whole
    async fn update_dns_record(&self, record: &DnsRecord) -> Result<()>;

    /// Purge every cached file of `zone_id`
    async fn purge_all_cached_files(&self, zone_id: &str) -> Result<()>;
}
