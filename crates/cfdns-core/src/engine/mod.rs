//! Record reconciliation
//!
//! The [`RecordReconciler`] decides whether a hostname's A record needs a new
//! value and, if so, applies it through the provider API.
//!
//! ## Flow
//!
//! ```text
//! Start
//!   │
//!   ▼
//! DetermineDesiredIP ── explicit IP, else IpSource
//!   │
//!   ▼
//! [only_if_different] QueryCurrentIP ── RecordResolver ──▶ equal? ──▶ Done (no API calls)
//!   │
//!   ▼
//! ListZones ─▶ ListRecords (per zone) ─▶ Disambiguate (exactly one)
//!   │
//!   ▼
//! ConditionalUpdate ── content equal? ──▶ Done (no mutating call)
//!   │
//!   ▼
//! update_dns_record ─▶ Done
//! ```
//!
//! Every failure is terminal. Nothing here retries.

mod purge;

pub use purge::purge_zone_cache;

use crate::config::UpdateRequest;
use crate::error::{Error, Result, ResultExt};
use crate::filter::{RecordFilter, ZoneFilter};
use crate::model::DnsRecord;
use crate::traits::{DnsApi, IpSource, RecordResolver};
use std::fmt;
use std::net::IpAddr;
use tracing::{debug, info};

/// How an up-to-date record was confirmed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckedVia {
    /// Direct DNS query (change-only mode), no provider calls made
    Dns,
    /// The provider's record content, no mutating call made
    Provider,
}

impl fmt::Display for CheckedVia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckedVia::Dns => write!(f, "DNS"),
            CheckedVia::Provider => write!(f, "provider record"),
        }
    }
}

/// Result of a successful reconciliation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Record already had the desired IP (no-op)
    AlreadyCurrent { ip: IpAddr, checked_via: CheckedVia },

    /// Record was updated
    Updated {
        record_id: String,
        previous: String,
        current: IpAddr,
    },

    /// Dry run: the record would have been updated
    WouldUpdate {
        record_id: String,
        previous: String,
        current: IpAddr,
    },
}

/// Reconciles one hostname's A record with the desired IP
pub struct RecordReconciler {
    /// Provider API
    api: Box<dyn DnsApi>,

    /// Desired IP source, used only when the request carries no IP
    ip_source: Box<dyn IpSource>,

    /// Direct DNS resolver, used only in change-only mode
    resolver: Box<dyn RecordResolver>,
}

impl RecordReconciler {
    /// Create a new reconciler
    pub fn new(
        api: Box<dyn DnsApi>,
        ip_source: Box<dyn IpSource>,
        resolver: Box<dyn RecordResolver>,
    ) -> Self {
        Self {
            api,
            ip_source,
            resolver,
        }
    }

    /// Run the whole flow for `request`
    pub async fn run(&self, request: &UpdateRequest) -> Result<ReconcileOutcome> {
        request.validate()?;

        let desired = self.desired_ip(request).await?;

        if request.only_if_different {
            let current = self.current_dns_ip(&request.hostname).await?;
            debug!("Host's current IP is {}", current);

            if same_ip(current, desired) {
                info!(
                    "DNS record's IP matches IP provided/found ({}). Not making an update.",
                    desired
                );
                return Ok(ReconcileOutcome::AlreadyCurrent {
                    ip: desired,
                    checked_via: CheckedVia::Dns,
                });
            }
        }

        let record = self
            .find_record(&request.domain, &request.hostname)
            .await?;

        self.apply(record, desired, request.dry_run).await
    }

    /// Explicit IP if given, otherwise ask the IP source
    async fn desired_ip(&self, request: &UpdateRequest) -> Result<IpAddr> {
        if let Some(ip) = request.ip {
            debug!("Using IP provided: {}", ip);
            return Ok(ip);
        }

        let ip = self
            .ip_source
            .current()
            .await
            .context("Unable to look up external IP")?;
        debug!("Found current IP is {}", ip);
        Ok(ip)
    }

    /// The single A record address DNS currently serves for `hostname`
    async fn current_dns_ip(&self, hostname: &str) -> Result<IpAddr> {
        let ips = self
            .resolver
            .lookup_a(hostname)
            .await
            .context("Unable to query current record")?;

        match ips.as_slice() {
            [] => Err(Error::NoCurrentRecord {
                hostname: hostname.to_string(),
            }),
            [ip] => Ok(*ip),
            _ => Err(Error::AmbiguousCurrentRecord {
                hostname: hostname.to_string(),
                count: ips.len(),
            }),
        }
    }

    /// Locate the one A record named `hostname` across every zone of `domain`
    async fn find_record(&self, domain: &str, hostname: &str) -> Result<DnsRecord> {
        let zones = self
            .api
            .list_zones(&ZoneFilter::by_name(domain))
            .await
            .context("Unable to list zones")?;

        let filter = RecordFilter::a_record(hostname);
        let mut matching = Vec::new();

        for zone in &zones {
            debug!("Zone: {:?}", zone);

            let records = self
                .api
                .list_dns_records(&zone.id, &filter)
                .await
                .context("Unable to list DNS records")?;

            for record in records {
                debug!("Record: {:?}", record);
                // The listing was already filtered by type and name, but the
                // provider's name matching is not relied on to be exact.
                if record.is_a_record_for(hostname) {
                    matching.push(record);
                }
            }
        }

        select_single(matching, hostname)
    }

    /// Update `record` to `desired` unless it already has it
    async fn apply(
        &self,
        mut record: DnsRecord,
        desired: IpAddr,
        dry_run: bool,
    ) -> Result<ReconcileOutcome> {
        let desired_content = desired.to_string();

        if record.content == desired_content {
            info!(
                "Record already has IP [{}]. No update performed.",
                desired_content
            );
            return Ok(ReconcileOutcome::AlreadyCurrent {
                ip: desired,
                checked_via: CheckedVia::Provider,
            });
        }

        if let Some(at) = record.modified_at() {
            debug!("Record {} last modified at {}", record.id, at);
        }

        let previous = std::mem::replace(&mut record.content, desired_content);
        debug!("Updating record to: {:?}", record);

        if dry_run {
            info!(
                "[DRY-RUN] Would update A record of [{}] from [{}] to IP [{}]",
                record.name, previous, desired
            );
            return Ok(ReconcileOutcome::WouldUpdate {
                record_id: record.id,
                previous,
                current: desired,
            });
        }

        self.api
            .update_dns_record(&record)
            .await
            .context("Unable to update DNS record")?;

        info!("Updated A record of [{}] to IP [{}]", record.name, desired);
        Ok(ReconcileOutcome::Updated {
            record_id: record.id,
            previous,
            current: desired,
        })
    }
}

/// Exactly one candidate, or a cardinality error
fn select_single(mut matching: Vec<DnsRecord>, hostname: &str) -> Result<DnsRecord> {
    match matching.len() {
        0 => Err(Error::RecordNotFound {
            hostname: hostname.to_string(),
        }),
        1 => Ok(matching.remove(0)),
        count => Err(Error::AmbiguousRecord {
            hostname: hostname.to_string(),
            count,
        }),
    }
}

/// Address equality that treats IPv4-mapped IPv6 as the IPv4 address
fn same_ip(a: IpAddr, b: IpAddr) -> bool {
    a.to_canonical() == b.to_canonical()
}
