//! Test doubles and common utilities for the reconciliation contract tests
//!
//! The doubles count every call so tests can assert which collaborators were
//! (or were not) contacted.

#![allow(dead_code)]

use cfdns_core::error::{Error, Result};
use cfdns_core::traits::{DnsApi, IpSource, RecordResolver};
use cfdns_core::{DnsRecord, RecordFilter, Zone, ZoneFilter};
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// An in-memory provider API that tracks calls
///
/// Listing ignores the record filter and returns every record of the zone,
/// like a provider whose name matching is looser than expected.
pub struct MockDnsApi {
    /// Zones returned by list_zones()
    zones: Arc<Mutex<Vec<Zone>>>,
    /// Records per zone ID
    records: Arc<Mutex<HashMap<String, Vec<DnsRecord>>>>,
    /// Call counter for list_zones()
    list_zones_calls: Arc<AtomicUsize>,
    /// Call counter for list_dns_records()
    list_records_calls: Arc<AtomicUsize>,
    /// Records sent to update_dns_record(), in order
    updates: Arc<Mutex<Vec<DnsRecord>>>,
    /// Zone IDs sent to purge_all_cached_files(), in order
    purges: Arc<Mutex<Vec<String>>>,
    /// When set, list_zones() fails with a transport error
    fail_list_zones: bool,
}

impl MockDnsApi {
    pub fn new() -> Self {
        Self {
            zones: Arc::new(Mutex::new(Vec::new())),
            records: Arc::new(Mutex::new(HashMap::new())),
            list_zones_calls: Arc::new(AtomicUsize::new(0)),
            list_records_calls: Arc::new(AtomicUsize::new(0)),
            updates: Arc::new(Mutex::new(Vec::new())),
            purges: Arc::new(Mutex::new(Vec::new())),
            fail_list_zones: false,
        }
    }

    /// Add a zone
    pub fn with_zone(self, id: &str, name: &str) -> Self {
        self.zones.lock().unwrap().push(zone(id, name));
        self
    }

    /// Add a record to the zone it names in `zone_id`
    pub fn with_record(self, record: DnsRecord) -> Self {
        self.records
            .lock()
            .unwrap()
            .entry(record.zone_id.clone())
            .or_default()
            .push(record);
        self
    }

    /// Make list_zones() fail
    pub fn failing_list_zones(mut self) -> Self {
        self.fail_list_zones = true;
        self
    }

    /// Create a new MockDnsApi that shares state and counters with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            zones: Arc::clone(&other.zones),
            records: Arc::clone(&other.records),
            list_zones_calls: Arc::clone(&other.list_zones_calls),
            list_records_calls: Arc::clone(&other.list_records_calls),
            updates: Arc::clone(&other.updates),
            purges: Arc::clone(&other.purges),
            fail_list_zones: other.fail_list_zones,
        }
    }

    /// Get the number of times list_zones() was called
    pub fn list_zones_calls(&self) -> usize {
        self.list_zones_calls.load(Ordering::SeqCst)
    }

    /// Get the number of times list_dns_records() was called
    pub fn list_records_calls(&self) -> usize {
        self.list_records_calls.load(Ordering::SeqCst)
    }

    /// Records sent to update_dns_record()
    pub fn updates(&self) -> Vec<DnsRecord> {
        self.updates.lock().unwrap().clone()
    }

    /// Zone IDs sent to purge_all_cached_files()
    pub fn purges(&self) -> Vec<String> {
        self.purges.lock().unwrap().clone()
    }

    /// Total number of provider calls of any kind
    pub fn total_calls(&self) -> usize {
        self.list_zones_calls()
            + self.list_records_calls()
            + self.updates().len()
            + self.purges().len()
    }
}

#[async_trait::async_trait]
impl DnsApi for MockDnsApi {
    async fn list_zones(&self, _filter: &ZoneFilter) -> Result<Vec<Zone>> {
        self.list_zones_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_list_zones {
            return Err(Error::request("connection refused"));
        }
        Ok(self.zones.lock().unwrap().clone())
    }

    async fn list_dns_records(
        &self,
        zone_id: &str,
        _filter: &RecordFilter,
    ) -> Result<Vec<DnsRecord>> {
        self.list_records_calls.fetch_add(1, Ordering::SeqCst);
        if zone_id.is_empty() {
            return Err(Error::invalid_argument("You must provide a zone ID"));
        }
        Ok(self
            .records
            .lock()
            .unwrap()
            .get(zone_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn update_dns_record(&self, record: &DnsRecord) -> Result<()> {
        self.updates.lock().unwrap().push(record.clone());

        let mut records = self.records.lock().unwrap();
        if let Some(stored) = records
            .get_mut(&record.zone_id)
            .and_then(|rs| rs.iter_mut().find(|r| r.id == record.id))
        {
            *stored = record.clone();
        }
        Ok(())
    }

    async fn purge_all_cached_files(&self, zone_id: &str) -> Result<()> {
        self.purges.lock().unwrap().push(zone_id.to_string());
        Ok(())
    }
}

/// An IP source that returns a fixed IP and counts lookups
pub struct CountingIpSource {
    ip: IpAddr,
    calls: Arc<AtomicUsize>,
}

impl CountingIpSource {
    pub fn new(ip: IpAddr) -> Self {
        Self {
            ip,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            ip: other.ip,
            calls: Arc::clone(&other.calls),
        }
    }

    /// Get the number of times current() was called
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl IpSource for CountingIpSource {
    async fn current(&self) -> Result<IpAddr> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.ip)
    }
}

/// A resolver that answers with a fixed list of A records and counts lookups
pub struct FixedResolver {
    answers: Vec<IpAddr>,
    calls: Arc<AtomicUsize>,
}

impl FixedResolver {
    pub fn new(answers: Vec<IpAddr>) -> Self {
        Self {
            answers,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            answers: other.answers.clone(),
            calls: Arc::clone(&other.calls),
        }
    }

    /// Get the number of times lookup_a() was called
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl RecordResolver for FixedResolver {
    async fn lookup_a(&self, _hostname: &str) -> Result<Vec<IpAddr>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.answers.clone())
    }
}

pub fn ip(s: &str) -> IpAddr {
    s.parse().expect("valid IP literal")
}

pub fn zone(id: &str, name: &str) -> Zone {
    Zone {
        id: id.to_string(),
        name: name.to_string(),
    }
}

/// A fully populated A record as the provider would return it
pub fn a_record(id: &str, zone_id: &str, name: &str, content: &str) -> DnsRecord {
    DnsRecord {
        id: id.to_string(),
        record_type: "A".to_string(),
        name: name.to_string(),
        content: content.to_string(),
        proxiable: true,
        proxied: false,
        ttl: 120,
        locked: false,
        zone_id: zone_id.to_string(),
        zone_name: "example.com".to_string(),
        created_on: "2014-01-01T05:20:00.12345Z".to_string(),
        modified_on: "2014-01-02T06:30:00.5Z".to_string(),
    }
}

/// Bundle of doubles plus handles to read their counters afterwards
pub struct Harness {
    pub api: MockDnsApi,
    pub ip_source: CountingIpSource,
    pub resolver: FixedResolver,
}

impl Harness {
    pub fn new(api: MockDnsApi, looked_up_ip: IpAddr, dns_answers: Vec<IpAddr>) -> Self {
        Self {
            api,
            ip_source: CountingIpSource::new(looked_up_ip),
            resolver: FixedResolver::new(dns_answers),
        }
    }

    /// A reconciler wired to doubles that share this harness's counters
    pub fn reconciler(&self) -> cfdns_core::RecordReconciler {
        cfdns_core::RecordReconciler::new(
            Box::new(MockDnsApi::sharing_counters_with(&self.api)),
            Box::new(CountingIpSource::sharing_counters_with(&self.ip_source)),
            Box::new(FixedResolver::sharing_counters_with(&self.resolver)),
        )
    }
}
