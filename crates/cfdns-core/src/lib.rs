// # cfdns-core
//
// Core library for managing Cloudflare DNS records and cache state.
//
// ## Architecture Overview
//
// - **DnsApi**: Trait for the provider's REST API (zones, records, purge)
// - **IpSource**: Trait for finding the IP a record should point at
// - **RecordResolver**: Trait for direct DNS lookups of a record's current value
// - **RecordReconciler**: Decides whether an A record needs updating and applies it
// - **purge_zone_cache**: Purges every cached file of a domain's zone
//
// ## Design Principles
//
// 1. **Explicit configuration**: Requests and credentials are passed down, never global
// 2. **Single attempt**: No layer retries; failures are terminal and carry context
// 3. **Exactly one**: Nothing is mutated unless exactly one record matches
// 4. **Library-First**: The binaries are thin wrappers around this crate

pub mod config;
pub mod engine;
pub mod error;
pub mod filter;
pub mod model;
pub mod traits;

// Re-export core types for convenience
pub use config::{Credentials, UpdateRequest};
pub use engine::{CheckedVia, ReconcileOutcome, RecordReconciler, purge_zone_cache};
pub use error::{ApiErrorDetail, Error, Result, ResultExt};
pub use filter::{Direction, MatchMode, RecordFilter, ZoneFilter};
pub use model::{ApiResponse, DnsRecord, RECORD_TYPE_A, Zone};
pub use traits::{DnsApi, IpSource, RecordResolver};
