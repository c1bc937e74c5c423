//! Seam traits between the reconciler and its collaborators
//!
//! - [`DnsApi`]: the provider's REST API
//! - [`IpSource`]: where the desired IP comes from
//! - [`RecordResolver`]: direct DNS lookups of a host's current A records

pub mod dns_api;
pub mod ip_source;
pub mod record_resolver;

pub use dns_api::DnsApi;
pub use ip_source::IpSource;
pub use record_resolver::RecordResolver;
