// # Record Resolver Trait
//
// Direct DNS lookups used by change-only mode.
//
// ## Implementations
//
// - `/etc/resolv.conf` nameserver over UDP: `cfdns-resolv` crate

use async_trait::async_trait;
use std::net::IpAddr;

/// Looks up a host's current A records without going through a local cache
#[async_trait]
pub trait RecordResolver: Send + Sync {
    /// Every A record address in the answer, in server order
    ///
    /// An empty list is a valid answer; deciding what it means is up to the
    /// caller.
    async fn lookup_a(&self, hostname: &str) -> Result<Vec<IpAddr>, crate::Error>;
}
