// # IP Source Trait
//
// Where the desired IP comes from when the caller did not give one.
//
// ## Implementations
//
// - HTTP lookup service: `cfdns-ip-http` crate

use async_trait::async_trait;
use std::net::IpAddr;

/// Source of the caller's current public IP
///
/// The reconciler only calls this when no explicit IP was supplied.
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Get the current IP address
    async fn current(&self) -> Result<IpAddr, crate::Error>;
}
