//! Full cache purge for the zone of a domain

use crate::error::{Error, Result, ResultExt};
use crate::filter::ZoneFilter;
use crate::model::Zone;
use crate::traits::DnsApi;
use tracing::debug;

/// Find the single active zone named `domain` and purge all its cached files
///
/// Returns the purged zone.
pub async fn purge_zone_cache(api: &dyn DnsApi, domain: &str) -> Result<Zone> {
    if domain.trim().is_empty() {
        return Err(Error::config("You must provide a domain"));
    }

    let mut zones = api
        .list_zones(&ZoneFilter::by_name(domain))
        .await
        .context("Unable to list zones")?;

    let zone = match zones.len() {
        0 => {
            return Err(Error::ZoneNotFound {
                domain: domain.to_string(),
            });
        }
        1 => zones.remove(0),
        count => {
            return Err(Error::AmbiguousZone {
                domain: domain.to_string(),
                count,
            });
        }
    };

    debug!("Zone: {:?}", zone);

    api.purge_all_cached_files(&zone.id)
        .await
        .context("Purge failed")?;

    Ok(zone)
}
