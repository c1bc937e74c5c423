//! Resolver configuration parsing
//!
//! Only `nameserver` lines are understood; everything else is ignored.

use cfdns_core::{Error, Result};
use std::path::Path;

/// Default resolver configuration file
pub const DEFAULT_RESOLV_CONF: &str = "/etc/resolv.conf";

/// First nameserver in resolver configuration text
///
/// Blank lines and `#` comments are skipped. A line counts only if it has
/// exactly two whitespace-separated tokens and the first is `nameserver`.
pub fn first_nameserver(text: &str) -> Result<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .find_map(|line| {
            let mut tokens = line.split_whitespace();
            match (tokens.next(), tokens.next(), tokens.next()) {
                (Some("nameserver"), Some(address), None) => Some(address.to_string()),
                _ => None,
            }
        })
        .ok_or_else(|| Error::NoResolverFound("no nameserver line".to_string()))
}

/// Read `path` and return its first nameserver
pub fn read_nameserver(path: &Path) -> Result<String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| Error::NoResolverFound(format!("{}: {}", path.display(), e)))?;
    first_nameserver(&text)
}
