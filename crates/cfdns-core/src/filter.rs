//! Query filters for the zone and DNS record listing endpoints
//!
//! Blank strings and zero/absent integers are never sent, which lets the
//! provider apply its own defaults. The only default applied here is the
//! zone `status`, which is `active` unless set.

use crate::model::RECORD_TYPE_A;
use std::fmt;

/// Zone status sent when none is given
pub const DEFAULT_ZONE_STATUS: &str = "active";

/// Ordering direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Asc => write!(f, "asc"),
            Direction::Desc => write!(f, "desc"),
        }
    }
}

/// Whether every search requirement must match, or any of them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    Any,
    All,
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchMode::Any => write!(f, "any"),
            MatchMode::All => write!(f, "all"),
        }
    }
}

/// Filter for `GET zones`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZoneFilter {
    /// Domain name
    pub name: Option<String>,
    /// Zone status; `active` when unset
    pub status: Option<String>,
    pub page: Option<u32>,
    /// Zones per page (provider accepts 5 to 50)
    pub per_page: Option<u32>,
    /// `name`, `status` or `email`
    pub order: Option<String>,
    pub direction: Option<Direction>,
    pub match_mode: Option<MatchMode>,
}

impl ZoneFilter {
    /// Active zones named `domain`
    pub fn by_name(domain: impl Into<String>) -> Self {
        Self {
            name: Some(domain.into()),
            ..Self::default()
        }
    }

    /// Query parameters in the order they are sent
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        push_str(&mut pairs, "name", &self.name);

        let status = self
            .status
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_ZONE_STATUS);
        pairs.push(("status", status.to_string()));

        push_common(
            &mut pairs,
            self.page,
            self.per_page,
            &self.order,
            self.direction,
            self.match_mode,
        );
        pairs
    }
}

/// Filter for `GET zones/{zone_id}/dns_records`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    /// Record type, e.g. `A`; all types when unset
    pub record_type: Option<String>,
    /// Record name, e.g. `mx.example.com`
    pub name: Option<String>,
    /// Record content, e.g. `127.0.0.1`
    pub content: Option<String>,
    pub page: Option<u32>,
    /// Records per page (provider accepts 5 to 100)
    pub per_page: Option<u32>,
    pub order: Option<String>,
    pub direction: Option<Direction>,
    pub match_mode: Option<MatchMode>,
}

impl RecordFilter {
    /// A records named `hostname`
    pub fn a_record(hostname: impl Into<String>) -> Self {
        Self {
            record_type: Some(RECORD_TYPE_A.to_string()),
            name: Some(hostname.into()),
            ..Self::default()
        }
    }

    /// Query parameters in the order they are sent
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        push_str(&mut pairs, "type", &self.record_type);
        push_str(&mut pairs, "name", &self.name);
        push_str(&mut pairs, "content", &self.content);
        push_common(
            &mut pairs,
            self.page,
            self.per_page,
            &self.order,
            self.direction,
            self.match_mode,
        );
        pairs
    }
}

fn push_str(pairs: &mut Vec<(&'static str, String)>, key: &'static str, value: &Option<String>) {
    if let Some(v) = value.as_deref().filter(|v| !v.is_empty()) {
        pairs.push((key, v.to_string()));
    }
}

fn push_common(
    pairs: &mut Vec<(&'static str, String)>,
    page: Option<u32>,
    per_page: Option<u32>,
    order: &Option<String>,
    direction: Option<Direction>,
    match_mode: Option<MatchMode>,
) {
    if let Some(page) = page.filter(|p| *p > 0) {
        pairs.push(("page", page.to_string()));
    }
    if let Some(per_page) = per_page.filter(|p| *p > 0) {
        pairs.push(("per_page", per_page.to_string()));
    }
    push_str(pairs, "order", order);
    if let Some(direction) = direction {
        pairs.push(("direction", direction.to_string()));
    }
    if let Some(match_mode) = match_mode {
        pairs.push(("match", match_mode.to_string()));
    }
}
