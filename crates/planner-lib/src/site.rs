//! Site capacity derivation

use serde::{Deserialize, Serialize};

use crate::cost::SessionCost;
use crate::error::{CapacityError, Result};
use crate::models::{Region, Site};

/// Derived capacity of one site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteCapacity {
    pub name: String,
    pub region: Region,
    pub physical_server_count: Option<u32>,
    pub physical_cpu: f64,
    /// `None` when the per-session cost cannot be divided by
    pub supported_sessions: Option<u64>,
}

/// Parse a raw server-count field.
///
/// Empty or non-numeric input is the transient "still typing" state and
/// maps to `None` (0 CPU). Leading zeros are dropped, keeping a single `0`.
/// Only a digit string too large for a server count is an error.
pub fn parse_server_count(raw: &str) -> Result<Option<u32>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(None);
    }

    let canonical = trimmed.trim_start_matches('0');
    let canonical = if canonical.is_empty() { "0" } else { canonical };

    canonical
        .parse::<u32>()
        .map(Some)
        .map_err(|_| CapacityError::InvalidNumber {
            field: "physical_server_count",
            raw: raw.to_string(),
        })
}

/// Physical CPU of a site; a blank count contributes nothing
pub fn site_physical_cpu(count: Option<u32>, physical_cpu_per_server: f64) -> f64 {
    match count {
        Some(count) => count as f64 * physical_cpu_per_server,
        None => 0.0,
    }
}

/// Whole sessions a pool of physical CPU can host
pub fn supported_sessions(physical_cpu: f64, cost: &SessionCost) -> Option<u64> {
    if !cost.is_usable() {
        return None;
    }
    let sessions = (physical_cpu / cost.physical_cpu_per_session).floor();
    (sessions.is_finite() && sessions >= 0.0).then_some(sessions as u64)
}

/// Servers needed to cover a CPU amount, sign ignored
pub fn servers_for_cpu(cpu: f64, physical_cpu_per_server: f64) -> Option<u64> {
    if !(physical_cpu_per_server.is_finite() && physical_cpu_per_server > 0.0) {
        return None;
    }
    let servers = (cpu.abs() / physical_cpu_per_server).ceil();
    servers.is_finite().then_some(servers as u64)
}

pub fn total_physical_cpu(sites: &[Site]) -> f64 {
    sites.iter().map(|s| s.physical_cpu).sum()
}

pub fn total_servers(sites: &[Site]) -> u64 {
    sites.iter().map(|s| s.server_count() as u64).sum()
}

/// Capacity rows for every site, in input order
pub fn site_capacities(sites: &[Site], cost: &SessionCost) -> Vec<SiteCapacity> {
    sites
        .iter()
        .map(|site| SiteCapacity {
            name: site.name.clone(),
            region: site.region,
            physical_server_count: site.physical_server_count,
            physical_cpu: site.physical_cpu,
            supported_sessions: supported_sessions(site.physical_cpu, cost),
        })
        .collect()
}
