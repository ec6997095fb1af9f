//! Regional capacity balance (NA / EU / APAC)
//!
//! Read-only view over the site list; it never feeds back into the
//! failover gap figures.

use serde::{Deserialize, Serialize};

use super::analyzer::{EU_LOAD_SHARE, NA_LOAD_SHARE};
use crate::cost::SessionCost;
use crate::models::{Region, ResilienceTarget, Site};
use crate::site::servers_for_cpu;

/// In-region round-trip expectation, milliseconds
const IN_REGION_LATENCY_MS: (u32, u32) = (20, 40);
const EU_CROSS_REGION_LATENCY_MS: (u32, u32) = (100, 150);
const APAC_CROSS_REGION_LATENCY_MS: (u32, u32) = (150, 200);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionStatus {
    /// Two-site layout: NA sites alone carry the whole workload
    FullWorkloadCovered,
    /// Two-site layout: NA sites cannot carry the whole workload
    FullWorkloadNotCovered,
    Sufficient,
    AdditionalCapacityNeeded,
}

impl RegionStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, RegionStatus::FullWorkloadCovered | RegionStatus::Sufficient)
    }

    pub fn describe(&self, region: Region) -> String {
        match self {
            RegionStatus::FullWorkloadCovered => {
                format!("Can handle full workload by {} physical CPUs", region.label())
            }
            RegionStatus::FullWorkloadNotCovered => {
                format!("{} sites cannot handle full workload", region.label())
            }
            RegionStatus::Sufficient => format!("Sufficient {} regional capacity", region.label()),
            RegionStatus::AdditionalCapacityNeeded => "Additional capacity needed".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionalRecommendation {
    /// Two sites must each hold 100 % of the load; a European site halves that
    AddEuropeanSite,
    MonitorDistribution,
    IncreaseEuropeanCapacity,
}

impl RegionalRecommendation {
    pub fn describe(&self) -> &'static str {
        match self {
            RegionalRecommendation::AddEuropeanSite => {
                "Two-site configuration requires each site to maintain 100% capacity; \
                 adding a European site reduces per-site failover requirements to 50%"
            }
            RegionalRecommendation::MonitorDistribution => {
                "Configuration provides good regional resilience; monitor EU/NA load distribution"
            }
            RegionalRecommendation::IncreaseEuropeanCapacity => {
                "Increase European capacity to fully support EU regional workload"
            }
        }
    }
}

/// Demand and supply for one region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionReport {
    pub region: Region,
    pub load_share: f64,
    pub peak_sessions: f64,
    pub required_cpu: f64,
    pub required_servers: Option<u64>,
    pub current_servers: u64,
    pub current_cpu: f64,
    pub status: RegionStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatencyExpectation {
    pub region: Region,
    pub in_region: bool,
    pub min_ms: u32,
    pub max_ms: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionalAnalysis {
    pub two_site_config: bool,
    pub north_america: RegionReport,
    /// Omitted for two-site layouts
    pub europe: Option<RegionReport>,
    pub latency: Vec<LatencyExpectation>,
    pub recommendation: RegionalRecommendation,
}

fn region_totals(sites: &[Site], region: Region) -> (u64, f64) {
    sites
        .iter()
        .filter(|s| s.region == region)
        .fold((0, 0.0), |(servers, cpu), s| {
            (servers + s.server_count() as u64, cpu + s.physical_cpu)
        })
}

fn demand(
    share: f64,
    target: &ResilienceTarget,
    cost: &SessionCost,
    physical_cpu_per_server: f64,
) -> (f64, f64, Option<u64>) {
    let peak_sessions = target.max_concurrent_sessions as f64 * share;
    let required_cpu = peak_sessions * cost.physical_cpu_per_session;
    (
        peak_sessions,
        required_cpu,
        servers_for_cpu(required_cpu, physical_cpu_per_server),
    )
}

pub fn regional_analysis(
    sites: &[Site],
    cost: &SessionCost,
    target: &ResilienceTarget,
    physical_cpu_per_server: f64,
) -> RegionalAnalysis {
    let two_site_config = sites.len() == 2;
    let full_workload_cpu = target.max_concurrent_sessions as f64 * cost.physical_cpu_per_session;

    let (na_servers, na_cpu) = region_totals(sites, Region::NorthAmerica);
    let (na_sessions, na_required, na_required_servers) = demand(
        NA_LOAD_SHARE,
        target,
        cost,
        physical_cpu_per_server,
    );
    let na_status = match (two_site_config, na_cpu >= full_workload_cpu, na_cpu >= na_required) {
        (true, true, _) => RegionStatus::FullWorkloadCovered,
        (true, false, _) => RegionStatus::FullWorkloadNotCovered,
        (false, _, true) => RegionStatus::Sufficient,
        (false, _, false) => RegionStatus::AdditionalCapacityNeeded,
    };

    let (eu_servers, eu_cpu) = region_totals(sites, Region::Europe);
    let (eu_sessions, eu_required, eu_required_servers) = demand(
        EU_LOAD_SHARE,
        target,
        cost,
        physical_cpu_per_server,
    );
    let eu_sufficient = eu_cpu >= eu_required;
    let europe = (!two_site_config).then(|| RegionReport {
        region: Region::Europe,
        load_share: EU_LOAD_SHARE,
        peak_sessions: eu_sessions,
        required_cpu: eu_required,
        required_servers: eu_required_servers,
        current_servers: eu_servers,
        current_cpu: eu_cpu,
        status: if eu_sufficient {
            RegionStatus::Sufficient
        } else {
            RegionStatus::AdditionalCapacityNeeded
        },
    });

    let recommendation = if two_site_config {
        RegionalRecommendation::AddEuropeanSite
    } else if eu_sufficient {
        RegionalRecommendation::MonitorDistribution
    } else {
        RegionalRecommendation::IncreaseEuropeanCapacity
    };

    RegionalAnalysis {
        two_site_config,
        north_america: RegionReport {
            region: Region::NorthAmerica,
            load_share: NA_LOAD_SHARE,
            peak_sessions: na_sessions,
            required_cpu: na_required,
            required_servers: na_required_servers,
            current_servers: na_servers,
            current_cpu: na_cpu,
            status: na_status,
        },
        europe,
        latency: latency_expectations(sites),
        recommendation,
    }
}

/// NA users are always served in-region; EU and APAC only with a local site
pub fn latency_expectations(sites: &[Site]) -> Vec<LatencyExpectation> {
    let has = |region| sites.iter().any(|s| s.region == region);

    [
        (Region::NorthAmerica, true, IN_REGION_LATENCY_MS),
        (Region::Europe, has(Region::Europe), EU_CROSS_REGION_LATENCY_MS),
        (Region::AsiaPacific, has(Region::AsiaPacific), APAC_CROSS_REGION_LATENCY_MS),
    ]
    .into_iter()
    .map(|(region, in_region, cross)| {
        let (min_ms, max_ms) = if in_region { IN_REGION_LATENCY_MS } else { cross };
        LatencyExpectation {
            region,
            in_region,
            min_ms,
            max_ms,
        }
    })
    .collect()
}
