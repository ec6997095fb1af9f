//! N-1 failover analysis
//!
//! Every site is treated as the one that fails, one at a time. Each
//! scenario compares the CPU left on the surviving sites against the CPU the
//! resilience target requires.

use serde::{Deserialize, Serialize};

use crate::cost::SessionCost;
use crate::error::Result;
use crate::models::{finite, round_half_up, Region, ResilienceTarget, Site};
use crate::plan::validate_site_count;
use crate::site::{servers_for_cpu, total_physical_cpu, total_servers};

/// Share of sessions assumed to originate in Europe
pub const EU_LOAD_SHARE: f64 = 0.34;

/// Share of sessions assumed to originate in North America
pub const NA_LOAD_SHARE: f64 = 0.66;

/// Capacity verdict under normal operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapacityStatus {
    Sufficient,
    Insufficient,
}

/// Verdict for a single-site failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailoverStatus {
    Resilient,
    AtRisk,
}

impl FailoverStatus {
    pub fn label(&self) -> &'static str {
        match self {
            FailoverStatus::Resilient => "Resilient",
            FailoverStatus::AtRisk => "At Risk",
        }
    }
}

/// Outcome of losing one site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailoverScenario {
    pub failed_site: String,
    pub remaining_capacity: f64,
    pub remaining_servers: u64,
    /// Required minus remaining; positive is a deficit
    pub gap: f64,
    pub status: FailoverStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMetrics {
    pub target_sessions: u64,
    /// `None` when there is no capacity to divide by
    pub usage_efficiency_percent: Option<i64>,
    pub roi_percent: i64,
}

/// Full resilience snapshot for one configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceAnalysis {
    pub total_required_cpu: f64,
    pub current_capacity: f64,
    pub normal_ops_margin: f64,
    pub normal_ops_status: CapacityStatus,
    pub failover_scenarios: Vec<FailoverScenario>,
    /// Largest single-site deficit, floored at zero
    pub max_failover_gap: f64,
    /// Sum of the positive scenario gaps
    pub n1_deficit: f64,
    pub is_n1_resilient: bool,
    pub eu_required_cpu: f64,
    /// Negative values are surplus
    pub eu_gap: f64,
    pub eu_recommendation: f64,
    pub metrics: AnalysisMetrics,
}

/// Run the resilience analysis.
///
/// Fails only when the site count is outside the supported range. A
/// non-finite session cost is carried through as-is; validate the server
/// spec before calling.
pub fn analyze(
    sites: &[Site],
    cost: &SessionCost,
    target: &ResilienceTarget,
) -> Result<ResourceAnalysis> {
    validate_site_count(sites.len())?;

    let target_sessions = target.target_sessions();
    let total_required_cpu = target_sessions as f64 * cost.physical_cpu_per_session;
    let current_capacity = total_physical_cpu(sites);

    let normal_ops_margin = current_capacity - total_required_cpu;
    let normal_ops_status = if normal_ops_margin >= 0.0 {
        CapacityStatus::Sufficient
    } else {
        CapacityStatus::Insufficient
    };

    let failover_scenarios = failover_scenarios(sites, total_required_cpu);

    let max_failover_gap = failover_scenarios
        .iter()
        .map(|s| s.gap)
        .fold(0.0_f64, f64::max);
    let n1_deficit = failover_scenarios
        .iter()
        .map(|s| s.gap.max(0.0))
        .sum::<f64>();
    let is_n1_resilient = failover_scenarios.iter().all(|s| s.gap <= 0.0);

    let eu_sessions = target_sessions as f64 * EU_LOAD_SHARE;
    let eu_required_cpu = (eu_sessions * cost.physical_cpu_per_session).ceil();
    let eu_gap = match sites.iter().find(|s| s.region == Region::Europe) {
        Some(site) => eu_required_cpu - site.physical_cpu,
        None => eu_required_cpu,
    };

    let usage_efficiency_percent = if current_capacity > 0.0 {
        finite(round_half_up(total_required_cpu / current_capacity * 100.0)).map(|v| v as i64)
    } else {
        None
    };
    let roi_percent = if current_capacity > 0.0 {
        round_half_up(target_sessions as f64 / current_capacity * 100.0) as i64
    } else {
        0
    };

    Ok(ResourceAnalysis {
        total_required_cpu,
        current_capacity,
        normal_ops_margin,
        normal_ops_status,
        failover_scenarios,
        max_failover_gap,
        n1_deficit,
        is_n1_resilient,
        eu_required_cpu,
        eu_gap,
        eu_recommendation: eu_gap.max(0.0),
        metrics: AnalysisMetrics {
            target_sessions,
            usage_efficiency_percent,
            roi_percent,
        },
    })
}

/// One scenario per site, in site order
pub fn failover_scenarios(sites: &[Site], total_required_cpu: f64) -> Vec<FailoverScenario> {
    sites
        .iter()
        .enumerate()
        .map(|(failed, site)| {
            let survivors = sites
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != failed)
                .map(|(_, s)| s);

            let (remaining_capacity, remaining_servers) = survivors
                .fold((0.0, 0u64), |(cpu, servers), s| {
                    (cpu + s.physical_cpu, servers + s.server_count() as u64)
                });

            let status = if remaining_capacity >= total_required_cpu {
                FailoverStatus::Resilient
            } else {
                FailoverStatus::AtRisk
            };

            FailoverScenario {
                failed_site: site.name.clone(),
                remaining_capacity,
                remaining_servers,
                gap: total_required_cpu - remaining_capacity,
                status,
            }
        })
        .collect()
}

/// Normal-operations figures at full (100 %) session volume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakLoad {
    pub total_servers: u64,
    pub required_cpu: f64,
    pub required_servers: Option<u64>,
    pub margin_servers: Option<u64>,
    /// Share of total capacity the peak consumes; `None` without capacity
    pub utilization_percent: Option<i64>,
}

pub fn peak_load(
    sites: &[Site],
    cost: &SessionCost,
    target: &ResilienceTarget,
    physical_cpu_per_server: f64,
    normal_ops_margin: f64,
) -> PeakLoad {
    let required_cpu = target.max_concurrent_sessions as f64 * cost.physical_cpu_per_session;
    let capacity = total_physical_cpu(sites);

    let utilization_percent = if capacity > 0.0 {
        finite(round_half_up(required_cpu / capacity * 100.0)).map(|v| v as i64)
    } else {
        None
    };

    PeakLoad {
        total_servers: total_servers(sites),
        required_cpu,
        required_servers: servers_for_cpu(required_cpu, physical_cpu_per_server),
        margin_servers: servers_for_cpu(normal_ops_margin, physical_cpu_per_server),
        utilization_percent,
    }
}
