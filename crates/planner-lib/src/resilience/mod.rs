//! Resilience analysis
//!
//! This module provides:
//! - Normal-operations margin and N-1 failover scenarios
//! - The European regional gap
//! - Regional (NA / EU / APAC) balance for reporting

mod analyzer;
mod regional;

pub use analyzer::{
    analyze, failover_scenarios, peak_load, AnalysisMetrics, CapacityStatus, FailoverScenario,
    FailoverStatus, PeakLoad, ResourceAnalysis, EU_LOAD_SHARE, NA_LOAD_SHARE,
};
pub use regional::{
    latency_expectations, regional_analysis, LatencyExpectation, RegionReport, RegionStatus,
    RegionalAnalysis, RegionalRecommendation,
};
