//! Observability infrastructure for the capacity planner
//!
//! Provides:
//! - Prometheus metrics (evaluation latency, evaluation counts, N-1 exposure)
//! - Structured JSON logging with tracing

use prometheus::{
    register_gauge, register_histogram, register_int_counter, register_int_gauge, Gauge,
    Histogram, IntCounter, IntGauge,
};
use std::sync::OnceLock;
use tracing::{info, warn};

use crate::pipeline::CapacitySnapshot;
use crate::resilience::FailoverStatus;

/// Histogram buckets for evaluation latency (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.00001, 0.00005, 0.0001, 0.00025, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.05,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<PlannerMetricsInner> = OnceLock::new();

struct PlannerMetricsInner {
    evaluation_latency_seconds: Histogram,
    evaluations_total: IntCounter,
    evaluation_errors_total: IntCounter,
    at_risk_scenarios: IntGauge,
    n1_deficit_cpu: Gauge,
}

impl PlannerMetricsInner {
    fn new() -> Self {
        Self {
            evaluation_latency_seconds: register_histogram!(
                "capacity_planner_evaluation_latency_seconds",
                "Time spent evaluating a configuration",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register evaluation_latency_seconds"),

            evaluations_total: register_int_counter!(
                "capacity_planner_evaluations_total",
                "Total number of configurations evaluated"
            )
            .expect("Failed to register evaluations_total"),

            evaluation_errors_total: register_int_counter!(
                "capacity_planner_evaluation_errors_total",
                "Total number of configurations rejected"
            )
            .expect("Failed to register evaluation_errors_total"),

            at_risk_scenarios: register_int_gauge!(
                "capacity_planner_at_risk_scenarios",
                "At-risk failover scenarios in the latest evaluation"
            )
            .expect("Failed to register at_risk_scenarios"),

            n1_deficit_cpu: register_gauge!(
                "capacity_planner_n1_deficit_cpu",
                "Summed N-1 physical CPU deficit in the latest evaluation"
            )
            .expect("Failed to register n1_deficit_cpu"),
        }
    }
}

/// Planner metrics for Prometheus exposition
///
/// Lightweight handle to the global metrics instance; clones share the
/// same underlying metrics.
#[derive(Clone)]
pub struct PlannerMetrics {
    _private: (),
}

impl Default for PlannerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl PlannerMetrics {
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(PlannerMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &PlannerMetricsInner {
        GLOBAL_METRICS.get_or_init(PlannerMetricsInner::new)
    }

    pub fn observe_evaluation_latency(&self, duration_secs: f64) {
        self.inner().evaluation_latency_seconds.observe(duration_secs);
    }

    /// Record a successful evaluation and its N-1 exposure
    pub fn record_snapshot(&self, snapshot: &CapacitySnapshot) {
        let inner = self.inner();
        inner.evaluations_total.inc();
        inner.at_risk_scenarios.set(at_risk_count(snapshot) as i64);
        inner.n1_deficit_cpu.set(snapshot.analysis.n1_deficit);
    }

    pub fn inc_evaluation_errors(&self) {
        self.inner().evaluation_errors_total.inc();
    }
}

fn at_risk_count(snapshot: &CapacitySnapshot) -> usize {
    snapshot
        .analysis
        .failover_scenarios
        .iter()
        .filter(|s| s.status == FailoverStatus::AtRisk)
        .count()
}

/// Structured logger for planner events
#[derive(Clone)]
pub struct StructuredLogger {
    instance: String,
}

impl StructuredLogger {
    pub fn new(instance: impl Into<String>) -> Self {
        Self {
            instance: instance.into(),
        }
    }

    /// Log a completed evaluation, plus one warning per at-risk site
    pub fn log_analysis(&self, snapshot: &CapacitySnapshot) {
        let analysis = &snapshot.analysis;
        info!(
            event = "analysis_completed",
            instance = %self.instance,
            revision = snapshot.revision,
            sites = snapshot.sites.len(),
            target_sessions = analysis.metrics.target_sessions,
            normal_ops_margin = analysis.normal_ops_margin,
            n1_deficit = analysis.n1_deficit,
            eu_gap = analysis.eu_gap,
            "Capacity analysis completed"
        );

        for scenario in analysis
            .failover_scenarios
            .iter()
            .filter(|s| s.status == FailoverStatus::AtRisk)
        {
            warn!(
                event = "capacity_at_risk",
                instance = %self.instance,
                revision = snapshot.revision,
                failed_site = %scenario.failed_site,
                remaining_capacity = scenario.remaining_capacity,
                gap = scenario.gap,
                "Site failure would leave insufficient capacity"
            );
        }
    }

    pub fn log_rejected(&self, revision: u64, reason: &str) {
        warn!(
            event = "analysis_rejected",
            instance = %self.instance,
            revision = revision,
            reason = %reason,
            "Configuration rejected"
        );
    }

    pub fn log_startup(&self, version: &str) {
        info!(
            event = "planner_started",
            instance = %self.instance,
            version = %version,
            "Capacity planner started"
        );
    }

    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "planner_shutdown",
            instance = %self.instance,
            reason = %reason,
            "Capacity planner shutting down"
        );
    }
}
