//! Full capacity analysis report

use anyhow::Result;
use colored::Colorize;
use planner_lib::resilience::{FailoverScenario, RegionReport, RegionalAnalysis};
use planner_lib::{CapacitySnapshot, Configuration, LoadReport, ResilienceTarget};
use tabled::Tabled;

use crate::client::Backend;
use crate::commands::load::print_curve;
use crate::output::{
    color_capacity_status, color_failover_status, color_gap, color_ratio, format_count,
    format_cpu, format_optional_count, format_percent, format_timestamp, print_heading, print_json,
    print_subheading, print_success, print_warning, OutputFormat,
};

#[derive(Tabled)]
struct ScenarioRow {
    #[tabled(rename = "Failed Site")]
    failed_site: String,
    #[tabled(rename = "Remaining CPU")]
    remaining_capacity: String,
    #[tabled(rename = "Remaining Servers")]
    remaining_servers: String,
    #[tabled(rename = "Gap")]
    gap: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&FailoverScenario> for ScenarioRow {
    fn from(scenario: &FailoverScenario) -> Self {
        Self {
            failed_site: scenario.failed_site.clone(),
            remaining_capacity: format_cpu(scenario.remaining_capacity),
            remaining_servers: format_count(scenario.remaining_servers),
            gap: color_gap(scenario.gap, format_cpu(scenario.gap)),
            status: color_failover_status(scenario.status),
        }
    }
}

#[derive(Tabled)]
struct RegionRow {
    #[tabled(rename = "Region")]
    region: String,
    #[tabled(rename = "Share")]
    share: String,
    #[tabled(rename = "Peak Sessions")]
    peak_sessions: String,
    #[tabled(rename = "Required CPU")]
    required_cpu: String,
    #[tabled(rename = "Required Servers")]
    required_servers: String,
    #[tabled(rename = "Current Servers")]
    current_servers: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&RegionReport> for RegionRow {
    fn from(report: &RegionReport) -> Self {
        let status = report.status.describe(report.region);
        Self {
            region: report.region.label().to_string(),
            share: format!("{:.0}%", report.load_share * 100.0),
            peak_sessions: format!("{:.0}", report.peak_sessions),
            required_cpu: format_cpu(report.required_cpu),
            required_servers: format_optional_count(report.required_servers),
            current_servers: format_count(report.current_servers),
            status: if report.status.is_ok() {
                status.green().to_string()
            } else {
                status.red().to_string()
            },
        }
    }
}

/// Apply command-line edits to a plan, one revision per edit
pub fn apply_overrides(
    plan: Configuration,
    max_sessions: Option<u64>,
    coverage: Option<f64>,
    servers: &[String],
) -> Result<Configuration> {
    let mut plan = plan;

    if max_sessions.is_some() || coverage.is_some() {
        let target = ResilienceTarget {
            max_concurrent_sessions: max_sessions.unwrap_or(plan.target.max_concurrent_sessions),
            coverage_percent: coverage.unwrap_or(plan.target.coverage_percent),
        };
        plan = plan.with_target(target)?;
    }

    if !servers.is_empty() {
        planner_lib::plan::validate_site_count(servers.len())?;
        while plan.sites.len() < servers.len() {
            plan = plan.with_site_added()?;
        }
        while plan.sites.len() > servers.len() {
            plan = plan.with_site_removed()?;
        }
        for (index, raw) in servers.iter().enumerate() {
            plan = plan.with_server_count(index, raw)?;
        }
    }

    Ok(plan)
}

/// Evaluate the plan and print the report
pub async fn run_analysis(backend: &Backend, plan: &Configuration, format: OutputFormat) -> Result<()> {
    let snapshot = backend.evaluate(plan).await?;

    match format {
        OutputFormat::Json => print_json(&snapshot)?,
        OutputFormat::Table => print_report(&snapshot),
    }

    Ok(())
}

fn print_report(snapshot: &CapacitySnapshot) {
    let analysis = &snapshot.analysis;
    let cost = &snapshot.session_cost;

    print_heading(&format!("Capacity Analysis (revision {})", snapshot.revision));
    println!(
        "Generated:              {}",
        format_timestamp(snapshot.generated_at).dimmed()
    );
    println!(
        "Target sessions:        {}",
        format_count(analysis.metrics.target_sessions).cyan()
    );
    println!(
        "Per-session CPU:        {} physical / {} virtual",
        format_cpu(cost.physical_cpu_per_session),
        format_cpu(cost.virtual_cpu_per_session)
    );
    println!(
        "vCPU:pCPU ratio:        {} ({})",
        color_ratio(cost.oversubscription_ratio, snapshot.ratio_health),
        snapshot.ratio_health.describe()
    );
    println!();

    print_subheading("Normal Operations");
    println!("Required CPU:           {}", format_cpu(analysis.total_required_cpu));
    println!("Current capacity:       {}", format_cpu(analysis.current_capacity));
    println!(
        "Margin:                 {} ({})",
        format_cpu(analysis.normal_ops_margin),
        color_capacity_status(analysis.normal_ops_status)
    );
    println!(
        "Peak utilization:       {}",
        format_percent(snapshot.peak.utilization_percent)
    );
    println!(
        "Servers:                {} total, {} required, {} spare",
        format_count(snapshot.peak.total_servers),
        format_optional_count(snapshot.peak.required_servers),
        format_optional_count(snapshot.peak.margin_servers)
    );
    println!();

    print_subheading("Failover Scenarios");
    let rows: Vec<ScenarioRow> = analysis.failover_scenarios.iter().map(ScenarioRow::from).collect();
    let table = tabled::Table::new(rows)
        .with(tabled::settings::Style::rounded())
        .to_string();
    println!("{}", table);
    println!();

    if analysis.is_n1_resilient {
        print_success("N-1 resilient: any single site can fail");
    } else {
        print_warning(&format!(
            "Not N-1 resilient: worst-case gap {} CPU, add {} CPU",
            format_cpu(analysis.max_failover_gap),
            format_cpu(analysis.n1_deficit)
        ));
    }
    println!(
        "EU requirement:         {} CPU (gap {}, recommend {})",
        format_cpu(analysis.eu_required_cpu),
        color_gap(analysis.eu_gap, format_cpu(analysis.eu_gap)),
        format_cpu(analysis.eu_recommendation)
    );
    println!(
        "Usage efficiency:       {}",
        format_percent(analysis.metrics.usage_efficiency_percent)
    );
    println!("Resilience ROI:         {}%", analysis.metrics.roi_percent);
    println!();

    print_regional(&snapshot.regional);
    println!();

    print_subheading("Daily Load");
    print_curve(&LoadReport {
        points: snapshot.load_curve.clone(),
        distribution: snapshot.load_distribution.clone(),
    });
}

fn print_regional(regional: &RegionalAnalysis) {
    print_subheading("Regional Balance");

    let mut rows = vec![RegionRow::from(&regional.north_america)];
    rows.extend(regional.europe.iter().map(RegionRow::from));
    let table = tabled::Table::new(rows)
        .with(tabled::settings::Style::rounded())
        .to_string();
    println!("{}", table);

    for latency in &regional.latency {
        let place = if latency.in_region { "in-region" } else { "cross-region" };
        println!(
            "{:<6} latency:         {}-{} ms ({})",
            latency.region.label(),
            latency.min_ms,
            latency.max_ms,
            place
        );
    }

    println!();
    println!("{} {}", "Recommendation:".bold(), regional.recommendation.describe());
}
