//! Per-session cost commands

use anyhow::Result;
use colored::Colorize;
use planner_lib::{RatioHealth, ServerSpec, SessionCost};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{color_ratio, format_cpu, format_count, print_heading, print_json, OutputFormat};

#[derive(Tabled)]
struct CostRow {
    #[tabled(rename = "Metric")]
    metric: String,
    #[tabled(rename = "Value")]
    value: String,
}

#[derive(Serialize)]
struct CostReport {
    server_spec: Option<ServerSpec>,
    session_cost: SessionCost,
    ratio_health: RatioHealth,
}

/// Apply flag overrides on top of a plan's server profile
pub fn override_spec(
    base: ServerSpec,
    physical_cpu: Option<f64>,
    vms: Option<u32>,
    vcpu: Option<f64>,
    sessions_per_vm: Option<u32>,
) -> ServerSpec {
    ServerSpec {
        physical_cpu_per_server: physical_cpu.unwrap_or(base.physical_cpu_per_server),
        vms_per_server: vms.unwrap_or(base.vms_per_server),
        vcpu_per_vm: vcpu.unwrap_or(base.vcpu_per_vm),
        max_sessions_per_vm: sessions_per_vm.unwrap_or(base.max_sessions_per_vm),
    }
}

/// Session cost derived from a server hardware profile
pub fn show_spec_cost(spec: ServerSpec, format: OutputFormat) -> Result<()> {
    spec.validate()?;
    let cost = SessionCost::from_server_spec(&spec);
    render(Some(spec), cost, format)
}

pub fn show_from_physical(physical_cpu_per_session: f64, ratio: f64, format: OutputFormat) -> Result<()> {
    render(None, SessionCost::from_physical(physical_cpu_per_session, ratio), format)
}

pub fn show_from_virtual(virtual_cpu_per_session: f64, ratio: f64, format: OutputFormat) -> Result<()> {
    render(None, SessionCost::from_virtual(virtual_cpu_per_session, ratio), format)
}

fn render(spec: Option<ServerSpec>, cost: SessionCost, format: OutputFormat) -> Result<()> {
    let health = cost.ratio_health();

    match format {
        OutputFormat::Json => print_json(&CostReport {
            server_spec: spec,
            session_cost: cost.rounded(),
            ratio_health: health,
        })?,
        OutputFormat::Table => {
            print_heading("Session Cost");

            let mut rows = Vec::new();
            if let Some(spec) = &spec {
                rows.push(CostRow {
                    metric: "Physical CPUs per server".to_string(),
                    value: format_cpu(spec.physical_cpu_per_server),
                });
                rows.push(CostRow {
                    metric: "VMs per server".to_string(),
                    value: spec.vms_per_server.to_string(),
                });
                rows.push(CostRow {
                    metric: "vCPUs per VM".to_string(),
                    value: format_cpu(spec.vcpu_per_vm),
                });
                rows.push(CostRow {
                    metric: "Sessions per server".to_string(),
                    value: format_count(spec.sessions_per_server()),
                });
            }
            rows.push(CostRow {
                metric: "Physical CPU per session".to_string(),
                value: format_cpu(cost.physical_cpu_per_session),
            });
            rows.push(CostRow {
                metric: "Virtual CPU per session".to_string(),
                value: format_cpu(cost.virtual_cpu_per_session),
            });
            rows.push(CostRow {
                metric: "vCPU:pCPU ratio".to_string(),
                value: color_ratio(cost.oversubscription_ratio, health),
            });

            let table = tabled::Table::new(rows)
                .with(tabled::settings::Style::rounded())
                .to_string();
            println!("{}", table);
            println!();
            println!("{}", health.describe().dimmed());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_spec_keeps_unset_fields() {
        let spec = override_spec(ServerSpec::default(), None, Some(8), None, None);
        assert_eq!(spec.vms_per_server, 8);
        assert_eq!(spec.physical_cpu_per_server, 64.0);
        assert_eq!(spec.max_sessions_per_vm, 2);
    }

    #[test]
    fn test_invalid_spec_is_rejected() {
        let spec = override_spec(ServerSpec::default(), None, None, None, Some(0));
        let err = show_spec_cost(spec, OutputFormat::Json).unwrap_err();
        assert!(err.to_string().contains("max_sessions_per_vm"));
    }
}
