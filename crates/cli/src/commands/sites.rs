//! Site capacity command

use anyhow::Result;
use colored::Colorize;
use planner_lib::site::{site_capacities, SiteCapacity};
use planner_lib::{Configuration, SessionCost};
use tabled::Tabled;

use crate::output::{format_count, format_cpu, format_optional_count, print_heading, print_json, OutputFormat};

#[derive(Tabled)]
struct SiteRow {
    #[tabled(rename = "Site")]
    name: String,
    #[tabled(rename = "Region")]
    region: String,
    #[tabled(rename = "Servers")]
    servers: String,
    #[tabled(rename = "Physical CPU")]
    physical_cpu: String,
    #[tabled(rename = "Sessions")]
    sessions: String,
}

impl From<&SiteCapacity> for SiteRow {
    fn from(site: &SiteCapacity) -> Self {
        Self {
            name: site.name.clone(),
            region: site.region.label().to_string(),
            servers: site
                .physical_server_count
                .map(|c| c.to_string())
                .unwrap_or_else(|| "-".to_string()),
            physical_cpu: format_cpu(site.physical_cpu),
            sessions: format_optional_count(site.supported_sessions),
        }
    }
}

/// Show per-site capacity for the plan
pub fn show_sites(plan: &Configuration, format: OutputFormat) -> Result<()> {
    plan.validate()?;
    let cost = SessionCost::from_server_spec(&plan.server_spec);
    let sites = site_capacities(&plan.sites, &cost);

    match format {
        OutputFormat::Json => print_json(&sites)?,
        OutputFormat::Table => {
            print_heading("Site Capacity");

            let rows: Vec<SiteRow> = sites.iter().map(SiteRow::from).collect();
            let table = tabled::Table::new(rows)
                .with(tabled::settings::Style::rounded())
                .to_string();
            println!("{}", table);
            println!();

            let total_cpu: f64 = sites.iter().map(|s| s.physical_cpu).sum();
            let total_sessions: u64 = sites.iter().filter_map(|s| s.supported_sessions).sum();
            println!("Total physical CPU:     {}", format_cpu(total_cpu).cyan());
            println!("Total sessions:         {}", format_count(total_sessions).cyan());
        }
    }

    Ok(())
}
