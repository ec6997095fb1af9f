//! VDI Capacity Planner CLI
//!
//! Sizes multi-site virtual desktop deployments from the terminal:
//! per-session CPU cost, site capacity, N-1 failover analysis and the
//! daily load profile.

mod client;
mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{analyze, cost, init, load, sites};
use tracing_subscriber::EnvFilter;

/// VDI Capacity Planner CLI
#[derive(Parser)]
#[command(name = "vdicap")]
#[command(author, version, about = "CLI for the VDI Capacity Planner", long_about = None)]
pub struct Cli {
    /// Planner server URL; computes locally when not set
    #[arg(long, env = "VDICAP_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Path to the plan file (defaults to ~/.config/vdicap/plan.json)
    #[arg(long, env = "VDICAP_PLAN", global = true)]
    pub plan: Option<String>,

    /// Output format
    #[arg(long, short, default_value = "table", global = true)]
    pub format: output::OutputFormat,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Per-session CPU cost
    #[command(subcommand)]
    Cost(CostCommands),

    /// Show site capacity for the plan
    Sites,

    /// Run the full capacity and resilience analysis
    Analyze {
        /// Override the maximum concurrent sessions
        #[arg(long)]
        max_sessions: Option<u64>,

        /// Override the failover coverage percentage (1-100)
        #[arg(long)]
        coverage: Option<f64>,

        /// Physical server count per site, comma separated (2-4 sites)
        #[arg(long, value_delimiter = ',')]
        servers: Vec<String>,
    },

    /// Show the 24-hour load profile
    Load {
        /// Session ceiling for the curve (defaults to the plan target)
        #[arg(long)]
        max_sessions: Option<u64>,
    },

    /// Write the default plan file
    Init {
        /// Overwrite an existing plan file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum CostCommands {
    /// Derive session cost from a server profile
    Spec {
        /// Physical CPUs per server
        #[arg(long)]
        physical_cpu: Option<f64>,

        /// VMs per server
        #[arg(long)]
        vms: Option<u32>,

        /// vCPUs per VM
        #[arg(long)]
        vcpu: Option<f64>,

        /// Maximum sessions per VM
        #[arg(long)]
        sessions_per_vm: Option<u32>,
    },

    /// Derive virtual cost from a physical CPU per session
    FromPhysical {
        /// Physical CPU per session
        value: f64,

        /// vCPU:pCPU oversubscription ratio
        #[arg(long)]
        ratio: f64,
    },

    /// Derive physical cost from a virtual CPU per session
    FromVirtual {
        /// Virtual CPU per session
        value: f64,

        /// vCPU:pCPU oversubscription ratio
        #[arg(long)]
        ratio: f64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }

    let plan_path = config::plan_path(cli.plan.as_deref())?;

    match cli.command {
        Commands::Init { force } => {
            init::init_plan(&plan_path, force)?;
        }
        Commands::Cost(cost_cmd) => match cost_cmd {
            CostCommands::Spec {
                physical_cpu,
                vms,
                vcpu,
                sessions_per_vm,
            } => {
                let plan = config::load_plan(&plan_path)?;
                let spec = cost::override_spec(plan.server_spec, physical_cpu, vms, vcpu, sessions_per_vm);
                cost::show_spec_cost(spec, cli.format)?;
            }
            CostCommands::FromPhysical { value, ratio } => {
                cost::show_from_physical(value, ratio, cli.format)?;
            }
            CostCommands::FromVirtual { value, ratio } => {
                cost::show_from_virtual(value, ratio, cli.format)?;
            }
        },
        Commands::Sites => {
            let plan = config::load_plan(&plan_path)?;
            sites::show_sites(&plan, cli.format)?;
        }
        Commands::Analyze {
            max_sessions,
            coverage,
            servers,
        } => {
            let backend = client::Backend::from_api_url(cli.api_url.as_deref())?;
            let plan = config::load_plan(&plan_path)?;
            let plan = analyze::apply_overrides(plan, max_sessions, coverage, &servers)?;
            analyze::run_analysis(&backend, &plan, cli.format).await?;
        }
        Commands::Load { max_sessions } => {
            let backend = client::Backend::from_api_url(cli.api_url.as_deref())?;
            let max_sessions = match max_sessions {
                Some(n) => n,
                None => config::load_plan(&plan_path)?.target.max_concurrent_sessions,
            };
            load::show_load(&backend, max_sessions, cli.format).await?;
        }
    }

    Ok(())
}
