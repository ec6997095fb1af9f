//! Server configuration

use anyhow::{Context, Result};
use planner_lib::Configuration;
use serde::Deserialize;
use std::path::Path;

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Instance name attached to every structured log event
    #[serde(default = "default_instance_name")]
    pub instance_name: String,

    /// Port for the calculator API, health and metrics
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Optional JSON plan served as the baseline configuration
    #[serde(default)]
    pub plan_file: Option<String>,
}

fn default_instance_name() -> String {
    std::env::var("HOSTNAME").unwrap_or_else(|_| "unknown".to_string())
}

fn default_api_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            instance_name: default_instance_name(),
            api_port: default_api_port(),
            plan_file: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from `PLANNER_*` environment variables
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("PLANNER").try_parsing(true))
            .build()?;

        Ok(config.try_deserialize().unwrap_or_default())
    }

    /// Baseline plan: the configured file, or the reference deployment
    pub fn baseline_plan(&self) -> Result<Configuration> {
        match &self.plan_file {
            Some(path) => load_plan(Path::new(path)),
            None => Ok(Configuration::default()),
        }
    }
}

/// Read and validate a JSON plan file
pub fn load_plan(path: &Path) -> Result<Configuration> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read plan file {}", path.display()))?;
    let plan: Configuration =
        serde_json::from_str(&content).context("Failed to parse plan file")?;
    plan.validate().context("Plan file is not a valid configuration")?;
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_baseline_is_reference_plan() {
        let config = ServerConfig::default();
        assert_eq!(config.api_port, 8080);
        assert_eq!(config.baseline_plan().unwrap(), Configuration::default());
    }

    #[test]
    fn test_load_plan_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"sites":[{{"name":"SLC","physical_server_count":10}},{{"name":"AMS","physical_server_count":5}}]}}"#
        )
        .unwrap();

        let plan = load_plan(file.path()).unwrap();
        assert_eq!(plan.sites[1].physical_cpu, 320.0);
    }

    #[test]
    fn test_load_plan_rejects_single_site() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"sites":[{{"name":"SLC","physical_server_count":10}}]}}"#).unwrap();

        assert!(load_plan(file.path()).is_err());
    }

    #[test]
    fn test_missing_plan_file() {
        let config = ServerConfig {
            plan_file: Some("/nonexistent/plan.json".to_string()),
            ..ServerConfig::default()
        };
        let err = config.baseline_plan().unwrap_err();
        assert!(err.to_string().contains("Failed to read plan file"));
    }
}
