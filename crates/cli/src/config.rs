//! Plan file management for the CLI

use anyhow::{Context, Result};
use planner_lib::Configuration;
use std::path::{Path, PathBuf};

/// Resolve the plan file path; an explicit override wins
pub fn plan_path(override_path: Option<&str>) -> Result<PathBuf> {
    if let Some(path) = override_path {
        return Ok(PathBuf::from(path));
    }

    let home = dirs_next::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("vdicap").join("plan.json"))
}

/// Load a plan, falling back to the reference plan when no file exists
pub fn load_plan(path: &Path) -> Result<Configuration> {
    if !path.exists() {
        return Ok(Configuration::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read plan file {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse plan file {}", path.display()))
}

/// Save a plan, creating parent directories as needed
pub fn save_plan(path: &Path, plan: &Configuration) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create plan directory")?;
    }

    let content = serde_json::to_string_pretty(plan).context("Failed to serialize plan")?;
    std::fs::write(path, content).context("Failed to write plan file")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_path_override() {
        let path = plan_path(Some("/tmp/custom.json")).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/custom.json"));
    }

    #[test]
    fn test_missing_plan_is_reference_plan() {
        let dir = tempfile::tempdir().unwrap();
        let plan = load_plan(&dir.path().join("absent.json")).unwrap();
        assert_eq!(plan, Configuration::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("plan.json");
        let plan = Configuration::default()
            .with_server_count(1, "42")
            .unwrap();

        save_plan(&path, &plan).unwrap();
        let loaded = load_plan(&path).unwrap();

        assert_eq!(loaded.sites[1].physical_server_count, Some(42));
        assert_eq!(loaded.sites[1].physical_cpu, 42.0 * 64.0);
    }

    #[test]
    fn test_corrupt_plan_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.json");
        std::fs::write(&path, "{oops").unwrap();

        let err = load_plan(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse plan file"));
    }
}
