//! Plan file initialization

use anyhow::Result;
use planner_lib::Configuration;
use std::path::Path;

use crate::config::save_plan;
use crate::output::{print_info, print_success};

/// Write the reference plan to `path`
pub fn init_plan(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Plan file {} already exists (use --force to overwrite)",
            path.display()
        );
    }

    save_plan(path, &Configuration::default())?;
    print_success(&format!("Wrote plan to {}", path.display()));
    print_info("Edit server counts and targets there, then run `vdicap analyze`");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_plan;

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.json");
        std::fs::write(&path, "{}").unwrap();

        assert!(init_plan(&path, false).is_err());
        init_plan(&path, true).unwrap();
        assert_eq!(load_plan(&path).unwrap(), Configuration::default());
    }
}
