//! Revisioned planning configuration
//!
//! A [`Configuration`] is never edited in place: every edit returns the next
//! revision with all derived site values recomputed from the new inputs.

use serde::{Deserialize, Serialize};

use crate::error::{CapacityError, Result};
use crate::models::{ResilienceTarget, ServerSpec, Site, MAX_SITES, MIN_SITES};
use crate::site::{parse_server_count, site_physical_cpu};

/// Everything the capacity model needs to produce a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ConfigurationRecord")]
pub struct Configuration {
    pub revision: u64,
    pub server_spec: ServerSpec,
    pub sites: Vec<Site>,
    pub target: ResilienceTarget,
}

#[derive(Deserialize)]
struct ConfigurationRecord {
    #[serde(default)]
    revision: u64,
    #[serde(default)]
    server_spec: ServerSpec,
    sites: Vec<Site>,
    #[serde(default)]
    target: ResilienceTarget,
}

impl From<ConfigurationRecord> for Configuration {
    fn from(record: ConfigurationRecord) -> Self {
        // Site CPU on the wire is ignored; it is always derived from the server profile
        Self::assemble(record.revision, record.server_spec, record.sites, record.target)
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new(
            ServerSpec::default(),
            vec![Site::for_slot(1), Site::for_slot(2)]
                .into_iter()
                .map(|site| Site {
                    physical_server_count: Some(60),
                    ..site
                })
                .collect(),
            ResilienceTarget::default(),
        )
    }
}

impl Configuration {
    /// First revision of a configuration
    pub fn new(server_spec: ServerSpec, sites: Vec<Site>, target: ResilienceTarget) -> Self {
        Self::assemble(0, server_spec, sites, target)
    }

    fn assemble(
        revision: u64,
        server_spec: ServerSpec,
        sites: Vec<Site>,
        target: ResilienceTarget,
    ) -> Self {
        let sites = sites
            .into_iter()
            .map(|site| Site {
                physical_cpu: site_physical_cpu(
                    site.physical_server_count,
                    server_spec.physical_cpu_per_server,
                ),
                ..site
            })
            .collect();

        Self {
            revision,
            server_spec,
            sites,
            target,
        }
    }

    fn next(&self, server_spec: ServerSpec, sites: Vec<Site>, target: ResilienceTarget) -> Self {
        Self::assemble(self.revision + 1, server_spec, sites, target)
    }

    /// Replace the server profile; every site's CPU follows
    pub fn with_server_spec(&self, server_spec: ServerSpec) -> Self {
        self.next(server_spec, self.sites.clone(), self.target)
    }

    /// Apply a raw server-count edit to one site
    pub fn with_server_count(&self, index: usize, raw: &str) -> Result<Self> {
        self.check_index(index)?;
        let count = parse_server_count(raw)?;

        let mut sites = self.sites.clone();
        sites[index].physical_server_count = count;
        Ok(self.next(self.server_spec, sites, self.target))
    }

    pub fn with_site_name(&self, index: usize, name: &str) -> Result<Self> {
        self.check_index(index)?;
        if name.trim().is_empty() {
            return Err(CapacityError::EmptySiteName);
        }

        let mut sites = self.sites.clone();
        sites[index].name = name.to_string();
        Ok(self.next(self.server_spec, sites, self.target))
    }

    /// Append the default site for the next slot
    pub fn with_site_added(&self) -> Result<Self> {
        if self.sites.len() >= MAX_SITES {
            return Err(CapacityError::SiteLimit {
                action: "add",
                count: self.sites.len(),
            });
        }

        let mut sites = self.sites.clone();
        sites.push(Site::for_slot(sites.len() + 1));
        Ok(self.next(self.server_spec, sites, self.target))
    }

    /// Drop the last site
    pub fn with_site_removed(&self) -> Result<Self> {
        if self.sites.len() <= MIN_SITES {
            return Err(CapacityError::SiteLimit {
                action: "remove",
                count: self.sites.len(),
            });
        }

        let mut sites = self.sites.clone();
        sites.pop();
        Ok(self.next(self.server_spec, sites, self.target))
    }

    pub fn with_target(&self, target: ResilienceTarget) -> Result<Self> {
        validate_target(&target)?;
        Ok(self.next(self.server_spec, self.sites.clone(), target))
    }

    /// Check everything the derivations assume about their inputs
    pub fn validate(&self) -> Result<()> {
        self.server_spec.validate()?;
        validate_site_count(self.sites.len())?;
        if self.sites.iter().any(|s| s.name.trim().is_empty()) {
            return Err(CapacityError::EmptySiteName);
        }
        validate_target(&self.target)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.sites.len() {
            Ok(())
        } else {
            Err(CapacityError::SiteIndex {
                index,
                len: self.sites.len(),
            })
        }
    }
}

pub fn validate_site_count(count: usize) -> Result<()> {
    if (MIN_SITES..=MAX_SITES).contains(&count) {
        Ok(())
    } else {
        Err(CapacityError::SiteCount { count })
    }
}

fn validate_target(target: &ResilienceTarget) -> Result<()> {
    if (1.0..=100.0).contains(&target.coverage_percent) {
        Ok(())
    } else {
        Err(CapacityError::InvalidCoverage {
            value: target.coverage_percent,
        })
    }
}
