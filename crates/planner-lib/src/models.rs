//! Core data models for the capacity planner

use serde::{Deserialize, Serialize};

/// Fewest sites a deployment may have
pub const MIN_SITES: usize = 2;

/// Most sites a deployment may have
pub const MAX_SITES: usize = 4;

/// Hardware profile shared by every physical server in the deployment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ServerSpec {
    pub physical_cpu_per_server: f64,
    pub vms_per_server: u32,
    pub vcpu_per_vm: f64,
    pub max_sessions_per_vm: u32,
}

impl Default for ServerSpec {
    fn default() -> Self {
        Self {
            physical_cpu_per_server: 64.0,
            vms_per_server: 16,
            vcpu_per_vm: 8.0,
            max_sessions_per_vm: 2,
        }
    }
}

impl ServerSpec {
    /// Virtual CPUs allocated across all VMs on one server
    pub fn total_vcpus(&self) -> f64 {
        self.vms_per_server as f64 * self.vcpu_per_vm
    }

    /// Sessions a single fully-loaded server can host
    pub fn sessions_per_server(&self) -> u64 {
        self.vms_per_server as u64 * self.max_sessions_per_vm as u64
    }
}

/// Geographic region a site serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    NorthAmerica,
    Europe,
    AsiaPacific,
    Other,
}

impl Region {
    /// Infer a region from a legacy site name.
    ///
    /// Only used when a configuration arrives without an explicit tag;
    /// matching is a case-sensitive substring check on the site code.
    pub fn infer_from_name(name: &str) -> Self {
        if name.contains("AMS") {
            Region::Europe
        } else if name.contains("BLR") {
            Region::AsiaPacific
        } else if name.contains("SLC") || name.contains("LVS") {
            Region::NorthAmerica
        } else {
            Region::Other
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Region::NorthAmerica => "NA",
            Region::Europe => "EU",
            Region::AsiaPacific => "APAC",
            Region::Other => "Other",
        }
    }
}

/// A data center hosting session servers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SiteRecord")]
pub struct Site {
    pub name: String,
    pub region: Region,
    /// `None` while the count field is blank
    pub physical_server_count: Option<u32>,
    pub physical_cpu: f64,
}

/// Wire form of a site; the region tag is optional for older plans
#[derive(Deserialize)]
struct SiteRecord {
    name: String,
    #[serde(default)]
    region: Option<Region>,
    #[serde(default)]
    physical_server_count: Option<u32>,
    #[serde(default)]
    physical_cpu: f64,
}

impl From<SiteRecord> for Site {
    fn from(record: SiteRecord) -> Self {
        let region = record
            .region
            .unwrap_or_else(|| Region::infer_from_name(&record.name));
        Self {
            name: record.name,
            region,
            physical_server_count: record.physical_server_count,
            physical_cpu: record.physical_cpu,
        }
    }
}

/// Default site codes by 1-based slot
const SLOT_DEFAULTS: [(&str, Region); MAX_SITES] = [
    ("SLC", Region::NorthAmerica),
    ("LVS", Region::NorthAmerica),
    ("AMS", Region::Europe),
    ("BLR", Region::AsiaPacific),
];

impl Site {
    pub fn new(name: impl Into<String>, region: Region, physical_server_count: u32) -> Self {
        Self {
            name: name.into(),
            region,
            physical_server_count: Some(physical_server_count),
            physical_cpu: 0.0,
        }
    }

    /// Empty site for the given 1-based slot
    pub fn for_slot(slot: usize) -> Self {
        match slot.checked_sub(1).and_then(|i| SLOT_DEFAULTS.get(i)) {
            Some((name, region)) => Site::new(*name, *region, 0),
            None => Site::new(format!("Site {}", slot), Region::Other, 0),
        }
    }

    /// Server count with the blank state read as zero
    pub fn server_count(&self) -> u32 {
        self.physical_server_count.unwrap_or(0)
    }
}

/// Session volume the deployment must withstand
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResilienceTarget {
    pub max_concurrent_sessions: u64,
    /// Percentage of `max_concurrent_sessions` that must survive a site loss
    pub coverage_percent: f64,
}

impl Default for ResilienceTarget {
    fn default() -> Self {
        Self {
            max_concurrent_sessions: 2000,
            coverage_percent: 100.0,
        }
    }
}

impl ResilienceTarget {
    /// Sessions that must be carried after a single-site failure
    pub fn target_sessions(&self) -> u64 {
        round_half_up(self.max_concurrent_sessions as f64 * self.coverage_percent / 100.0).max(0.0)
            as u64
    }
}

/// Round halves toward positive infinity
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Round to a fixed number of decimal places for display
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Keep a value only if it is finite
pub fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_inference_from_legacy_names() {
        assert_eq!(Region::infer_from_name("eBay SLC"), Region::NorthAmerica);
        assert_eq!(Region::infer_from_name("eBay LVS"), Region::NorthAmerica);
        assert_eq!(Region::infer_from_name("eBay AMS"), Region::Europe);
        assert_eq!(Region::infer_from_name("eBay BLR"), Region::AsiaPacific);
        assert_eq!(Region::infer_from_name("ams"), Region::Other);
    }

    #[test]
    fn test_site_deserializes_without_region() {
        let site: Site =
            serde_json::from_str(r#"{"name":"eBay AMS","physical_server_count":12}"#).unwrap();
        assert_eq!(site.region, Region::Europe);
        assert_eq!(site.physical_server_count, Some(12));
    }

    #[test]
    fn test_explicit_region_wins_over_name() {
        let site: Site =
            serde_json::from_str(r#"{"name":"AMS lab","region":"north_america"}"#).unwrap();
        assert_eq!(site.region, Region::NorthAmerica);
        assert_eq!(site.physical_server_count, None);
    }

    #[test]
    fn test_slot_defaults() {
        assert_eq!(Site::for_slot(3).name, "AMS");
        assert_eq!(Site::for_slot(3).region, Region::Europe);
        assert_eq!(Site::for_slot(4).region, Region::AsiaPacific);
        assert_eq!(Site::for_slot(5).name, "Site 5");
        assert_eq!(Site::for_slot(5).server_count(), 0);
    }

    #[test]
    fn test_target_sessions_rounding() {
        let target = ResilienceTarget {
            max_concurrent_sessions: 2000,
            coverage_percent: 100.0,
        };
        assert_eq!(target.target_sessions(), 2000);

        let target = ResilienceTarget {
            max_concurrent_sessions: 5,
            coverage_percent: 50.0,
        };
        assert_eq!(target.target_sessions(), 3);
    }

    #[test]
    fn test_server_spec_totals() {
        let spec = ServerSpec::default();
        assert_eq!(spec.total_vcpus(), 128.0);
        assert_eq!(spec.sessions_per_server(), 32);
    }
}
