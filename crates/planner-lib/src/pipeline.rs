//! Capacity model pipeline
//!
//! Chains the derivations for one configuration revision:
//! cost -> site capacity -> resilience + regional, and the load curve.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cost::{RatioHealth, SessionCost};
use crate::error::Result;
use crate::load::{HourlyLoadPoint, LoadDistribution, LoadProfile};
use crate::plan::Configuration;
use crate::resilience::{
    analyze, peak_load, regional_analysis, PeakLoad, RegionalAnalysis, ResourceAnalysis,
};
use crate::site::{site_capacities, SiteCapacity};

/// Everything a renderer needs for one configuration revision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacitySnapshot {
    pub revision: u64,
    pub generated_at: i64,
    pub session_cost: SessionCost,
    pub ratio_health: RatioHealth,
    pub sites: Vec<SiteCapacity>,
    pub analysis: ResourceAnalysis,
    pub peak: PeakLoad,
    pub regional: RegionalAnalysis,
    pub load_curve: Vec<HourlyLoadPoint>,
    pub load_distribution: LoadDistribution,
}

/// Daily curve plus its summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadReport {
    pub points: Vec<HourlyLoadPoint>,
    pub distribution: LoadDistribution,
}

/// Stateless evaluator for configurations
#[derive(Debug, Clone, Default)]
pub struct CapacityModel {
    profile: LoadProfile,
}

impl CapacityModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(profile: LoadProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &LoadProfile {
        &self.profile
    }

    /// Evaluate a configuration into a fresh snapshot
    pub fn evaluate(&self, config: &Configuration) -> Result<CapacitySnapshot> {
        config.validate()?;

        let spec = &config.server_spec;
        let session_cost = SessionCost::from_server_spec(spec);
        let sites = site_capacities(&config.sites, &session_cost);

        let analysis = analyze(&config.sites, &session_cost, &config.target)?;
        let peak = peak_load(
            &config.sites,
            &session_cost,
            &config.target,
            spec.physical_cpu_per_server,
            analysis.normal_ops_margin,
        );
        let regional = regional_analysis(
            &config.sites,
            &session_cost,
            &config.target,
            spec.physical_cpu_per_server,
        );
        let load = self.load_report(config.target.max_concurrent_sessions);

        debug!(
            revision = config.revision,
            sites = config.sites.len(),
            margin = analysis.normal_ops_margin,
            n1_deficit = analysis.n1_deficit,
            "Evaluated configuration"
        );

        Ok(CapacitySnapshot {
            revision: config.revision,
            generated_at: chrono::Utc::now().timestamp(),
            session_cost,
            ratio_health: session_cost.ratio_health(),
            sites,
            analysis,
            peak,
            regional,
            load_curve: load.points,
            load_distribution: load.distribution,
        })
    }

    /// Load curve alone; depends only on the session ceiling
    pub fn load_report(&self, max_sessions: u64) -> LoadReport {
        let points = self.profile.curve(max_sessions);
        let distribution = LoadDistribution::from_curve(&points);
        LoadReport {
            points,
            distribution,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CapacityError;
    use crate::models::{ResilienceTarget, ServerSpec};
    use crate::resilience::FailoverStatus;

    #[test]
    fn test_evaluate_reference_configuration() {
        let model = CapacityModel::new();
        let snapshot = model.evaluate(&Configuration::default()).unwrap();

        assert_eq!(snapshot.revision, 0);
        assert_eq!(snapshot.session_cost.physical_cpu_per_session, 2.0);
        assert_eq!(snapshot.ratio_health, RatioHealth::High);
        assert_eq!(snapshot.sites[0].supported_sessions, Some(1920));
        assert_eq!(snapshot.analysis.normal_ops_margin, 3680.0);
        assert!(snapshot
            .analysis
            .failover_scenarios
            .iter()
            .all(|s| s.status == FailoverStatus::AtRisk));
        assert_eq!(snapshot.load_curve.len(), 24);
        assert_eq!(snapshot.load_distribution.peak_load_percent, 100);
    }

    #[test]
    fn test_evaluate_is_repeatable() {
        let model = CapacityModel::new();
        let config = Configuration::default().with_site_added().unwrap();

        let mut first = model.evaluate(&config).unwrap();
        let mut second = model.evaluate(&config).unwrap();
        first.generated_at = 0;
        second.generated_at = 0;
        assert_eq!(first, second);
        assert_eq!(first.revision, 1);
    }

    #[test]
    fn test_evaluate_rejects_zero_spec() {
        let config = Configuration::default().with_server_spec(ServerSpec {
            vms_per_server: 0,
            ..ServerSpec::default()
        });
        let err = CapacityModel::new().evaluate(&config).unwrap_err();
        assert!(matches!(
            err,
            CapacityError::InvalidServerSpec {
                field: "vms_per_server",
                ..
            }
        ));
    }

    #[test]
    fn test_load_report_follows_target_only() {
        let model = CapacityModel::new();
        let config = Configuration::default()
            .with_target(ResilienceTarget {
                max_concurrent_sessions: 0,
                coverage_percent: 50.0,
            })
            .unwrap();
        let snapshot = model.evaluate(&config).unwrap();

        assert!(snapshot.load_curve.iter().all(|p| p.session_count == 0));
        assert_eq!(snapshot.load_curve, model.load_report(0).points);
    }

    #[test]
    fn test_evaluate_with_heavier_profile() {
        let profile = LoadProfile {
            us_volume: 0.8,
            eu_volume: 0.5,
            ..LoadProfile::default()
        };
        let model = CapacityModel::with_profile(profile);
        assert_eq!(model.profile(), &profile);

        let snapshot = model.evaluate(&Configuration::default()).unwrap();
        assert_eq!(snapshot.load_curve[14].load_percent, 130);
        assert_eq!(snapshot.load_curve[14].session_count, 2600);
        assert_eq!(snapshot.load_distribution.peak_load_percent, 130);
        assert_eq!(snapshot.analysis.normal_ops_margin, 3680.0);
    }
}
