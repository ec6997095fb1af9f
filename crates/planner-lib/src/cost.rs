//! Per-session CPU cost derivation
//!
//! Turns a server hardware profile into what one user session costs in
//! physical and virtual CPU, plus the vCPU:pCPU oversubscription ratio.

use serde::{Deserialize, Serialize};

use crate::error::{CapacityError, Result};
use crate::models::{round_to, ServerSpec};

/// Ratio at or above which oversubscription starts to hurt
pub const HIGH_RATIO_THRESHOLD: f64 = 1.5;

/// Ratio at or above which oversubscription is worth watching
pub const MODERATE_RATIO_THRESHOLD: f64 = 1.25;

/// CPU cost of a single session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionCost {
    pub physical_cpu_per_session: f64,
    pub virtual_cpu_per_session: f64,
    pub oversubscription_ratio: f64,
}

impl SessionCost {
    /// Derive session cost from the server hardware profile.
    ///
    /// Total over its numeric domain: zero `physical_cpu_per_server`,
    /// `vms_per_server` or `max_sessions_per_vm` produce non-finite values.
    /// Guard with [`ServerSpec::validate`] first.
    pub fn from_server_spec(spec: &ServerSpec) -> Self {
        let total_vcpus = spec.total_vcpus();
        let sessions_per_server = spec.sessions_per_server() as f64;

        Self {
            physical_cpu_per_session: spec.physical_cpu_per_server / sessions_per_server,
            virtual_cpu_per_session: total_vcpus / sessions_per_server,
            oversubscription_ratio: total_vcpus / spec.physical_cpu_per_server,
        }
    }

    /// Derive from a known physical cost per session and ratio
    pub fn from_physical(physical_cpu_per_session: f64, ratio: f64) -> Self {
        Self {
            physical_cpu_per_session,
            virtual_cpu_per_session: physical_cpu_per_session * ratio,
            oversubscription_ratio: ratio,
        }
    }

    /// Derive from a known virtual cost per session and ratio
    pub fn from_virtual(virtual_cpu_per_session: f64, ratio: f64) -> Self {
        Self {
            physical_cpu_per_session: virtual_cpu_per_session / ratio,
            virtual_cpu_per_session,
            oversubscription_ratio: ratio,
        }
    }

    /// True when the physical cost can be used as a divisor
    pub fn is_usable(&self) -> bool {
        self.physical_cpu_per_session.is_finite() && self.physical_cpu_per_session > 0.0
    }

    /// Copy rounded to two decimals for display
    pub fn rounded(&self) -> Self {
        Self {
            physical_cpu_per_session: round_to(self.physical_cpu_per_session, 2),
            virtual_cpu_per_session: round_to(self.virtual_cpu_per_session, 2),
            oversubscription_ratio: round_to(self.oversubscription_ratio, 2),
        }
    }

    pub fn ratio_health(&self) -> RatioHealth {
        RatioHealth::classify(self.oversubscription_ratio)
    }
}

/// How comfortable the oversubscription ratio is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatioHealth {
    Healthy,
    Moderate,
    High,
    Unknown,
}

impl RatioHealth {
    pub fn classify(ratio: f64) -> Self {
        if !ratio.is_finite() {
            RatioHealth::Unknown
        } else if ratio >= HIGH_RATIO_THRESHOLD {
            RatioHealth::High
        } else if ratio >= MODERATE_RATIO_THRESHOLD {
            RatioHealth::Moderate
        } else if ratio > 0.0 {
            RatioHealth::Healthy
        } else {
            RatioHealth::Unknown
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            RatioHealth::Healthy => "Healthy ratio",
            RatioHealth::Moderate => "Moderate oversubscription",
            RatioHealth::High => "High ratio may impact performance",
            RatioHealth::Unknown => "Ratio unavailable",
        }
    }
}

impl ServerSpec {
    /// Reject fields that would make the cost derivation non-finite
    pub fn validate(&self) -> Result<()> {
        check_positive("physical_cpu_per_server", self.physical_cpu_per_server)?;
        check_positive("vms_per_server", self.vms_per_server as f64)?;
        check_positive("vcpu_per_vm", self.vcpu_per_vm)?;
        check_positive("max_sessions_per_vm", self.max_sessions_per_vm as f64)?;
        Ok(())
    }
}

fn check_positive(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(CapacityError::InvalidServerSpec { field, value })
    }
}
