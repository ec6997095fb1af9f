//! Error types for the capacity model

use thiserror::Error;

use crate::models::{MAX_SITES, MIN_SITES};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CapacityError {
    #[error("Invalid server spec: {field} must be a positive finite number, got {value}")]
    InvalidServerSpec { field: &'static str, value: f64 },

    #[error("Site count {count} outside supported range {MIN_SITES}..={MAX_SITES}")]
    SiteCount { count: usize },

    #[error("Cannot {action} site: deployment already has {count} sites")]
    SiteLimit { action: &'static str, count: usize },

    #[error("Site index {index} out of range ({len} sites)")]
    SiteIndex { index: usize, len: usize },

    #[error("Invalid number for {field}: {raw:?}")]
    InvalidNumber { field: &'static str, raw: String },

    #[error("Coverage must be within 1..=100 percent, got {value}")]
    InvalidCoverage { value: f64 },

    #[error("Site name must not be empty")]
    EmptySiteName,
}

impl CapacityError {
    /// Stable machine-readable kind, used in API error bodies
    pub fn kind(&self) -> &'static str {
        match self {
            CapacityError::InvalidServerSpec { .. } => "invalid_server_spec",
            CapacityError::SiteCount { .. } => "site_count",
            CapacityError::SiteLimit { .. } => "site_limit",
            CapacityError::SiteIndex { .. } => "site_index",
            CapacityError::InvalidNumber { .. } => "invalid_number",
            CapacityError::InvalidCoverage { .. } => "invalid_coverage",
            CapacityError::EmptySiteName => "empty_site_name",
        }
    }
}

pub type Result<T> = std::result::Result<T, CapacityError>;
