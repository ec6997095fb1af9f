//! Capacity model for multi-site virtual desktop deployments
//!
//! This crate provides the core functionality for:
//! - Per-session CPU cost derivation from server hardware
//! - Site capacity derivation
//! - N-1 resilience and regional balance analysis
//! - The synthetic 24-hour load curve
//! - Metrics and structured logging for the binaries

pub mod cost;
pub mod error;
pub mod load;
pub mod models;
pub mod observability;
pub mod pipeline;
pub mod plan;
pub mod resilience;
pub mod site;

pub use cost::{RatioHealth, SessionCost};
pub use error::{CapacityError, Result};
pub use models::*;
pub use observability::{PlannerMetrics, StructuredLogger};
pub use pipeline::{CapacityModel, CapacitySnapshot, LoadReport};
pub use plan::Configuration;
