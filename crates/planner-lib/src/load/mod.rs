//! Synthetic 24-hour load model

mod curve;
mod distribution;

pub use curve::{
    generate_load_curve, in_apac_peak, in_eu_peak, in_eu_shoulder, in_us_peak, HourlyLoadPoint,
    LoadProfile, HOURS_PER_DAY,
};
pub use distribution::{BucketCount, LoadDistribution};
