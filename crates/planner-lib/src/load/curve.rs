//! Hourly load curve generation
//!
//! Builds a deterministic 24-point daily profile from fixed regional volume
//! assumptions (hours are UTC). Overlapping regional peaks add up and the
//! result is never clamped to 100 %.

use serde::{Deserialize, Serialize};

use crate::models::round_half_up;

pub const HOURS_PER_DAY: u8 = 24;

/// US peak runs 14:00 through 02:00
pub fn in_us_peak(hour: u8) -> bool {
    (14..=23).contains(&hour) || hour <= 2
}

pub fn in_eu_peak(hour: u8) -> bool {
    (8..=16).contains(&hour)
}

/// EU peak plus one hour either side
pub fn in_eu_shoulder(hour: u8) -> bool {
    (7..=17).contains(&hour)
}

pub fn in_apac_peak(hour: u8) -> bool {
    (7..=10).contains(&hour)
}

/// One hour of the synthetic day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyLoadPoint {
    pub hour: u8,
    /// "HH:00"
    pub hour_label: String,
    /// Percent of max sessions; may exceed 100
    pub load_percent: u32,
    pub session_count: u64,
}

/// Regional volume assumptions behind the curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadProfile {
    pub us_volume: f64,
    pub eu_volume: f64,
    pub apac_volume: f64,
    /// Fraction of US volume outside the US peak
    pub us_off_peak_factor: f64,
    /// Fraction of EU volume in the shoulder hours
    pub eu_shoulder_factor: f64,
    /// Fraction of EU volume outside peak and shoulder
    pub eu_off_hours_factor: f64,
}

impl Default for LoadProfile {
    fn default() -> Self {
        Self {
            us_volume: 0.66,
            eu_volume: 0.34,
            apac_volume: 0.10,
            us_off_peak_factor: 0.1,
            eu_shoulder_factor: 0.5,
            eu_off_hours_factor: 0.1,
        }
    }
}

impl LoadProfile {
    /// Load as a fraction of max sessions for one hour
    pub fn load_fraction(&self, hour: u8) -> f64 {
        let us = if in_us_peak(hour) {
            self.us_volume
        } else {
            self.us_volume * self.us_off_peak_factor
        };

        let eu = if in_eu_peak(hour) {
            self.eu_volume
        } else if in_eu_shoulder(hour) {
            self.eu_volume * self.eu_shoulder_factor
        } else {
            self.eu_volume * self.eu_off_hours_factor
        };

        let apac = if in_apac_peak(hour) {
            self.apac_volume
        } else {
            0.0
        };

        us + eu + apac
    }

    /// The full day, hour 0 first
    pub fn curve(&self, max_sessions: u64) -> Vec<HourlyLoadPoint> {
        (0..HOURS_PER_DAY)
            .map(|hour| {
                let fraction = self.load_fraction(hour);
                HourlyLoadPoint {
                    hour,
                    hour_label: format!("{:02}:00", hour),
                    load_percent: round_half_up(fraction * 100.0).max(0.0) as u32,
                    session_count: round_half_up(max_sessions as f64 * fraction).max(0.0) as u64,
                }
            })
            .collect()
    }
}

/// Daily curve under the default regional profile
pub fn generate_load_curve(max_sessions: u64) -> Vec<HourlyLoadPoint> {
    LoadProfile::default().curve(max_sessions)
}
