//! Summary statistics over a daily load curve

use serde::{Deserialize, Serialize};

use super::curve::{in_apac_peak, in_eu_peak, in_us_peak, HourlyLoadPoint};
use crate::models::round_half_up;

/// Load above which an hour counts as high
const HIGH_LOAD_FLOOR: u32 = 90;
const MEDIUM_LOAD_FLOOR: u32 = 50;
const LOW_LOAD_FLOOR: u32 = 21;
/// Load above which an hour counts as sustained high
const SUSTAINED_LOAD_FLOOR: u32 = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BucketCount {
    pub hours: usize,
    pub percent_of_day: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LoadDistribution {
    /// Above 90 %
    pub high: BucketCount,
    /// 50 - 90 %
    pub medium: BucketCount,
    /// 21 - 49 %
    pub low: BucketCount,
    /// 20 % and below
    pub minimal: BucketCount,
    pub peak_load_percent: u32,
    pub sustained_high_hours: usize,
    pub average_load_percent: u32,
    pub us_peak_hours: usize,
    pub eu_peak_hours: usize,
    pub apac_peak_hours: usize,
}

impl LoadDistribution {
    pub fn from_curve(points: &[HourlyLoadPoint]) -> Self {
        if points.is_empty() {
            return Self::default();
        }

        let total = points.len();
        let bucket = |pred: &dyn Fn(u32) -> bool| {
            let hours = points.iter().filter(|p| pred(p.load_percent)).count();
            BucketCount {
                hours,
                percent_of_day: round_half_up(hours as f64 / total as f64 * 100.0) as u32,
            }
        };
        let hours_in = |window: fn(u8) -> bool| points.iter().filter(|p| window(p.hour)).count();

        let load_sum: u64 = points.iter().map(|p| p.load_percent as u64).sum();

        Self {
            high: bucket(&|load| load > HIGH_LOAD_FLOOR),
            medium: bucket(&|load| (MEDIUM_LOAD_FLOOR..=HIGH_LOAD_FLOOR).contains(&load)),
            low: bucket(&|load| (LOW_LOAD_FLOOR..MEDIUM_LOAD_FLOOR).contains(&load)),
            minimal: bucket(&|load| load < LOW_LOAD_FLOOR),
            peak_load_percent: points.iter().map(|p| p.load_percent).max().unwrap_or(0),
            sustained_high_hours: points
                .iter()
                .filter(|p| p.load_percent > SUSTAINED_LOAD_FLOOR)
                .count(),
            average_load_percent: round_half_up(load_sum as f64 / total as f64) as u32,
            us_peak_hours: hours_in(in_us_peak),
            eu_peak_hours: hours_in(in_eu_peak),
            apac_peak_hours: hours_in(in_apac_peak),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::generate_load_curve;

    #[test]
    fn test_default_day_distribution() {
        let distribution = LoadDistribution::from_curve(&generate_load_curve(2000));

        assert_eq!(distribution.high, BucketCount { hours: 3, percent_of_day: 13 });
        assert_eq!(distribution.medium, BucketCount { hours: 13, percent_of_day: 54 });
        assert_eq!(distribution.low, BucketCount { hours: 4, percent_of_day: 17 });
        assert_eq!(distribution.minimal, BucketCount { hours: 4, percent_of_day: 17 });

        assert_eq!(distribution.peak_load_percent, 100);
        assert_eq!(distribution.sustained_high_hours, 4);
        assert_eq!(distribution.average_load_percent, 56);

        assert_eq!(distribution.us_peak_hours, 13);
        assert_eq!(distribution.eu_peak_hours, 9);
        assert_eq!(distribution.apac_peak_hours, 4);
    }

    #[test]
    fn test_every_hour_lands_in_one_bucket() {
        let points: Vec<HourlyLoadPoint> = (0..24u8)
            .map(|hour| HourlyLoadPoint {
                hour,
                hour_label: format!("{:02}:00", hour),
                load_percent: [0, 20, 21, 49, 50, 89, 90, 91][hour as usize % 8],
                session_count: 0,
            })
            .collect();
        let d = LoadDistribution::from_curve(&points);

        assert_eq!(d.high.hours + d.medium.hours + d.low.hours + d.minimal.hours, 24);
        assert_eq!(d.medium.hours, 9);
        assert_eq!(d.high.hours, 3);
    }

    #[test]
    fn test_empty_curve() {
        assert_eq!(LoadDistribution::from_curve(&[]), LoadDistribution::default());
    }
}
