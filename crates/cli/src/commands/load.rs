//! 24-hour load curve command

use anyhow::Result;
use colored::Colorize;
use planner_lib::load::{BucketCount, HourlyLoadPoint};
use planner_lib::LoadReport;
use tabled::Tabled;

use crate::client::Backend;
use crate::output::{format_count, load_bar, print_heading, print_json, print_subheading, OutputFormat};

#[derive(Tabled)]
struct HourRow {
    #[tabled(rename = "Hour (UTC)")]
    hour: String,
    #[tabled(rename = "Load")]
    load: String,
    #[tabled(rename = "Sessions")]
    sessions: String,
    #[tabled(rename = "")]
    bar: String,
}

impl From<&HourlyLoadPoint> for HourRow {
    fn from(point: &HourlyLoadPoint) -> Self {
        Self {
            hour: point.hour_label.clone(),
            load: format!("{}%", point.load_percent),
            sessions: format_count(point.session_count),
            bar: load_bar(point.load_percent),
        }
    }
}

/// Show the daily load curve for a session ceiling
pub async fn show_load(backend: &Backend, max_sessions: u64, format: OutputFormat) -> Result<()> {
    let report = backend.load_report(max_sessions).await?;

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Table => {
            print_heading(&format!(
                "24-Hour Load Profile ({} max sessions)",
                format_count(max_sessions)
            ));
            print_curve(&report);
        }
    }

    Ok(())
}

/// Curve table and distribution summary; shared with `analyze`
pub fn print_curve(report: &LoadReport) {
    let rows: Vec<HourRow> = report.points.iter().map(HourRow::from).collect();
    let table = tabled::Table::new(rows)
        .with(tabled::settings::Style::rounded())
        .to_string();
    println!("{}", table);
    println!();

    let dist = &report.distribution;
    print_subheading("Load Distribution");
    println!("High (>90%):            {}", bucket(&dist.high).red());
    println!("Medium (50-90%):        {}", bucket(&dist.medium).yellow());
    println!("Low (21-49%):           {}", bucket(&dist.low).green());
    println!("Minimal (<=20%):        {}", bucket(&dist.minimal));
    println!();
    println!("Peak load:              {}%", dist.peak_load_percent);
    println!("Average load:           {}%", dist.average_load_percent);
    println!("Sustained high (>80%):  {} hours", dist.sustained_high_hours);
    println!(
        "Peak windows:           US {}h, EU {}h, APAC {}h",
        dist.us_peak_hours, dist.eu_peak_hours, dist.apac_peak_hours
    );
}

fn bucket(count: &BucketCount) -> String {
    format!("{} hours ({}% of day)", count.hours, count.percent_of_day)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hour_row_formatting() {
        colored::control::set_override(false);
        let point = HourlyLoadPoint {
            hour: 14,
            hour_label: "14:00".to_string(),
            load_percent: 100,
            session_count: 2000,
        };

        let row = HourRow::from(&point);
        assert_eq!(row.hour, "14:00");
        assert_eq!(row.load, "100%");
        assert_eq!(row.sessions, "2,000");
        assert_eq!(row.bar.chars().count(), 25);
    }

    #[test]
    fn test_bucket_text() {
        let count = BucketCount {
            hours: 13,
            percent_of_day: 54,
        };
        assert_eq!(bucket(&count), "13 hours (54% of day)");
    }
}
