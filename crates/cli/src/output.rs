//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;
use planner_lib::resilience::{CapacityStatus, FailoverStatus};
use planner_lib::RatioHealth;
use serde::Serialize;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Print any value as pretty JSON
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a section heading with an underline
pub fn print_heading(title: &str) {
    println!("{}", title.bold());
    println!("{}", "=".repeat(60));
}

pub fn print_subheading(title: &str) {
    println!("{}", title.bold());
    println!("{}", "-".repeat(60));
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Format a CPU amount with two decimals; non-finite values read N/A
pub fn format_cpu(cpu: f64) -> String {
    if cpu.is_finite() {
        format!("{:.2}", cpu)
    } else {
        "N/A".to_string()
    }
}

/// Format an optional whole-number percentage
pub fn format_percent(percent: Option<i64>) -> String {
    match percent {
        Some(p) => format!("{}%", p),
        None => "N/A".to_string(),
    }
}

/// Format a count with thousands separators
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub fn format_optional_count(count: Option<u64>) -> String {
    count.map(format_count).unwrap_or_else(|| "N/A".to_string())
}

/// Format a unix timestamp for display
pub fn format_timestamp(ts: i64) -> String {
    match chrono::DateTime::from_timestamp(ts, 0) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => ts.to_string(),
    }
}

/// Color a gap: deficits red, surplus green
pub fn color_gap(gap: f64, text: String) -> String {
    if gap <= 0.0 {
        text.green().to_string()
    } else {
        text.red().bold().to_string()
    }
}

pub fn color_capacity_status(status: CapacityStatus) -> String {
    match status {
        CapacityStatus::Sufficient => "Sufficient".green().to_string(),
        CapacityStatus::Insufficient => "Insufficient".red().bold().to_string(),
    }
}

pub fn color_failover_status(status: FailoverStatus) -> String {
    match status {
        FailoverStatus::Resilient => status.label().green().to_string(),
        FailoverStatus::AtRisk => status.label().red().bold().to_string(),
    }
}

pub fn color_ratio(ratio: f64, health: RatioHealth) -> String {
    let formatted = format_cpu(ratio);
    match health {
        RatioHealth::Healthy => formatted.green().to_string(),
        RatioHealth::Moderate => formatted.yellow().to_string(),
        RatioHealth::High => formatted.red().to_string(),
        RatioHealth::Unknown => formatted,
    }
}

/// Horizontal bar for a load percentage, one block per 4 %
pub fn load_bar(load_percent: u32) -> String {
    let blocks = ((load_percent + 2) / 4) as usize;
    let bar = "█".repeat(blocks);
    if load_percent > 90 {
        bar.red().to_string()
    } else if load_percent >= 50 {
        bar.yellow().to_string()
    } else {
        bar.green().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_cpu() {
        assert_eq!(format_cpu(3680.0), "3680.00");
        assert_eq!(format_cpu(2.285714), "2.29");
        assert_eq!(format_cpu(f64::INFINITY), "N/A");
        assert_eq!(format_cpu(f64::NAN), "N/A");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1920), "1,920");
        assert_eq!(format_count(1234567), "1,234,567");
        assert_eq!(format_optional_count(None), "N/A");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(Some(52)), "52%");
        assert_eq!(format_percent(None), "N/A");
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "1970-01-01 00:00:00 UTC");
    }

    #[test]
    fn test_load_bar_length() {
        colored::control::set_override(false);
        assert_eq!(load_bar(0).chars().count(), 0);
        assert_eq!(load_bar(100).chars().count(), 25);
        assert_eq!(load_bar(69).chars().count(), 17);
    }
}
