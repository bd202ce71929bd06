use colored::Colorize;

use crate::core::{format_duration, format_mmss};
use crate::features::alerts::{Alert, AlertKind};
use crate::features::monitor::{MonitorStats, MonitoringStatus};
use crate::features::posture::PostureStatus;

/// Format a raised alert as a single line
pub fn format_alert_pretty(t: f64, alert: &Alert) -> String {
    let icon = match alert.kind {
        AlertKind::Posture => "⚠️ ",
        AlertKind::Focus => "🧠",
    };
    let message = match alert.kind {
        AlertKind::Posture => alert.message.red(),
        AlertKind::Focus => alert.message.yellow(),
    };
    format!("[{}] {} {}", format_mmss(t).dimmed(), icon, message)
}

/// Format monitoring status
pub fn format_status_pretty(t: f64, status: &MonitoringStatus) -> String {
    let state = if status.active {
        "active".green()
    } else {
        "paused".red()
    };

    let mut line = format!("[{}] Monitoring: {}", format_mmss(t).dimmed(), state);
    if let Some(remaining) = status.remaining_suppression_secs {
        line.push_str(&format!(
            "  {}",
            format!("alerts snoozed: {} remaining", format_mmss(remaining)).yellow()
        ));
    }
    line
}

/// Format statistics as a small table
pub fn format_stats_pretty(t: f64, stats: &MonitorStats) -> String {
    let posture = match stats.posture_status {
        PostureStatus::Good => "good".green(),
        PostureStatus::Poor => "poor".red(),
        PostureStatus::Unknown => "unknown".dimmed(),
    };

    let mut output = Vec::new();
    output.push(format!("[{}] Stats", format_mmss(t).dimmed()));
    output.push("─".repeat(40));
    output.push(format!("Posture:        {posture}"));
    if !stats.posture_issues.is_empty() {
        let issues: Vec<String> = stats.posture_issues.iter().map(ToString::to_string).collect();
        output.push(format!("Issues:         {}", issues.join(", ")));
    }
    output.push(format!(
        "Focus streak:   {}",
        format_duration(stats.focus_secs)
    ));
    output.push(format!(
        "Focus total:    {}",
        format_duration(stats.accumulated_focus_secs)
    ));
    output.push(format!("Posture alerts: {}", stats.posture_alerts));
    output.push(format!("Focus alerts:   {}", stats.focus_alerts));
    output.join("\n")
}

/// Format a poll result
pub fn format_poll_pretty(t: f64, message: Option<&str>) -> String {
    match message {
        Some(message) => format!("[{}] 📬 {}", format_mmss(t).dimmed(), message),
        None => format!("[{}] 📭 {}", format_mmss(t).dimmed(), "no pending alert".dimmed()),
    }
}

/// Format a lifecycle acknowledgement
pub fn format_control_pretty(t: f64, status: &str) -> String {
    format!("[{}] {}", format_mmss(t).dimmed(), status.cyan())
}
