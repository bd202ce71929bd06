//! Output formatting for posturewatch.
//!
//! This module renders replay events and control-plane responses in the
//! selected output format.

mod json;
mod pretty;

use crate::cli::args::OutputFormat;
use crate::error::PostureError;
use crate::features::alerts::Alert;
use crate::features::monitor::{MonitorStats, MonitoringStatus};

pub use json::*;
pub use pretty::*;

/// Format a raised alert based on output format
///
/// # Errors
///
/// Returns `PostureError::Parse` if JSON serialization fails.
pub fn format_alert(t: f64, alert: &Alert, format: OutputFormat) -> Result<String, PostureError> {
    match format {
        OutputFormat::Pretty => Ok(format_alert_pretty(t, alert)),
        OutputFormat::Json => format_alert_json(t, alert),
    }
}

/// Format monitoring status based on output format
///
/// # Errors
///
/// Returns `PostureError::Parse` if JSON serialization fails.
pub fn format_status(
    t: f64,
    status: &MonitoringStatus,
    format: OutputFormat,
) -> Result<String, PostureError> {
    match format {
        OutputFormat::Pretty => Ok(format_status_pretty(t, status)),
        OutputFormat::Json => format_status_json(t, status),
    }
}

/// Format statistics based on output format
///
/// # Errors
///
/// Returns `PostureError::Parse` if JSON serialization fails.
pub fn format_stats(
    t: f64,
    stats: &MonitorStats,
    format: OutputFormat,
) -> Result<String, PostureError> {
    match format {
        OutputFormat::Pretty => Ok(format_stats_pretty(t, stats)),
        OutputFormat::Json => format_stats_json(t, stats),
    }
}

/// Format a poll result based on output format
///
/// # Errors
///
/// Returns `PostureError::Parse` if JSON serialization fails.
pub fn format_poll(
    t: f64,
    message: Option<&str>,
    format: OutputFormat,
) -> Result<String, PostureError> {
    match format {
        OutputFormat::Pretty => Ok(format_poll_pretty(t, message)),
        OutputFormat::Json => format_poll_json(t, message),
    }
}

/// Format a lifecycle acknowledgement based on output format
///
/// # Errors
///
/// Returns `PostureError::Parse` if JSON serialization fails.
pub fn format_control(t: f64, status: &str, format: OutputFormat) -> Result<String, PostureError> {
    match format {
        OutputFormat::Pretty => Ok(format_control_pretty(t, status)),
        OutputFormat::Json => format_control_json(t, status),
    }
}
