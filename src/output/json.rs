//! JSON output formatting for posturewatch.
//!
//! Replay events are emitted one compact object per line so the stream can be
//! piped into line-oriented tools.

use serde::Serialize;
use serde_json::json;

use crate::error::PostureError;
use crate::features::alerts::Alert;
use crate::features::monitor::{MonitorStats, MonitoringStatus};

/// Format a raised alert as a JSON line.
///
/// # Errors
///
/// Returns `PostureError::Parse` if JSON serialization fails.
pub fn format_alert_json(t: f64, alert: &Alert) -> Result<String, PostureError> {
    to_json_line(&json!({ "t": t, "event": "alert", "alert": alert }))
}

/// Format monitoring status as a JSON line.
///
/// # Errors
///
/// Returns `PostureError::Parse` if JSON serialization fails.
pub fn format_status_json(t: f64, status: &MonitoringStatus) -> Result<String, PostureError> {
    to_json_line(&json!({ "t": t, "event": "status", "status": status }))
}

/// Format statistics as a JSON line.
///
/// # Errors
///
/// Returns `PostureError::Parse` if JSON serialization fails.
pub fn format_stats_json(t: f64, stats: &MonitorStats) -> Result<String, PostureError> {
    to_json_line(&json!({ "t": t, "event": "stats", "stats": stats }))
}

/// Format a poll result as a JSON line; an empty mailbox reads `"none"`.
///
/// # Errors
///
/// Returns `PostureError::Parse` if JSON serialization fails.
pub fn format_poll_json(t: f64, message: Option<&str>) -> Result<String, PostureError> {
    to_json_line(&json!({ "t": t, "event": "poll", "alert": message.unwrap_or("none") }))
}

/// Format a lifecycle acknowledgement as a JSON line.
///
/// # Errors
///
/// Returns `PostureError::Parse` if JSON serialization fails.
pub fn format_control_json(t: f64, status: &str) -> Result<String, PostureError> {
    to_json_line(&json!({ "t": t, "event": "control", "status": status }))
}

/// Serialize any value as pretty JSON.
///
/// # Errors
///
/// Returns `PostureError::Parse` if JSON serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, PostureError> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Serialize any value as single-line JSON.
///
/// # Errors
///
/// Returns `PostureError::Parse` if JSON serialization fails.
pub fn to_json_line<T: Serialize>(value: &T) -> Result<String, PostureError> {
    Ok(serde_json::to_string(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::alerts::{AlertDispatcher, AlertKind};
    use crate::features::posture::PostureStatus;

    #[test]
    fn test_format_alert_json() {
        let mut alerts = AlertDispatcher::new();
        let alert = alerts.raise(AlertKind::Posture, "sit up").clone();

        let line = format_alert_json(12.0, &alert).unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();

        assert!(!line.contains('\n'));
        assert_eq!(value["event"], "alert");
        assert_eq!(value["t"], 12.0);
        assert_eq!(value["alert"]["kind"], "posture");
        assert_eq!(value["alert"]["message"], "sit up");
    }

    #[test]
    fn test_format_poll_json_none() {
        let line = format_poll_json(1.0, None).unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["alert"], "none");
    }

    #[test]
    fn test_format_status_json_omits_remaining_when_open() {
        let status = MonitoringStatus {
            active: true,
            suppressed: false,
            remaining_suppression_secs: None,
        };
        let line = format_status_json(0.0, &status).unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["status"]["active"], true);
        assert!(value["status"].get("remaining_suppression_secs").is_none());
    }

    #[test]
    fn test_format_stats_json() {
        let stats = MonitorStats {
            posture_status: PostureStatus::Good,
            posture_issues: Vec::new(),
            focus_secs: 42.0,
            accumulated_focus_secs: 100.0,
            posture_alerts: 1,
            focus_alerts: 0,
        };
        let line = format_stats_json(5.0, &stats).unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["stats"]["posture_status"], "good");
        assert_eq!(value["stats"]["focus_secs"], 42.0);
        assert_eq!(value["stats"]["posture_alerts"], 1);
    }
}
