//! Detection policy and host settings for posturewatch.
//!
//! Settings are loaded from `~/.posturewatch/config.yaml`. Every section is
//! optional; missing fields fall back to the documented defaults.

use serde::{Deserialize, Serialize};

use crate::config::Paths;
use crate::error::PostureError;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Posture classification and alert gating.
    pub posture: PostureConfig,
    /// Screen-focus streak tracking.
    pub focus: FocusConfig,
    /// Monitoring lifecycle defaults.
    pub monitoring: MonitoringConfig,
    /// Logger settings.
    pub logging: LoggingConfig,
}

/// Posture classification and alert gating.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PostureConfig {
    /// Minimum spacing between evaluated posture cycles.
    #[serde(default = "default_check_interval")]
    pub check_interval_secs: f64,
    /// Neck angle above which the head counts as leaning forward.
    #[serde(default = "default_neck_angle")]
    pub neck_angle_threshold_degrees: f64,
    /// Average shoulder-to-ear distance below which shoulders count as slouched.
    #[serde(default = "default_slouch_distance")]
    pub slouch_distance_threshold: f64,
    /// Vertical shoulder offset above which shoulders count as uneven.
    #[serde(default = "default_asymmetry")]
    pub asymmetry_threshold: f64,
    /// Accumulated bad-posture time required before an alert may fire.
    #[serde(default = "default_sustained_bad")]
    pub sustained_bad_secs: f64,
    /// Minimum time between two posture alerts.
    #[serde(default = "default_posture_alert_interval")]
    pub alert_interval_secs: f64,
    /// Landmarks below this visibility count as missing.
    #[serde(default = "default_min_visibility")]
    pub min_landmark_visibility: f64,
}

/// Screen-focus streak tracking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FocusConfig {
    /// Uninterrupted screen-facing time that triggers a break reminder.
    #[serde(default = "default_streak_alert")]
    pub streak_alert_secs: f64,
    /// Minimum time between two focus alerts.
    #[serde(default = "default_focus_alert_interval")]
    pub alert_interval_secs: f64,
    /// Maximum normalized offset of the eye midpoint from frame center.
    #[serde(default = "default_center_tolerance")]
    pub center_tolerance: f64,
}

/// Monitoring lifecycle defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MonitoringConfig {
    /// Whether a freshly built monitor starts in the active state.
    #[serde(default = "default_true")]
    pub start_active: bool,
    /// Snooze length used when the caller does not supply one.
    #[serde(default = "default_snooze")]
    pub default_snooze_secs: f64,
}

/// Logger settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level specification (`error`, `warn`, `info`, `debug`, `trace`).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Write rotated log files under the data directory instead of stderr.
    #[serde(default)]
    pub to_file: bool,
}

// Default value functions for serde
const fn default_check_interval() -> f64 {
    3.0
}

const fn default_neck_angle() -> f64 {
    25.0
}

const fn default_slouch_distance() -> f64 {
    0.15
}

const fn default_asymmetry() -> f64 {
    0.1
}

const fn default_sustained_bad() -> f64 {
    10.0
}

const fn default_posture_alert_interval() -> f64 {
    30.0
}

const fn default_min_visibility() -> f64 {
    0.5
}

const fn default_streak_alert() -> f64 {
    1200.0
}

const fn default_focus_alert_interval() -> f64 {
    1200.0
}

const fn default_center_tolerance() -> f64 {
    0.3
}

const fn default_true() -> bool {
    true
}

const fn default_snooze() -> f64 {
    300.0
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for PostureConfig {
    fn default() -> Self {
        Self {
            check_interval_secs: default_check_interval(),
            neck_angle_threshold_degrees: default_neck_angle(),
            slouch_distance_threshold: default_slouch_distance(),
            asymmetry_threshold: default_asymmetry(),
            sustained_bad_secs: default_sustained_bad(),
            alert_interval_secs: default_posture_alert_interval(),
            min_landmark_visibility: default_min_visibility(),
        }
    }
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            streak_alert_secs: default_streak_alert(),
            alert_interval_secs: default_focus_alert_interval(),
            center_tolerance: default_center_tolerance(),
        }
    }
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            start_active: default_true(),
            default_snooze_secs: default_snooze(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            to_file: false,
        }
    }
}

/// Reject negative and non-finite values.
fn non_negative(name: &str, value: f64) -> Result<(), PostureError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(PostureError::Config(format!(
            "{name} must be a finite, non-negative number (got {value})"
        )))
    }
}

fn unit_interval(name: &str, value: f64) -> Result<(), PostureError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(PostureError::Config(format!(
            "{name} must lie within [0, 1] (got {value})"
        )))
    }
}

impl Config {
    /// Check every threshold and interval.
    ///
    /// # Errors
    ///
    /// Returns `PostureError::Config` naming the first offending field.
    pub fn validate(&self) -> Result<(), PostureError> {
        let p = &self.posture;
        non_negative("posture.check_interval_secs", p.check_interval_secs)?;
        if p.check_interval_secs == 0.0 {
            return Err(PostureError::Config(
                "posture.check_interval_secs must be greater than zero".to_string(),
            ));
        }
        non_negative(
            "posture.neck_angle_threshold_degrees",
            p.neck_angle_threshold_degrees,
        )?;
        non_negative(
            "posture.slouch_distance_threshold",
            p.slouch_distance_threshold,
        )?;
        non_negative("posture.asymmetry_threshold", p.asymmetry_threshold)?;
        non_negative("posture.sustained_bad_secs", p.sustained_bad_secs)?;
        non_negative("posture.alert_interval_secs", p.alert_interval_secs)?;
        unit_interval("posture.min_landmark_visibility", p.min_landmark_visibility)?;

        let f = &self.focus;
        non_negative("focus.streak_alert_secs", f.streak_alert_secs)?;
        non_negative("focus.alert_interval_secs", f.alert_interval_secs)?;
        unit_interval("focus.center_tolerance", f.center_tolerance)?;

        non_negative(
            "monitoring.default_snooze_secs",
            self.monitoring.default_snooze_secs,
        )?;

        Ok(())
    }

    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self, PostureError> {
        let paths = Paths::new()?;
        Self::load_from_path(&paths.config_file)
    }

    /// Load configuration from a specific path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load_from_path(path: &std::path::Path) -> Result<Self, PostureError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            PostureError::Config(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        serde_yaml::from_str(&contents).map_err(|e| {
            PostureError::Config(format!(
                "Failed to parse config file {}: {e}",
                path.display()
            ))
        })
    }

    /// Save configuration to a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be written.
    pub fn save_to_path(&self, path: &std::path::Path) -> Result<(), PostureError> {
        let contents = serde_yaml::to_string(self)
            .map_err(|e| PostureError::Config(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, contents).map_err(|e| {
            PostureError::Config(format!(
                "Failed to write config file {}: {e}",
                path.display()
            ))
        })
    }
}
