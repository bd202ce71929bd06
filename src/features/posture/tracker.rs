//! Hysteresis-smoothed posture classification and alert gating.

use std::fmt;
use std::time::Instant;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::PostureMetrics;
use crate::config::PostureConfig;
use crate::core::secs_between;
use crate::features::alerts::{Alert, AlertDispatcher, AlertKind};

/// A single posture problem detected in one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum PostureIssue {
    /// Head leaning forward past the neck angle threshold.
    NeckForward {
        /// Measured neck angle.
        angle_degrees: f64,
    },
    /// Shoulders pulled up towards the ears.
    SlouchedShoulders,
    /// One shoulder noticeably lower than the other.
    UnevenShoulders,
}

impl fmt::Display for PostureIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NeckForward { angle_degrees } => {
                write!(f, "neck leaning forward ({:.0}°)", angle_degrees.trunc())
            }
            Self::SlouchedShoulders => write!(f, "slouched shoulders"),
            Self::UnevenShoulders => write!(f, "uneven shoulders"),
        }
    }
}

/// Posture verdict of the most recent evaluated cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostureStatus {
    /// No cycle evaluated yet.
    #[default]
    Unknown,
    /// Last cycle found no issue.
    Good,
    /// Last cycle found at least one issue.
    Poor,
}

impl fmt::Display for PostureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::Good => write!(f, "good"),
            Self::Poor => write!(f, "poor"),
        }
    }
}

/// Accumulated posture timing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PostureState {
    /// Credit accumulated for good posture.
    pub good_duration_secs: f64,
    /// Time accumulated in bad posture.
    pub bad_duration_secs: f64,
    /// When the last posture alert fired, `None` if it never has.
    pub last_alert_at: Option<Instant>,
    /// When the last cycle was evaluated, `None` if the cadence gate is open.
    pub last_check_at: Option<Instant>,
}

/// Turns per-frame metrics into a throttled posture alert decision.
///
/// Cycles are driven by the caller; calls arriving sooner than
/// `check_interval_secs` after the previous evaluated cycle are ignored.
#[derive(Debug, Clone)]
pub struct PostureStateTracker {
    config: PostureConfig,
    state: PostureState,
    status: PostureStatus,
    issues: Vec<PostureIssue>,
}

impl PostureStateTracker {
    /// Create a tracker with a clean state.
    #[must_use]
    pub fn new(config: PostureConfig) -> Self {
        Self {
            config,
            state: PostureState::default(),
            status: PostureStatus::Unknown,
            issues: Vec::new(),
        }
    }

    /// Classify metrics against the configured thresholds.
    #[must_use]
    pub fn evaluate(&self, metrics: &PostureMetrics) -> Vec<PostureIssue> {
        let mut issues = Vec::new();

        if metrics.neck_angle_degrees > self.config.neck_angle_threshold_degrees {
            issues.push(PostureIssue::NeckForward {
                angle_degrees: metrics.neck_angle_degrees,
            });
        }
        if metrics.shoulder_slouch_distance < self.config.slouch_distance_threshold {
            issues.push(PostureIssue::SlouchedShoulders);
        }
        if metrics.shoulder_asymmetry > self.config.asymmetry_threshold {
            issues.push(PostureIssue::UnevenShoulders);
        }

        issues
    }

    /// Run one posture cycle.
    ///
    /// `metrics` is `None` when no usable pose was found; such frames leave
    /// all state untouched. Returns the alert raised this cycle, if any.
    pub fn check(
        &mut self,
        now: Instant,
        metrics: Option<&PostureMetrics>,
        alerts: &mut AlertDispatcher,
    ) -> Option<Alert> {
        let metrics = metrics?;

        if let Some(last) = self.state.last_check_at {
            if secs_between(last, now) < self.config.check_interval_secs {
                return None;
            }
        }
        self.state.last_check_at = Some(now);

        let interval = self.config.check_interval_secs;
        let issues = self.evaluate(metrics);

        if issues.is_empty() {
            self.state.good_duration_secs += interval;
            self.state.bad_duration_secs = (self.state.bad_duration_secs - interval).max(0.0);
            self.status = PostureStatus::Good;
        } else {
            self.state.bad_duration_secs += interval;
            self.state.good_duration_secs =
                (self.state.good_duration_secs - interval / 2.0).max(0.0);
            self.status = PostureStatus::Poor;
        }

        debug!(
            "event=posture_cycle status={} issues={} good_secs={:.1} bad_secs={:.1} neck_deg={:.1}",
            self.status,
            issues.len(),
            self.state.good_duration_secs,
            self.state.bad_duration_secs,
            metrics.neck_angle_degrees
        );

        let raised = if self.alert_due(now, &issues) {
            let reasons: Vec<String> = issues.iter().map(ToString::to_string).collect();
            let message = format!(
                "Posture alert: {}. Please adjust your posture.",
                reasons.join(", ")
            );
            self.state.last_alert_at = Some(now);
            info!(
                "event=posture_alert bad_secs={:.1} issues={}",
                self.state.bad_duration_secs,
                issues.len()
            );
            Some(alerts.raise(AlertKind::Posture, message).clone())
        } else {
            None
        };

        self.issues = issues;
        raised
    }

    fn alert_due(&self, now: Instant, issues: &[PostureIssue]) -> bool {
        if issues.is_empty() || self.state.bad_duration_secs <= self.config.sustained_bad_secs {
            return false;
        }
        self.state
            .last_alert_at
            .is_none_or(|last| secs_between(last, now) > self.config.alert_interval_secs)
    }

    /// Reopen the cadence gate so the next usable frame is evaluated at once.
    pub fn reset_cadence(&mut self) {
        self.state.last_check_at = None;
    }

    /// Drop accumulated durations, the cadence gate and the last verdict.
    ///
    /// The alert throttle survives so a resume cannot re-alert immediately.
    pub fn reset(&mut self) {
        self.state.good_duration_secs = 0.0;
        self.state.bad_duration_secs = 0.0;
        self.reset_cadence();
        self.status = PostureStatus::Unknown;
        self.issues.clear();
    }

    /// Current timing state.
    #[must_use]
    pub const fn state(&self) -> &PostureState {
        &self.state
    }

    /// Verdict of the most recent evaluated cycle.
    #[must_use]
    pub const fn status(&self) -> PostureStatus {
        self.status
    }

    /// Issues found by the most recent evaluated cycle.
    #[must_use]
    pub fn issues(&self) -> &[PostureIssue] {
        &self.issues
    }
}
