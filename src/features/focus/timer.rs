//! Screen-focus streak tracking.
//!
//! A streak is a contiguous run of frames classified as facing the screen.
//! Looking away ends it; a streak that reaches the alert threshold raises a
//! break reminder and starts over, so one long session keeps reminding.

use std::time::Instant;

use log::{debug, info};

use crate::config::FocusConfig;
use crate::core::{format_duration, secs_between};
use crate::features::alerts::{Alert, AlertDispatcher, AlertKind};

/// Live focus timing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FocusState {
    /// Start of the streak in progress.
    pub contact_started_at: Option<Instant>,
    /// Length of the streak in progress, as of the last facing frame.
    pub current_streak_secs: f64,
    /// When the last focus alert fired, `None` if it never has.
    pub last_alert_at: Option<Instant>,
}

/// Tracks focus streaks and decides when to remind the subject to take a break.
#[derive(Debug, Clone)]
pub struct FocusTimer {
    config: FocusConfig,
    state: FocusState,
    last_observed_secs: f64,
    completed_secs: f64,
}

impl FocusTimer {
    /// Create a timer with no streak in progress.
    #[must_use]
    pub fn new(config: FocusConfig) -> Self {
        Self {
            config,
            state: FocusState::default(),
            last_observed_secs: 0.0,
            completed_secs: 0.0,
        }
    }

    /// Feed one frame's facing verdict.
    ///
    /// Returns the focus alert raised by this frame, if any.
    pub fn update(
        &mut self,
        now: Instant,
        facing_screen: bool,
        alerts: &mut AlertDispatcher,
    ) -> Option<Alert> {
        if !facing_screen {
            self.end_streak();
            return None;
        }

        let Some(started) = self.state.contact_started_at else {
            debug!("event=focus_streak_start");
            self.state.contact_started_at = Some(now);
            self.state.current_streak_secs = 0.0;
            return None;
        };

        let streak = secs_between(started, now);
        self.state.current_streak_secs = streak;
        self.last_observed_secs = streak;

        if !self.alert_due(now) {
            return None;
        }

        let message = format!(
            "Take a break! You've been focused on the screen for {}.",
            format_duration(streak)
        );
        info!("event=focus_alert streak_secs={streak:.0}");

        self.state.last_alert_at = Some(now);
        self.completed_secs += streak;
        self.state.contact_started_at = Some(now);
        self.state.current_streak_secs = 0.0;

        Some(alerts.raise(AlertKind::Focus, message).clone())
    }

    fn alert_due(&self, now: Instant) -> bool {
        if self.state.current_streak_secs < self.config.streak_alert_secs {
            return false;
        }
        self.state.last_alert_at.is_none_or(|last| {
            secs_between(last, now) >= self.config.alert_interval_secs
        })
    }

    fn end_streak(&mut self) {
        if self.state.contact_started_at.take().is_some() {
            debug!(
                "event=focus_streak_end streak_secs={:.1}",
                self.state.current_streak_secs
            );
            self.completed_secs += self.state.current_streak_secs;
        }
        self.state.current_streak_secs = 0.0;
    }

    /// End any streak in progress without touching the alert throttle.
    pub fn reset(&mut self) {
        self.end_streak();
    }

    /// Current timing state.
    #[must_use]
    pub const fn state(&self) -> &FocusState {
        &self.state
    }

    /// Streak length as last observed on a facing frame.
    ///
    /// Overwritten on every facing frame and left in place when a streak ends,
    /// so a short look-away resets it only once the next streak has grown.
    #[must_use]
    pub const fn last_observed_secs(&self) -> f64 {
        self.last_observed_secs
    }

    /// Total focus time across all streaks, including the one in progress.
    #[must_use]
    pub fn accumulated_secs(&self) -> f64 {
        self.completed_secs + self.state.current_streak_secs
    }
}
