//! Active / paused / snoozed monitoring lifecycle.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::core::secs_between;
use crate::error::PostureError;

/// Lifecycle flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitoringState {
    /// Whether detection runs at all.
    pub active: bool,
    /// End of the snooze window, `None` when no snooze was requested.
    pub suppress_until: Option<Instant>,
}

/// Externally visible monitoring status.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonitoringStatus {
    /// Whether monitoring is active.
    pub active: bool,
    /// Whether a snooze window is currently open.
    pub suppressed: bool,
    /// Seconds left in the snooze window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_suppression_secs: Option<f64>,
}

/// Per-frame verdict of the lifecycle gate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gate {
    /// Run the full detection pipeline.
    Open,
    /// Monitoring is paused; skip everything.
    Paused,
    /// A snooze window is open; skip detection and alerting.
    Suppressed {
        /// Seconds until the window closes.
        remaining_secs: f64,
    },
}

/// Holds the active flag and the snooze deadline.
#[derive(Debug, Clone)]
pub struct MonitoringLifecycle {
    state: MonitoringState,
}

impl MonitoringLifecycle {
    /// Create a lifecycle, active or paused.
    #[must_use]
    pub const fn new(active: bool) -> Self {
        Self {
            state: MonitoringState {
                active,
                suppress_until: None,
            },
        }
    }

    /// Activate monitoring and cancel any snooze.
    pub fn start(&mut self) {
        self.state.active = true;
        self.state.suppress_until = None;
    }

    /// Deactivate monitoring. Returns whether it was active before.
    pub fn pause(&mut self) -> bool {
        std::mem::replace(&mut self.state.active, false)
    }

    /// Open (or extend) a snooze window of `secs` from `now`.
    ///
    /// The deadline never moves backwards: a shorter snooze inside a longer
    /// one leaves the longer deadline in place.
    ///
    /// # Errors
    ///
    /// Returns `PostureError::Config` for negative or non-finite durations and
    /// for windows ending beyond the representable clock range. The existing
    /// deadline is left untouched.
    pub fn snooze(&mut self, now: Instant, secs: f64) -> Result<Instant, PostureError> {
        let duration = Duration::try_from_secs_f64(secs).map_err(|_| {
            PostureError::Config(format!(
                "snooze duration must be a finite, non-negative number of seconds (got {secs})"
            ))
        })?;
        let requested = now.checked_add(duration).ok_or_else(|| {
            PostureError::Config(format!("snooze duration {secs} is out of range"))
        })?;
        let deadline = self
            .state
            .suppress_until
            .map_or(requested, |current| current.max(requested));
        self.state.suppress_until = Some(deadline);
        Ok(deadline)
    }

    /// Seconds left in the snooze window, `None` when not suppressed.
    #[must_use]
    pub fn remaining_suppression(&self, now: Instant) -> Option<f64> {
        self.state
            .suppress_until
            .filter(|until| now < *until)
            .map(|until| secs_between(now, until))
    }

    /// Decide what the frame loop may do at `now`.
    #[must_use]
    pub fn gate(&self, now: Instant) -> Gate {
        if !self.state.active {
            return Gate::Paused;
        }
        self.remaining_suppression(now)
            .map_or(Gate::Open, |remaining_secs| Gate::Suppressed { remaining_secs })
    }

    /// Status as reported to the control plane.
    #[must_use]
    pub fn status(&self, now: Instant) -> MonitoringStatus {
        let remaining = self.remaining_suppression(now);
        MonitoringStatus {
            active: self.state.active,
            suppressed: remaining.is_some(),
            remaining_suppression_secs: remaining,
        }
    }

    /// Raw lifecycle flags.
    #[must_use]
    pub const fn state(&self) -> &MonitoringState {
        &self.state
    }
}

impl Default for MonitoringLifecycle {
    fn default() -> Self {
        Self::new(true)
    }
}
