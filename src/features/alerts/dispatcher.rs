//! Single-slot alert mailbox and alert counters.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What an alert is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    /// Sustained poor posture.
    Posture,
    /// Prolonged uninterrupted screen focus.
    Focus,
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Posture => write!(f, "posture"),
            Self::Focus => write!(f, "focus"),
        }
    }
}

/// A raised alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    /// Alert category.
    pub kind: AlertKind,
    /// Human-readable message.
    pub message: String,
    /// Wall-clock time the alert was raised.
    pub raised_at: DateTime<Utc>,
    /// Whether a consumer has yet to poll this alert.
    pub undelivered: bool,
}

/// Number of alerts raised per kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertCounters {
    /// Posture alerts raised since start-up.
    pub posture_alerts: u64,
    /// Focus alerts raised since start-up.
    pub focus_alerts: u64,
}

/// Holds the live alert and the per-kind counters.
///
/// Raising an alert replaces the previous one whether or not it was
/// delivered: last alert wins.
#[derive(Debug, Clone, Default)]
pub struct AlertDispatcher {
    current: Option<Alert>,
    counters: AlertCounters,
}

impl AlertDispatcher {
    /// Create an empty dispatcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the live alert and count it.
    pub fn raise(&mut self, kind: AlertKind, message: impl Into<String>) -> &Alert {
        match kind {
            AlertKind::Posture => self.counters.posture_alerts += 1,
            AlertKind::Focus => self.counters.focus_alerts += 1,
        }
        self.current.insert(Alert {
            kind,
            message: message.into(),
            raised_at: Utc::now(),
            undelivered: true,
        })
    }

    /// Take delivery of the pending alert.
    ///
    /// Returns the message if it has not been polled yet, `None` otherwise.
    /// The alert itself stays in place until the next [`raise`](Self::raise).
    pub fn poll(&mut self) -> Option<String> {
        let alert = self.current.as_mut().filter(|a| a.undelivered)?;
        alert.undelivered = false;
        Some(alert.message.clone())
    }

    /// The most recent alert, delivered or not.
    #[must_use]
    pub const fn current(&self) -> Option<&Alert> {
        self.current.as_ref()
    }

    /// Alert counters.
    #[must_use]
    pub const fn counters(&self) -> AlertCounters {
        self.counters
    }
}
