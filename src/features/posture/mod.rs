//! Posture detection.
//!
//! Turns body-pose landmarks into geometric metrics and smooths them into a
//! throttled posture alert:
//! - Neck angle, shoulder slouch and shoulder asymmetry metrics
//! - Hysteresis on good/bad posture duration
//! - Sustained-duration and minimum-interval alert gate

pub mod metrics;
pub mod tracker;

pub use metrics::{PostureMetrics, PostureMetricsCalculator};
pub use tracker::{PostureIssue, PostureState, PostureStateTracker, PostureStatus};
