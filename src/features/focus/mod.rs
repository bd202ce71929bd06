//! Screen-focus tracking.
//!
//! Detects sustained, uninterrupted screen-facing intervals:
//! - Face orientation heuristic
//! - Focus streak timer with break reminders

pub mod orientation;
pub mod timer;

pub use orientation::FaceOrientationClassifier;
pub use timer::{FocusState, FocusTimer};
