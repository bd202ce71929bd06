//! Detection and alerting features.
//!
//! - `posture`: metrics and the hysteresis posture tracker
//! - `focus`: face orientation and the focus streak timer
//! - `alerts`: the single-slot alert mailbox
//! - `monitor`: lifecycle control and the synchronized engine

pub mod alerts;
pub mod focus;
pub mod monitor;
pub mod posture;
