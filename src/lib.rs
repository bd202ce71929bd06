//! posturewatch - posture and screen-focus alerting
//!
//! This crate turns per-frame pose and face landmarks into throttled alerts
//! about sustained poor posture and long uninterrupted screen focus. The
//! [`Monitor`] owns all detection state and can be shared between a frame
//! loop and a control plane.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod features;
pub mod logging;
pub mod output;

pub use cli::args::{Cli, Commands, OutputFormat};
pub use config::Config;
pub use crate::core::{Clock, LandmarkFrame, ManualClock, SystemClock};
pub use error::PostureError;
pub use features::alerts::{Alert, AlertKind};
pub use features::monitor::{DetectionResult, Monitor, MonitorStats, MonitoringStatus};
pub use features::posture::{PostureMetrics, PostureStatus};
