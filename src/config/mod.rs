//! Configuration management for posturewatch.
//!
//! This module handles loading and saving configuration from `~/.posturewatch/`.

mod paths;
mod settings;

pub use paths::Paths;
pub use settings::{Config, FocusConfig, LoggingConfig, MonitoringConfig, PostureConfig};
