//! Monitoring lifecycle and the engine that ties the detectors together.

pub mod engine;
pub mod lifecycle;

pub use engine::{DetectionResult, Monitor, MonitorStats};
pub use lifecycle::{Gate, MonitoringLifecycle, MonitoringState, MonitoringStatus};
