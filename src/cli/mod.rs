//! Command-line host for the monitoring engine.

pub mod args;
pub mod commands;
