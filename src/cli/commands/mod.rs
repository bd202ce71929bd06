//! Command implementations for posturewatch.

mod completions;
mod config;
mod replay;

pub use completions::completions;
pub use config::config;
pub use replay::{
    parse_line, replay, replay_from, ControlKind, RecordedEvent, ReplayCounts, Replayer,
};
