//! Alert delivery.
//!
//! A depth-one mailbox: the most recent alert wins, and a consumer polling
//! late only ever sees the newest one.

pub mod dispatcher;

pub use dispatcher::{Alert, AlertCounters, AlertDispatcher, AlertKind};
