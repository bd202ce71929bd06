//! Core abstractions for posturewatch.
//!
//! Time sources, landmark input types and duration helpers shared by the
//! detectors.

mod clock;
mod landmarks;
mod time;

pub use clock::{secs_between, Clock, ManualClock, SystemClock};
pub use landmarks::{FaceLandmark, FacePoint, Landmark, LandmarkFrame, PoseLandmark};
pub use time::{format_duration, format_mmss};
