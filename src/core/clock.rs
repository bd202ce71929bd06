//! Monotonic time sources.
//!
//! All gating in the engine is measured against a [`Clock`] so the frame loop
//! can run on real time while tests and recorded sessions run on a
//! hand-driven one.

use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::error::PostureError;

/// Source of monotonic instants.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> Instant;
}

/// Clock backed by [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to.
///
/// Time is expressed as an offset from the instant the clock was created, so
/// `set_secs(12.0)` reads as "t = 12".
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    /// Create a clock positioned at t = 0.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    /// Move the clock to `secs` after its origin.
    ///
    /// # Errors
    ///
    /// Returns `PostureError::InvalidInput` for negative or non-finite values
    /// and for offsets too large to represent as an instant. The clock is left
    /// where it was.
    pub fn set_secs(&self, secs: f64) -> Result<(), PostureError> {
        let offset = Duration::try_from_secs_f64(secs)
            .ok()
            .filter(|offset| self.origin.checked_add(*offset).is_some())
            .ok_or_else(|| {
                PostureError::InvalidInput(format!("clock offset out of range: {secs}"))
            })?;
        *self.offset.lock().unwrap_or_else(PoisonError::into_inner) = offset;
        Ok(())
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let offset = *self.offset.lock().unwrap_or_else(PoisonError::into_inner);
        // set_secs only stores offsets that fit.
        self.origin.checked_add(offset).unwrap_or(self.origin)
    }
}

/// Seconds from `earlier` to `later`, zero if `later` precedes `earlier`.
#[must_use]
pub fn secs_between(earlier: Instant, later: Instant) -> f64 {
    later.saturating_duration_since(earlier).as_secs_f64()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_set() {
        let clock = ManualClock::new();
        let start = clock.now();

        clock.set_secs(12.0).unwrap();
        assert_eq!(secs_between(start, clock.now()), 12.0);
    }

    #[test]
    fn test_manual_clock_rejects_negative_and_non_finite() {
        let clock = ManualClock::new();
        let start = clock.now();
        clock.set_secs(5.0).unwrap();

        assert!(clock.set_secs(-1.0).is_err());
        assert!(clock.set_secs(f64::NAN).is_err());
        assert!(clock.set_secs(f64::INFINITY).is_err());
        assert_eq!(secs_between(start, clock.now()), 5.0);
    }

    #[test]
    fn test_manual_clock_rejects_unrepresentable_offset() {
        let clock = ManualClock::new();
        let start = clock.now();
        clock.set_secs(5.0).unwrap();

        let err = clock.set_secs(1.8e19).unwrap_err();
        assert!(matches!(err, PostureError::InvalidInput(_)));
        assert_eq!(secs_between(start, clock.now()), 5.0);
    }

    #[test]
    fn test_secs_between_saturates() {
        let clock = ManualClock::new();
        let early = clock.now();
        clock.set_secs(1.0).unwrap();
        let late = clock.now();
        assert_eq!(secs_between(late, early), 0.0);
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
