//! The synchronized monitoring engine.
//!
//! [`Monitor`] owns every piece of detection state behind one mutex. The
//! frame loop calls [`Monitor::process_frame`]; a control plane on another
//! thread calls the lifecycle and query methods on the same shared instance.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::lifecycle::{Gate, MonitoringLifecycle, MonitoringStatus};
use crate::config::Config;
use crate::core::{Clock, LandmarkFrame, SystemClock};
use crate::error::PostureError;
use crate::features::alerts::{Alert, AlertDispatcher};
use crate::features::focus::{FaceOrientationClassifier, FocusTimer};
use crate::features::posture::{
    PostureIssue, PostureMetrics, PostureMetricsCalculator, PostureStateTracker, PostureStatus,
};

/// Outcome of processing one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    /// Posture metrics, when a usable pose was found.
    pub metrics: Option<PostureMetrics>,
    /// Whether the perception model reported a body.
    pub has_pose: bool,
    /// Whether the subject faced the screen.
    pub is_facing_screen: bool,
    /// Whether detection was skipped because of a pause or a snooze.
    pub paused_or_suppressed: bool,
    /// Whether detection was skipped because monitoring is paused.
    pub paused: bool,
    /// Seconds left in the snooze window, when suppressed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_suppression_secs: Option<f64>,
    /// Alerts raised while processing this frame, oldest first.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub raised: Vec<Alert>,
}

impl DetectionResult {
    fn paused() -> Self {
        Self {
            paused_or_suppressed: true,
            paused: true,
            ..Self::default()
        }
    }

    fn suppressed(remaining_secs: f64) -> Self {
        Self {
            paused_or_suppressed: true,
            remaining_suppression_secs: Some(remaining_secs),
            ..Self::default()
        }
    }
}

/// Statistics reported to the control plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorStats {
    /// Verdict of the latest posture cycle.
    pub posture_status: PostureStatus,
    /// Issues found by the latest posture cycle.
    pub posture_issues: Vec<PostureIssue>,
    /// Length of the latest focus streak, as last observed.
    pub focus_secs: f64,
    /// Focus time summed over all streaks.
    pub accumulated_focus_secs: f64,
    /// Posture alerts raised.
    pub posture_alerts: u64,
    /// Focus alerts raised.
    pub focus_alerts: u64,
}

struct MonitorCore {
    lifecycle: MonitoringLifecycle,
    posture: PostureStateTracker,
    focus: FocusTimer,
    alerts: AlertDispatcher,
}

/// Posture and focus monitoring engine.
///
/// All methods take `&self`; share it across threads with an [`Arc`].
pub struct Monitor {
    clock: Arc<dyn Clock>,
    calculator: PostureMetricsCalculator,
    classifier: FaceOrientationClassifier,
    default_snooze_secs: f64,
    core: Mutex<MonitorCore>,
}

impl Monitor {
    /// Build a monitor driven by `clock`.
    ///
    /// # Errors
    ///
    /// Returns `PostureError::Config` if the configuration fails validation.
    pub fn new(config: &Config, clock: Arc<dyn Clock>) -> Result<Self, PostureError> {
        config.validate()?;

        let core = MonitorCore {
            lifecycle: MonitoringLifecycle::new(config.monitoring.start_active),
            posture: PostureStateTracker::new(config.posture.clone()),
            focus: FocusTimer::new(config.focus.clone()),
            alerts: AlertDispatcher::new(),
        };

        Ok(Self {
            clock,
            calculator: PostureMetricsCalculator::new(config.posture.min_landmark_visibility),
            classifier: FaceOrientationClassifier::new(config.focus.center_tolerance),
            default_snooze_secs: config.monitoring.default_snooze_secs,
            core: Mutex::new(core),
        })
    }

    /// Build a monitor driven by the system clock.
    ///
    /// # Errors
    ///
    /// Returns `PostureError::Config` if the configuration fails validation.
    pub fn with_system_clock(config: &Config) -> Result<Self, PostureError> {
        Self::new(config, Arc::new(SystemClock))
    }

    fn lock(&self) -> MutexGuard<'_, MonitorCore> {
        // State stays consistent between statements, so a panic elsewhere
        // does not invalidate it.
        self.core.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run detection on one frame.
    ///
    /// Never fails: frames that cannot be evaluated are logged and treated as
    /// carrying no signal.
    pub fn process_frame(&self, frame: &LandmarkFrame) -> DetectionResult {
        let now = self.clock.now();
        let mut core = self.lock();

        match core.lifecycle.gate(now) {
            Gate::Paused => return DetectionResult::paused(),
            Gate::Suppressed { remaining_secs } => {
                return DetectionResult::suppressed(remaining_secs);
            }
            Gate::Open => {}
        }

        let has_pose = frame.has_pose();
        let metrics = if has_pose {
            self.calculator.calculate(frame).filter(|m| {
                let finite = m.is_finite();
                if !finite {
                    warn!("event=frame_discarded reason=non_finite_metrics");
                }
                finite
            })
        } else {
            None
        };

        let is_facing_screen = self.classifier.is_facing_screen(frame);

        let core = &mut *core;
        let mut raised = Vec::new();
        raised.extend(core.posture.check(now, metrics.as_ref(), &mut core.alerts));
        raised.extend(core.focus.update(now, is_facing_screen, &mut core.alerts));

        DetectionResult {
            metrics,
            has_pose,
            is_facing_screen,
            paused_or_suppressed: false,
            paused: false,
            remaining_suppression_secs: None,
            raised,
        }
    }

    /// Activate monitoring and cancel any snooze.
    pub fn start(&self) {
        self.lock().lifecycle.start();
        info!("event=monitoring_start");
    }

    /// Pause monitoring, ending any focus streak and dropping posture timing.
    ///
    /// Calling it again while paused changes nothing.
    pub fn pause(&self) {
        let mut core = self.lock();
        let was_active = core.lifecycle.pause();
        core.focus.reset();
        core.posture.reset();
        if was_active {
            info!("event=monitoring_pause");
        }
    }

    /// Withhold detection and alerts for `secs` seconds.
    ///
    /// # Errors
    ///
    /// Returns `PostureError::Config` for negative or non-finite durations.
    pub fn snooze(&self, secs: f64) -> Result<(), PostureError> {
        let now = self.clock.now();
        self.lock().lifecycle.snooze(now, secs)?;
        info!("event=monitoring_snooze secs={secs:.0}");
        Ok(())
    }

    /// Snooze for the configured default duration.
    ///
    /// # Errors
    ///
    /// Returns `PostureError::Config` if the configured duration is invalid.
    pub fn snooze_default(&self) -> Result<(), PostureError> {
        self.snooze(self.default_snooze_secs)
    }

    /// Monitoring status.
    #[must_use]
    pub fn status(&self) -> MonitoringStatus {
        let now = self.clock.now();
        self.lock().lifecycle.status(now)
    }

    /// Alert counters and focus statistics.
    #[must_use]
    pub fn stats(&self) -> MonitorStats {
        let core = self.lock();
        let counters = core.alerts.counters();
        MonitorStats {
            posture_status: core.posture.status(),
            posture_issues: core.posture.issues().to_vec(),
            focus_secs: core.focus.last_observed_secs(),
            accumulated_focus_secs: core.focus.accumulated_secs(),
            posture_alerts: counters.posture_alerts,
            focus_alerts: counters.focus_alerts,
        }
    }

    /// Take delivery of the pending alert message, if any.
    pub fn poll_alert(&self) -> Option<String> {
        self.lock().alerts.poll()
    }

    /// The most recent alert, delivered or not.
    #[must_use]
    pub fn current_alert(&self) -> Option<Alert> {
        self.lock().alerts.current().cloned()
    }
}

impl std::fmt::Debug for Monitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Monitor")
            .field("calculator", &self.calculator)
            .field("classifier", &self.classifier)
            .field("default_snooze_secs", &self.default_snooze_secs)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FaceLandmark, FacePoint, Landmark, ManualClock, PoseLandmark};
    use crate::features::alerts::AlertKind;

    fn slouched_pose() -> Vec<Landmark> {
        let mut points = vec![Landmark::new(0.5, 0.5, 1.0); PoseLandmark::COUNT];
        points[PoseLandmark::Nose.index()] = Landmark::new(0.7, 0.3, 1.0);
        // Ears well ahead of the shoulders: neck angle 45°.
        points[PoseLandmark::LeftEar.index()] = Landmark::new(0.8, 0.3, 1.0);
        points[PoseLandmark::RightEar.index()] = Landmark::new(0.6, 0.3, 1.0);
        points[PoseLandmark::LeftShoulder.index()] = Landmark::new(0.6, 0.5, 1.0);
        points[PoseLandmark::RightShoulder.index()] = Landmark::new(0.4, 0.5, 1.0);
        points
    }

    fn centered_face() -> Vec<FacePoint> {
        let mut points = vec![FacePoint::new(0.5, 0.5); FaceLandmark::COUNT];
        points[FaceLandmark::LeftEyeCorner.index()] = FacePoint::new(0.45, 0.45);
        points[FaceLandmark::RightEyeCorner.index()] = FacePoint::new(0.55, 0.45);
        points
    }

    fn bad_frame() -> LandmarkFrame {
        LandmarkFrame::new(640, 480).with_pose(slouched_pose())
    }

    fn setup() -> (Arc<ManualClock>, Monitor) {
        let clock = Arc::new(ManualClock::new());
        let monitor = Monitor::new(&Config::default(), clock.clone()).unwrap();
        (clock, monitor)
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut config = Config::default();
        config.focus.alert_interval_secs = -5.0;
        let err = Monitor::with_system_clock(&config).unwrap_err();
        assert!(matches!(err, PostureError::Config(_)));
    }

    #[test]
    fn test_bad_posture_alert_is_polled_once() {
        let (clock, monitor) = setup();

        for t in [3.0, 6.0, 9.0] {
            clock.set_secs(t).unwrap();
            let result = monitor.process_frame(&bad_frame());
            assert!(result.has_pose);
            assert!(result.raised.is_empty());
        }
        assert!(monitor.poll_alert().is_none());

        clock.set_secs(12.0).unwrap();
        let result = monitor.process_frame(&bad_frame());
        assert_eq!(result.raised.len(), 1);
        assert_eq!(result.raised[0].kind, AlertKind::Posture);

        let message = monitor.poll_alert().unwrap();
        assert!(message.starts_with("Posture alert: neck leaning forward ("));
        assert!(message.ends_with("Please adjust your posture."));
        assert!(monitor.poll_alert().is_none());

        let stats = monitor.stats();
        assert_eq!(stats.posture_alerts, 1);
        assert_eq!(stats.posture_status, PostureStatus::Poor);
    }

    #[test]
    fn test_paused_frames_are_skipped() {
        let (clock, monitor) = setup();
        monitor.pause();

        clock.set_secs(3.0).unwrap();
        let result = monitor.process_frame(&bad_frame());
        assert!(result.paused);
        assert!(result.paused_or_suppressed);
        assert!(!result.has_pose);
        assert!(result.metrics.is_none());
        assert!(!monitor.status().active);
    }

    #[test]
    fn test_pause_twice_matches_pause_once() {
        let (clock, monitor) = setup();
        clock.set_secs(3.0).unwrap();
        monitor.process_frame(&bad_frame());

        monitor.pause();
        let status_once = monitor.status();
        let stats_once = monitor.stats();

        monitor.pause();
        assert_eq!(monitor.status(), status_once);
        assert_eq!(monitor.stats(), stats_once);
    }

    #[test]
    fn test_snooze_skips_detection_until_deadline() {
        let (clock, monitor) = setup();

        clock.set_secs(100.0).unwrap();
        monitor.snooze(300.0).unwrap();

        let mut t = 100.0;
        while t < 400.0 {
            clock.set_secs(t).unwrap();
            let result = monitor.process_frame(&bad_frame());
            assert!(result.paused_or_suppressed);
            assert!(!result.paused);
            assert!(result.remaining_suppression_secs.is_some());
            assert!(monitor.status().suppressed);
            t += 3.0;
        }
        let stats = monitor.stats();
        assert_eq!(stats.posture_status, PostureStatus::Unknown);
        assert_eq!(stats.posture_alerts, 0);

        clock.set_secs(401.0).unwrap();
        assert!(!monitor.status().suppressed);
        let result = monitor.process_frame(&bad_frame());
        assert!(!result.paused_or_suppressed);
        assert!(result.metrics.is_some());
    }

    #[test]
    fn test_out_of_range_snooze_is_rejected() {
        let (clock, monitor) = setup();
        clock.set_secs(10.0).unwrap();

        let err = monitor.snooze(1.8e19).unwrap_err();
        assert!(matches!(err, PostureError::Config(_)));
        assert!(!monitor.status().suppressed);
        assert!(!monitor.process_frame(&bad_frame()).paused_or_suppressed);
    }

    #[test]
    fn test_pause_start_restarts_accumulation() {
        let (clock, monitor) = setup();
        for t in [3.0, 6.0, 9.0] {
            clock.set_secs(t).unwrap();
            monitor.process_frame(&bad_frame());
        }

        monitor.pause();
        monitor.start();

        // Three more cycles would have crossed the sustained threshold had the
        // pre-pause 9 s survived.
        for t in [10.0, 13.0, 16.0] {
            clock.set_secs(t).unwrap();
            let result = monitor.process_frame(&bad_frame());
            assert!(result.raised.is_empty());
        }
        clock.set_secs(19.0).unwrap();
        let result = monitor.process_frame(&bad_frame());
        assert_eq!(result.raised.len(), 1);
    }

    #[test]
    fn test_focus_alert_through_monitor() {
        let (clock, monitor) = setup();
        let frame = LandmarkFrame::new(640, 480).with_face(centered_face());

        let mut fired = Vec::new();
        for t in (0..=1200).step_by(10) {
            clock.set_secs(f64::from(t)).unwrap();
            let result = monitor.process_frame(&frame);
            assert!(result.is_facing_screen);
            assert!(!result.has_pose);
            if !result.raised.is_empty() {
                fired.push(t);
            }
        }

        assert_eq!(fired, vec![1200]);
        let stats = monitor.stats();
        assert_eq!(stats.focus_alerts, 1);
        assert_eq!(stats.focus_secs, 1200.0);
        assert_eq!(monitor.current_alert().unwrap().kind, AlertKind::Focus);
    }

    #[test]
    fn test_low_visibility_pose_skips_posture() {
        let (clock, monitor) = setup();
        let mut pose = slouched_pose();
        pose[PoseLandmark::LeftShoulder.index()].visibility = 0.1;
        let frame = LandmarkFrame::new(640, 480).with_pose(pose);

        clock.set_secs(3.0).unwrap();
        let result = monitor.process_frame(&frame);
        assert!(result.has_pose);
        assert!(result.metrics.is_none());
        assert_eq!(monitor.stats().posture_status, PostureStatus::Unknown);
    }

    #[test]
    fn test_non_finite_metrics_are_discarded() {
        let (clock, monitor) = setup();
        let mut pose = slouched_pose();
        pose[PoseLandmark::LeftEar.index()].x = f64::INFINITY;
        let frame = LandmarkFrame::new(640, 480).with_pose(pose);

        clock.set_secs(3.0).unwrap();
        let result = monitor.process_frame(&frame);
        assert!(result.metrics.is_none());
        assert_eq!(monitor.stats().posture_status, PostureStatus::Unknown);

        // The loop carries on with the next frame.
        clock.set_secs(6.0).unwrap();
        assert!(monitor.process_frame(&bad_frame()).metrics.is_some());
    }

    #[test]
    fn test_shared_across_threads() {
        let (clock, monitor) = setup();
        let monitor = Arc::new(monitor);

        let control = {
            let monitor = Arc::clone(&monitor);
            std::thread::spawn(move || {
                for _ in 0..100 {
                    let _ = monitor.status();
                    let _ = monitor.poll_alert();
                }
                monitor.pause();
            })
        };

        for t in 1..=100 {
            clock.set_secs(f64::from(t)).unwrap();
            monitor.process_frame(&bad_frame());
        }
        control.join().unwrap();

        assert!(!monitor.status().active);
    }
}
