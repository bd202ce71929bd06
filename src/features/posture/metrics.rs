//! Geometric posture metrics from body-pose landmarks.

use serde::{Deserialize, Serialize};

use crate::core::{Landmark, LandmarkFrame, PoseLandmark};

/// Posture measurements for a single frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PostureMetrics {
    /// Angle between the shoulder-to-ear vector and vertical. 0° is upright.
    pub neck_angle_degrees: f64,
    /// Mean distance between each shoulder and the ear on the same side.
    pub shoulder_slouch_distance: f64,
    /// Absolute vertical offset between the two shoulders.
    pub shoulder_asymmetry: f64,
}

impl PostureMetrics {
    /// Whether every metric is a finite number.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.neck_angle_degrees.is_finite()
            && self.shoulder_slouch_distance.is_finite()
            && self.shoulder_asymmetry.is_finite()
    }
}

/// Computes [`PostureMetrics`] from a landmark frame.
#[derive(Debug, Clone, Copy)]
pub struct PostureMetricsCalculator {
    min_visibility: f64,
}

impl PostureMetricsCalculator {
    /// Create a calculator that ignores landmarks below `min_visibility`.
    #[must_use]
    pub const fn new(min_visibility: f64) -> Self {
        Self { min_visibility }
    }

    fn required(&self, frame: &LandmarkFrame, which: PoseLandmark) -> Option<Landmark> {
        frame
            .pose_landmark(which)
            .filter(|lm| lm.is_visible(self.min_visibility))
            .copied()
    }

    /// Compute metrics, or `None` when any required landmark is missing or
    /// not visible enough.
    #[must_use]
    pub fn calculate(&self, frame: &LandmarkFrame) -> Option<PostureMetrics> {
        self.required(frame, PoseLandmark::Nose)?;
        let left_ear = self.required(frame, PoseLandmark::LeftEar)?;
        let right_ear = self.required(frame, PoseLandmark::RightEar)?;
        let left_shoulder = self.required(frame, PoseLandmark::LeftShoulder)?;
        let right_shoulder = self.required(frame, PoseLandmark::RightShoulder)?;

        Some(compute(left_ear, right_ear, left_shoulder, right_shoulder))
    }
}

fn distance(a: Landmark, b: Landmark) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

fn compute(
    left_ear: Landmark,
    right_ear: Landmark,
    left_shoulder: Landmark,
    right_shoulder: Landmark,
) -> PostureMetrics {
    let ear_mid = (
        (left_ear.x + right_ear.x) / 2.0,
        (left_ear.y + right_ear.y) / 2.0,
    );
    let shoulder_mid = (
        (left_shoulder.x + right_shoulder.x) / 2.0,
        (left_shoulder.y + right_shoulder.y) / 2.0,
    );

    // Image Y grows downwards; flip it so an ear directly above the shoulders
    // points straight up.
    let dx = ear_mid.0 - shoulder_mid.0;
    let dy = shoulder_mid.1 - ear_mid.1;
    let neck_angle_degrees = 90.0 - dy.atan2(dx).to_degrees();

    let shoulder_slouch_distance =
        (distance(left_shoulder, left_ear) + distance(right_shoulder, right_ear)) / 2.0;

    let shoulder_asymmetry = (left_shoulder.y - right_shoulder.y).abs();

    PostureMetrics {
        neck_angle_degrees,
        shoulder_slouch_distance,
        shoulder_asymmetry,
    }
}
