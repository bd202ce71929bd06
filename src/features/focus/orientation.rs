//! Coarse "facing the screen" classification.
//!
//! The eye midpoint has to sit near the middle of the frame. This is a
//! proximity-to-center check, not a gaze estimate.

use crate::core::{FaceLandmark, LandmarkFrame};

/// Classifies whether the subject faces the screen.
#[derive(Debug, Clone, Copy)]
pub struct FaceOrientationClassifier {
    center_tolerance: f64,
}

impl FaceOrientationClassifier {
    /// Create a classifier accepting eye midpoints within `center_tolerance`
    /// (as a fraction of each frame dimension) of the frame center.
    #[must_use]
    pub const fn new(center_tolerance: f64) -> Self {
        Self { center_tolerance }
    }

    /// Whether the face in `frame` is oriented towards the screen.
    ///
    /// Frames without facial landmarks, or with a degenerate size, are never
    /// facing the screen.
    #[must_use]
    pub fn is_facing_screen(&self, frame: &LandmarkFrame) -> bool {
        let (Some(left), Some(right)) = (
            frame.face_point(FaceLandmark::LeftEyeCorner),
            frame.face_point(FaceLandmark::RightEyeCorner),
        ) else {
            return false;
        };
        if frame.width == 0 || frame.height == 0 {
            return false;
        }

        let width = f64::from(frame.width);
        let height = f64::from(frame.height);

        let eye_mid_x = (left.x + right.x) / 2.0;
        let eye_mid_y = (left.y + right.y) / 2.0;

        let offset_x = (eye_mid_x * width - width / 2.0).abs() / width;
        let offset_y = (eye_mid_y * height - height / 2.0).abs() / height;

        offset_x < self.center_tolerance && offset_y < self.center_tolerance
    }
}
