//! Landmark input delivered by the perception subsystem.
//!
//! Coordinates are normalized to the frame (0.0 at the left/top edge, 1.0 at
//! the right/bottom edge). Pose indices follow the 33-point body topology and
//! face indices follow the 468-point face mesh.

use serde::{Deserialize, Serialize};

/// A body-pose landmark with its detection confidence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// Normalized X coordinate.
    pub x: f64,
    /// Normalized Y coordinate.
    pub y: f64,
    /// Visibility / confidence score in [0, 1].
    #[serde(default = "full_visibility")]
    pub visibility: f64,
}

const fn full_visibility() -> f64 {
    1.0
}

impl Landmark {
    /// Create a landmark.
    #[must_use]
    pub const fn new(x: f64, y: f64, visibility: f64) -> Self {
        Self { x, y, visibility }
    }

    /// Whether the landmark is at least `threshold` visible.
    #[must_use]
    pub fn is_visible(&self, threshold: f64) -> bool {
        self.visibility >= threshold
    }
}

/// A facial landmark.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FacePoint {
    /// Normalized X coordinate.
    pub x: f64,
    /// Normalized Y coordinate.
    pub y: f64,
}

impl FacePoint {
    /// Create a face point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Body-pose landmarks consumed by the posture metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum PoseLandmark {
    Nose = 0,
    LeftEar = 7,
    RightEar = 8,
    LeftShoulder = 11,
    RightShoulder = 12,
}

impl PoseLandmark {
    /// Number of points in a full pose.
    pub const COUNT: usize = 33;

    /// Position of this landmark in the pose array.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Face-mesh landmarks consumed by the orientation classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum FaceLandmark {
    NoseTip = 4,
    LeftEyeCorner = 33,
    RightEyeCorner = 263,
}

impl FaceLandmark {
    /// Number of points in a full face mesh.
    pub const COUNT: usize = 468;

    /// Position of this landmark in the face array.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Perception output for one processed frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LandmarkFrame {
    /// Body-pose landmarks, `None` when no body was detected.
    #[serde(default)]
    pub pose: Option<Vec<Landmark>>,
    /// Face-mesh landmarks for the first detected face.
    #[serde(default)]
    pub face: Option<Vec<FacePoint>>,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
}

impl LandmarkFrame {
    /// Create an empty frame of the given size.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            pose: None,
            face: None,
            width,
            height,
        }
    }

    /// Attach pose landmarks.
    #[must_use]
    pub fn with_pose(mut self, pose: Vec<Landmark>) -> Self {
        self.pose = Some(pose);
        self
    }

    /// Attach face landmarks.
    #[must_use]
    pub fn with_face(mut self, face: Vec<FacePoint>) -> Self {
        self.face = Some(face);
        self
    }

    /// Whether the perception model reported a body.
    #[must_use]
    pub fn has_pose(&self) -> bool {
        self.pose.as_ref().is_some_and(|p| !p.is_empty())
    }

    /// Look up a pose landmark.
    #[must_use]
    pub fn pose_landmark(&self, which: PoseLandmark) -> Option<&Landmark> {
        self.pose.as_ref()?.get(which.index())
    }

    /// Look up a face landmark.
    #[must_use]
    pub fn face_point(&self, which: FaceLandmark) -> Option<&FacePoint> {
        self.face.as_ref()?.get(which.index())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landmark_visibility() {
        let lm = Landmark::new(0.5, 0.5, 0.4);
        assert!(lm.is_visible(0.4));
        assert!(!lm.is_visible(0.5));
    }

    #[test]
    fn test_indices() {
        assert_eq!(PoseLandmark::LeftShoulder.index(), 11);
        assert_eq!(PoseLandmark::RightEar.index(), 8);
        assert_eq!(FaceLandmark::RightEyeCorner.index(), 263);
    }

    #[test]
    fn test_lookup_out_of_range() {
        let frame = LandmarkFrame::new(640, 480).with_pose(vec![Landmark::new(0.5, 0.5, 1.0)]);
        assert!(frame.has_pose());
        assert!(frame.pose_landmark(PoseLandmark::Nose).is_some());
        assert!(frame.pose_landmark(PoseLandmark::LeftShoulder).is_none());
        assert!(frame.face_point(FaceLandmark::NoseTip).is_none());
    }

    #[test]
    fn test_empty_pose_is_no_pose() {
        let frame = LandmarkFrame::new(640, 480).with_pose(Vec::new());
        assert!(!frame.has_pose());
    }

    #[test]
    fn test_deserialize_defaults_visibility() {
        let frame: LandmarkFrame =
            serde_json::from_str(r#"{"pose":[{"x":0.1,"y":0.2}],"width":10,"height":20}"#)
                .unwrap();
        let pose = frame.pose.unwrap();
        assert_eq!(pose[0].visibility, 1.0);
        assert!(frame.face.is_none());
    }
}
