//! Per-frame body keypoint observations

use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Named body landmark
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Landmark {
    /// Nose (only used to tell front from back views)
    Nose,
    /// Left shoulder
    LeftShoulder,
    /// Right shoulder
    RightShoulder,
    /// Left hip
    LeftHip,
    /// Right hip
    RightHip,
    /// Left knee
    LeftKnee,
    /// Right knee
    RightKnee,
    /// Left ankle
    LeftAnkle,
    /// Right ankle
    RightAnkle,
}

impl Landmark {
    /// Every landmark
    pub const ALL: [Landmark; 9] = [
        Landmark::Nose,
        Landmark::LeftShoulder,
        Landmark::RightShoulder,
        Landmark::LeftHip,
        Landmark::RightHip,
        Landmark::LeftKnee,
        Landmark::RightKnee,
        Landmark::LeftAnkle,
        Landmark::RightAnkle,
    ];
}

/// Body side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Subject's left
    Left,
    /// Subject's right
    Right,
}

impl Side {
    /// Both sides, left first
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    /// Shoulder landmark on this side
    pub fn shoulder(self) -> Landmark {
        match self {
            Side::Left => Landmark::LeftShoulder,
            Side::Right => Landmark::RightShoulder,
        }
    }

    /// Hip landmark on this side
    pub fn hip(self) -> Landmark {
        match self {
            Side::Left => Landmark::LeftHip,
            Side::Right => Landmark::RightHip,
        }
    }

    /// Knee landmark on this side
    pub fn knee(self) -> Landmark {
        match self {
            Side::Left => Landmark::LeftKnee,
            Side::Right => Landmark::RightKnee,
        }
    }

    /// Ankle landmark on this side
    pub fn ankle(self) -> Landmark {
        match self {
            Side::Left => Landmark::LeftAnkle,
            Side::Right => Landmark::RightAnkle,
        }
    }
}

/// 2-D position in normalized image coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    /// Horizontal position (0.0 = left edge, 1.0 = right edge)
    pub x: f32,
    /// Vertical position (0.0 = top edge, 1.0 = bottom edge)
    pub y: f32,
}

impl Point2 {
    /// Create a point
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Point2) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// Midpoint of whichever of the two points are present
    pub fn midpoint(a: Option<Point2>, b: Option<Point2>) -> Option<Point2> {
        match (a, b) {
            (Some(a), Some(b)) => Some(Point2::new((a.x + b.x) * 0.5, (a.y + b.y) * 0.5)),
            (Some(p), None) | (None, Some(p)) => Some(p),
            (None, None) => None,
        }
    }
}

/// Single detected landmark with its detection confidence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    /// Horizontal position, normalized
    pub x: f32,
    /// Vertical position, normalized
    pub y: f32,
    /// Detection confidence in [0, 1]
    pub confidence: f32,
}

/// Keypoints detected in one video frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameObservation {
    /// Frame index in the source video
    pub frame_idx: usize,

    /// Detected landmarks; landmarks the detector did not report are simply missing
    #[serde(default)]
    pub keypoints: BTreeMap<Landmark, Keypoint>,
}

impl FrameObservation {
    /// Create an observation with no landmarks
    pub fn new(frame_idx: usize) -> Self {
        Self {
            frame_idx,
            keypoints: BTreeMap::new(),
        }
    }

    /// Builder-style landmark insertion
    pub fn with(mut self, landmark: Landmark, x: f32, y: f32, confidence: f32) -> Self {
        self.keypoints.insert(landmark, Keypoint { x, y, confidence });
        self
    }

    /// Position of a landmark, or `None` when it is missing or below `min_confidence`
    pub fn point(&self, landmark: Landmark, min_confidence: f32) -> Option<Point2> {
        self.keypoints
            .get(&landmark)
            .filter(|kp| kp.confidence >= min_confidence && kp.x.is_finite() && kp.y.is_finite())
            .map(|kp| Point2::new(kp.x, kp.y))
    }

    /// Number of landmarks usable at `min_confidence`
    pub fn visible_count(&self, min_confidence: f32) -> usize {
        Landmark::ALL
            .iter()
            .filter(|l| self.point(**l, min_confidence).is_some())
            .count()
    }
}

/// Parse a JSON array of frame observations
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if the JSON is malformed.
pub fn parse_keypoints_json(content: &str) -> Result<Vec<FrameObservation>, AnalysisError> {
    let frames: Vec<FrameObservation> = serde_json::from_str(content)
        .map_err(|e| AnalysisError::InvalidInput(format!("malformed keypoint JSON: {}", e)))?;
    log::debug!("Parsed {} frame observations", frames.len());
    Ok(frames)
}

/// Load frame observations from a JSON file
pub fn load_keypoints_json<P: AsRef<Path>>(path: P) -> Result<Vec<FrameObservation>, AnalysisError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        AnalysisError::InvalidInput(format!("cannot read {}: {}", path.display(), e))
    })?;
    parse_keypoints_json(&content)
}

/// Check that frame indices are strictly increasing
pub fn validate_frame_order(frames: &[FrameObservation]) -> Result<(), AnalysisError> {
    for pair in frames.windows(2) {
        if pair[1].frame_idx <= pair[0].frame_idx {
            return Err(AnalysisError::InvalidInput(format!(
                "frame indices must be strictly increasing ({} followed by {})",
                pair[0].frame_idx, pair[1].frame_idx
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_low_confidence_landmark_is_absent() {
        let frame = FrameObservation::new(0)
            .with(Landmark::LeftHip, 0.5, 0.5, 0.9)
            .with(Landmark::RightHip, 0.5, 0.5, 0.2);
        assert!(frame.point(Landmark::LeftHip, 0.5).is_some());
        assert!(frame.point(Landmark::RightHip, 0.5).is_none());
        assert!(frame.point(Landmark::LeftKnee, 0.5).is_none());
    }

    #[test]
    fn test_visible_count_respects_confidence() {
        let frame = FrameObservation::new(0)
            .with(Landmark::LeftHip, 0.5, 0.5, 0.9)
            .with(Landmark::RightHip, 0.5, 0.5, 0.2)
            .with(Landmark::LeftKnee, f32::NAN, 0.7, 0.9)
            .with(Landmark::LeftAnkle, 0.5, 0.9, 0.6);
        assert_eq!(frame.visible_count(0.5), 2);
        assert_eq!(frame.visible_count(0.1), 3);
    }

    #[test]
    fn test_midpoint_uses_available_points() {
        let a = Point2::new(0.2, 0.4);
        let b = Point2::new(0.4, 0.6);
        let mid = Point2::midpoint(Some(a), Some(b)).unwrap();
        assert!((mid.x - 0.3).abs() < 1e-6);
        assert!((mid.y - 0.5).abs() < 1e-6);
        assert_eq!(Point2::midpoint(None, Some(b)), Some(b));
        assert_eq!(Point2::midpoint(None, None), None);
    }

    #[test]
    fn test_parse_keypoints_json() {
        let json = r#"[
            {"frame_idx": 0, "keypoints": {"left_hip": {"x": 0.5, "y": 0.45, "confidence": 0.98}}},
            {"frame_idx": 1}
        ]"#;
        let frames = parse_keypoints_json(json).unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].point(Landmark::LeftHip, 0.5), Some(Point2::new(0.5, 0.45)));
        assert!(frames[1].keypoints.is_empty());
    }

    #[test]
    fn test_parse_keypoints_json_malformed() {
        let result = parse_keypoints_json("{not json");
        assert!(matches!(result, Err(AnalysisError::InvalidInput(_))));
    }

    #[test]
    fn test_validate_frame_order() {
        let ordered = vec![FrameObservation::new(0), FrameObservation::new(2)];
        assert!(validate_frame_order(&ordered).is_ok());

        let repeated = vec![FrameObservation::new(3), FrameObservation::new(3)];
        assert!(validate_frame_order(&repeated).is_err());
    }
}
