//! Per-frame joint angles and alignment offsets
//!
//! Pure 2-D geometry in normalized image coordinates. Nothing is converted to
//! real-world lengths: camera distance and lens are unknown, so every derived
//! value is either an angle or a distance relative to the body in the image.
//!
//! Any landmark below the confidence threshold makes the values that need it
//! `None`; no sentinel values are used.

use crate::error::AnalysisError;
use crate::io::keypoints::{FrameObservation, Landmark, Point2, Side};
use serde::{Deserialize, Serialize};

/// Vectors shorter than this are treated as degenerate
const MIN_VECTOR_LENGTH: f32 = 1e-6;

/// Values derived from a single frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AngleSnapshot {
    /// Torso lean from vertical in degrees, 0 = upright
    pub back_angle: Option<f32>,

    /// Interior angle at the left knee in degrees
    pub left_knee_angle: Option<f32>,

    /// Interior angle at the right knee in degrees
    pub right_knee_angle: Option<f32>,

    /// Hip height (1.0 - mean hip y), larger is higher
    pub hip_height: Option<f32>,

    /// Knee height (1.0 - mean knee y)
    pub knee_height: Option<f32>,

    /// Mean hip-to-knee distance in the image
    pub thigh_length: Option<f32>,

    /// Mean signed knee-over-ankle offset, positive = knee outside the ankle
    /// relative to the body midline. Only meaningful when the camera faces the
    /// subject from the front or back.
    pub knee_offset: Option<f32>,

    /// Mean unsigned horizontal knee-to-ankle distance per side
    pub knee_travel: Option<f32>,

    /// Horizontal offset of the hip/knee centroid from the ankles
    pub balance_offset: Option<f32>,

    /// Landmarks above the confidence threshold in this frame
    #[serde(default)]
    pub visible_landmarks: usize,
}

impl AngleSnapshot {
    /// Mean of the available knee angles
    pub fn mean_knee_angle(&self) -> Option<f32> {
        mean_of(&[self.left_knee_angle, self.right_knee_angle])
    }
}

/// Compute the angle snapshot for one frame
///
/// # Arguments
///
/// * `frame` - Observed keypoints
/// * `min_confidence` - Landmarks below this confidence are ignored
pub fn compute_angles(frame: &FrameObservation, min_confidence: f32) -> AngleSnapshot {
    let point = |landmark: Landmark| frame.point(landmark, min_confidence);

    let shoulder = Point2::midpoint(point(Landmark::LeftShoulder), point(Landmark::RightShoulder));
    let hip = Point2::midpoint(point(Landmark::LeftHip), point(Landmark::RightHip));
    let knee = Point2::midpoint(point(Landmark::LeftKnee), point(Landmark::RightKnee));
    let ankle = Point2::midpoint(point(Landmark::LeftAnkle), point(Landmark::RightAnkle));

    let back_angle = match (hip, shoulder) {
        (Some(h), Some(s)) => back_angle(h, s).ok(),
        _ => None,
    };

    let side_knee_angle = |side: Side| match (point(side.hip()), point(side.knee()), point(side.ankle())) {
        (Some(h), Some(k), Some(a)) => knee_angle(h, k, a).ok(),
        _ => None,
    };

    let thigh_lengths: Vec<Option<f32>> = Side::BOTH
        .iter()
        .map(|side| match (point(side.hip()), point(side.knee())) {
            (Some(h), Some(k)) => Some(h.distance(&k)),
            _ => None,
        })
        .collect();

    let knee_offsets: Vec<Option<f32>> = Side::BOTH
        .iter()
        .map(|&side| match (point(side.knee()), point(side.ankle()), hip) {
            (Some(k), Some(a), Some(midline)) => {
                let outward = outward_direction(side, point(side.hip()), midline);
                Some((k.x - a.x) * outward)
            }
            _ => None,
        })
        .collect();

    let knee_travels: Vec<Option<f32>> = Side::BOTH
        .iter()
        .map(|side| match (point(side.knee()), point(side.ankle())) {
            (Some(k), Some(a)) => Some((k.x - a.x).abs()),
            _ => None,
        })
        .collect();

    let balance_offset = match (hip, knee, ankle) {
        (Some(h), Some(k), Some(a)) => Some((h.x + k.x) * 0.5 - a.x),
        _ => None,
    };

    AngleSnapshot {
        back_angle,
        left_knee_angle: side_knee_angle(Side::Left),
        right_knee_angle: side_knee_angle(Side::Right),
        hip_height: hip.map(|p| 1.0 - p.y),
        knee_height: knee.map(|p| 1.0 - p.y),
        thigh_length: mean_of(&thigh_lengths),
        knee_offset: mean_of(&knee_offsets),
        knee_travel: mean_of(&knee_travels),
        balance_offset,
        visible_landmarks: frame.visible_count(min_confidence),
    }
}

/// Torso lean from vertical in degrees
///
/// Angle between the hip → shoulder vector and straight up, in [0, 180]. Leaning
/// left and leaning right give the same value.
///
/// # Errors
///
/// Returns `AnalysisError::GeometryUndefined` if hip and shoulder coincide.
///
/// # Example
///
/// ```
/// use squat_form::features::angles::back_angle;
/// use squat_form::io::keypoints::Point2;
///
/// let upright = back_angle(Point2::new(0.5, 0.6), Point2::new(0.5, 0.3)).unwrap();
/// assert_eq!(upright, 0.0);
/// ```
pub fn back_angle(hip: Point2, shoulder: Point2) -> Result<f32, AnalysisError> {
    let dx = shoulder.x - hip.x;
    let dy = shoulder.y - hip.y;
    if (dx * dx + dy * dy).sqrt() < MIN_VECTOR_LENGTH {
        return Err(AnalysisError::GeometryUndefined(
            "hip and shoulder coincide".to_string(),
        ));
    }
    // Image y grows downward, so "up" is -y
    Ok(dx.abs().atan2(-dy).to_degrees())
}

/// Interior angle at `vertex` between the rays to `a` and `b`, in [0, 180] degrees
///
/// # Errors
///
/// Returns `AnalysisError::GeometryUndefined` if either ray has zero length.
pub fn three_point_angle(a: Point2, vertex: Point2, b: Point2) -> Result<f32, AnalysisError> {
    let (v1x, v1y) = (a.x - vertex.x, a.y - vertex.y);
    let (v2x, v2y) = (b.x - vertex.x, b.y - vertex.y);
    let n1 = (v1x * v1x + v1y * v1y).sqrt();
    let n2 = (v2x * v2x + v2y * v2y).sqrt();
    if n1 < MIN_VECTOR_LENGTH || n2 < MIN_VECTOR_LENGTH {
        return Err(AnalysisError::GeometryUndefined(
            "zero-length limb segment".to_string(),
        ));
    }
    let cos = ((v1x * v2x + v1y * v2y) / (n1 * n2)).clamp(-1.0, 1.0);
    Ok(cos.acos().to_degrees())
}

/// Knee flexion angle: interior angle at the knee between thigh and shin
pub fn knee_angle(hip: Point2, knee: Point2, ankle: Point2) -> Result<f32, AnalysisError> {
    three_point_angle(hip, knee, ankle)
}

/// +1.0 when increasing x points away from the body midline on this side
///
/// Uses the side's hip position relative to the hip midpoint. When the hips
/// overlap (side-on view) the subject's left is assumed to appear on the image
/// right, as for a subject facing the camera.
fn outward_direction(side: Side, side_hip: Option<Point2>, midline: Point2) -> f32 {
    match side_hip {
        Some(h) if (h.x - midline.x).abs() > MIN_VECTOR_LENGTH => (h.x - midline.x).signum(),
        _ => match side {
            Side::Left => 1.0,
            Side::Right => -1.0,
        },
    }
}

fn mean_of(values: &[Option<f32>]) -> Option<f32> {
    let (sum, n) = values
        .iter()
        .flatten()
        .fold((0.0f32, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f32)
}
