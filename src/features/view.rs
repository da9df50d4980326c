//! Camera viewpoint classification
//!
//! Uses the early, standing frames. In a side-on recording the left and right
//! shoulders overlap in the image; facing or turned away from the camera they
//! separate. The classification is advisory: a non-ideal view only produces a
//! warning.

use crate::config::AnalysisConfig;
use crate::io::keypoints::{FrameObservation, Landmark, Point2};
use serde::{Deserialize, Serialize};

/// Offset of the nose from the shoulder centre that decides facing direction
const ORIENTATION_MARGIN: f32 = 0.02;

/// Width-to-vertical-offset ratio above which wide shoulders mean a square-on view
const SQUARE_ON_RATIO: f32 = 10.0;

/// Camera view relative to the subject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewAngle {
    /// Camera perpendicular to the subject (ideal)
    SideView,
    /// Subject facing the camera
    FrontView,
    /// Subject's back to the camera
    BackView,
    /// Diagonal view
    AngledView,
    /// Could not be determined
    Unknown,
}

/// Facing direction in a side view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Subject faces the image left
    FacingLeft,
    /// Subject faces the image right
    FacingRight,
    /// Could not be determined
    Unknown,
}

/// Viewpoint information attached to an analysis result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoAngle {
    /// Detected view
    pub view_angle: ViewAngle,

    /// Facing direction, only detected for side views
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Orientation>,

    /// True for side-on recordings
    pub is_ideal: bool,

    /// Advisory message for non-ideal views
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl ViewAngle {
    /// Warning text for views other than side-on
    pub fn warning(&self) -> Option<&'static str> {
        match self {
            ViewAngle::SideView => None,
            ViewAngle::FrontView => {
                Some("Front view detected. Side view recommended for accurate analysis.")
            }
            ViewAngle::BackView => {
                Some("Back view detected. Side view recommended for accurate analysis.")
            }
            ViewAngle::AngledView => {
                Some("Angled view detected. Side view (90°) recommended for best results.")
            }
            ViewAngle::Unknown => Some("Could not determine video angle. Side view recommended."),
        }
    }
}

/// Classify the recording viewpoint from the first usable frames
///
/// A frame is usable here when both shoulders are confidently detected; the
/// first `config.view_sample_frames` such frames are averaged.
///
/// # Algorithm
///
/// 1. Mean shoulder width (|left x - right x|), vertical shoulder offset and torso height
/// 2. Narrow shoulders over a tall torso → side view, then detect orientation
/// 3. Medium width → angled view
/// 4. Wide, level shoulders → front view if the nose is visible, otherwise back view
pub fn classify_view(frames: &[FrameObservation], config: &AnalysisConfig) -> VideoAngle {
    let min_conf = config.min_confidence;
    let samples: Vec<&FrameObservation> = frames
        .iter()
        .filter(|f| {
            f.point(Landmark::LeftShoulder, min_conf).is_some()
                && f.point(Landmark::RightShoulder, min_conf).is_some()
        })
        .take(config.view_sample_frames.max(1))
        .collect();

    let view_angle = detect_view_angle(&samples, config);
    let orientation = (view_angle == ViewAngle::SideView).then(|| detect_orientation(&samples, min_conf));

    log::debug!(
        "View classified as {:?} (orientation {:?}) from {} sample frames",
        view_angle,
        orientation,
        samples.len()
    );
    if let Some(warning) = view_angle.warning() {
        log::warn!("{}", warning);
    }

    VideoAngle {
        view_angle,
        orientation,
        is_ideal: view_angle == ViewAngle::SideView,
        warning: view_angle.warning().map(str::to_string),
    }
}

fn detect_view_angle(samples: &[&FrameObservation], config: &AnalysisConfig) -> ViewAngle {
    if samples.is_empty() {
        return ViewAngle::Unknown;
    }
    let min_conf = config.min_confidence;

    let mut width_sum = 0.0f32;
    let mut offset_sum = 0.0f32;
    let mut torso_sum = 0.0f32;
    let mut torso_n = 0usize;
    for frame in samples {
        let (Some(ls), Some(rs)) = (
            frame.point(Landmark::LeftShoulder, min_conf),
            frame.point(Landmark::RightShoulder, min_conf),
        ) else {
            continue;
        };
        width_sum += (rs.x - ls.x).abs();
        offset_sum += (rs.y - ls.y).abs();

        let hip = Point2::midpoint(
            frame.point(Landmark::LeftHip, min_conf),
            frame.point(Landmark::RightHip, min_conf),
        );
        if let Some(hip) = hip {
            torso_sum += (hip.y - (ls.y + rs.y) * 0.5).abs();
            torso_n += 1;
        }
    }

    let n = samples.len() as f32;
    let width = width_sum / n;
    let vertical_offset = offset_sum / n;
    let torso_height = (torso_n > 0).then(|| torso_sum / torso_n as f32);

    log::debug!(
        "Shoulder width {:.3}, vertical offset {:.3}, torso height {:?}",
        width,
        vertical_offset,
        torso_height
    );

    if width < config.side_view_max_shoulder_width {
        match torso_height {
            Some(h) if h >= config.min_torso_height => ViewAngle::SideView,
            _ => ViewAngle::Unknown,
        }
    } else if width <= config.angled_view_max_shoulder_width {
        ViewAngle::AngledView
    } else if width / (vertical_offset + 1e-3) > SQUARE_ON_RATIO {
        let nose_visible = samples
            .iter()
            .filter(|f| f.point(Landmark::Nose, min_conf).is_some())
            .count();
        if nose_visible * 2 > samples.len() {
            ViewAngle::FrontView
        } else {
            ViewAngle::BackView
        }
    } else {
        ViewAngle::Unknown
    }
}

fn detect_orientation(samples: &[&FrameObservation], min_conf: f32) -> Orientation {
    let offsets: Vec<f32> = samples
        .iter()
        .filter_map(|f| {
            let nose = f.point(Landmark::Nose, min_conf)?;
            let ls = f.point(Landmark::LeftShoulder, min_conf)?;
            let rs = f.point(Landmark::RightShoulder, min_conf)?;
            Some(nose.x - (ls.x + rs.x) * 0.5)
        })
        .collect();

    if offsets.is_empty() {
        return Orientation::Unknown;
    }
    let mean = offsets.iter().sum::<f32>() / offsets.len() as f32;
    if mean < -ORIENTATION_MARGIN {
        Orientation::FacingLeft
    } else if mean > ORIENTATION_MARGIN {
        Orientation::FacingRight
    } else {
        Orientation::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standing(shoulder_width: f32, nose_dx: Option<f32>) -> Vec<FrameObservation> {
        (0..12)
            .map(|i| {
                let cx = 0.5;
                let mut f = FrameObservation::new(i)
                    .with(Landmark::LeftShoulder, cx + shoulder_width / 2.0, 0.3, 0.9)
                    .with(Landmark::RightShoulder, cx - shoulder_width / 2.0, 0.3, 0.9)
                    .with(Landmark::LeftHip, cx, 0.55, 0.9)
                    .with(Landmark::RightHip, cx, 0.55, 0.9);
                if let Some(dx) = nose_dx {
                    f = f.with(Landmark::Nose, cx + dx, 0.2, 0.9);
                }
                f
            })
            .collect()
    }

    #[test]
    fn test_side_view_is_ideal() {
        let info = classify_view(&standing(0.02, Some(-0.05)), &AnalysisConfig::default());
        assert_eq!(info.view_angle, ViewAngle::SideView);
        assert!(info.is_ideal);
        assert!(info.warning.is_none());
        assert_eq!(info.orientation, Some(Orientation::FacingLeft));
    }

    #[test]
    fn test_front_and_back_views() {
        let config = AnalysisConfig::default();
        let front = classify_view(&standing(0.25, Some(0.0)), &config);
        assert_eq!(front.view_angle, ViewAngle::FrontView);
        assert!(!front.is_ideal);
        assert!(front.warning.unwrap().contains("Front view"));

        let back = classify_view(&standing(0.25, None), &config);
        assert_eq!(back.view_angle, ViewAngle::BackView);
        assert_eq!(back.orientation, None);
    }

    #[test]
    fn test_angled_view() {
        let info = classify_view(&standing(0.10, Some(0.0)), &AnalysisConfig::default());
        assert_eq!(info.view_angle, ViewAngle::AngledView);
        assert!(info.warning.is_some());
    }

    #[test]
    fn test_no_shoulders_is_unknown() {
        let frames: Vec<FrameObservation> = (0..5).map(FrameObservation::new).collect();
        let info = classify_view(&frames, &AnalysisConfig::default());
        assert_eq!(info.view_angle, ViewAngle::Unknown);
        assert!(!info.is_ideal);
        assert!(info.warning.unwrap().contains("Could not determine"));
    }
}
