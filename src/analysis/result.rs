//! Analysis result types

use super::metadata::AnalysisMetadata;
use crate::features::angles::AngleSnapshot;
use crate::features::metrics::{MetricKey, MetricResult};
use crate::features::phase::Phase;
use crate::features::view::VideoAngle;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Letter grade derived from the overall score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    /// 90-100
    A,
    /// 80-89
    B,
    /// 70-79
    C,
    /// 60-69
    D,
    /// Below 60
    F,
}

impl Grade {
    /// Grade for an overall score, bands inclusive on their lower bound
    ///
    /// # Example
    ///
    /// ```
    /// use squat_form::analysis::result::Grade;
    ///
    /// assert_eq!(Grade::from_score(90), Grade::A);
    /// assert_eq!(Grade::from_score(89), Grade::B);
    /// assert_eq!(Grade::from_score(59), Grade::F);
    /// ```
    pub fn from_score(score: u32) -> Self {
        match score {
            90.. => Grade::A,
            80..=89 => Grade::B,
            70..=79 => Grade::C,
            60..=69 => Grade::D,
            _ => Grade::F,
        }
    }

    /// Grade as a one-letter string
    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the per-metric breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricBreakdown {
    /// Metric score (0-100)
    pub score: u32,

    /// Metric feedback
    pub feedback: String,

    /// Weight of this metric in the overall score
    pub weight: f32,

    /// False when the score is the unavailable-metric default
    pub measured: bool,
}

impl MetricBreakdown {
    /// Attach a weight to a metric result
    pub fn new(result: &MetricResult, weight: f32) -> Self {
        Self {
            score: result.score,
            feedback: result.feedback.clone(),
            weight,
            measured: result.measured,
        }
    }
}

/// Angles shown next to a snapshot image
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotAngles {
    /// Torso lean from vertical, degrees
    pub back_angle: Option<f32>,
    /// Left knee interior angle, degrees
    pub left_knee_angle: Option<f32>,
    /// Right knee interior angle, degrees
    pub right_knee_angle: Option<f32>,
}

impl From<&AngleSnapshot> for SnapshotAngles {
    fn from(s: &AngleSnapshot) -> Self {
        Self {
            back_angle: s.back_angle,
            left_knee_angle: s.left_knee_angle,
            right_knee_angle: s.right_knee_angle,
        }
    }
}

/// Representative frame for one phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Image payload from the frame renderer, null when unavailable
    pub image: Option<String>,

    /// Phase label ("Start", "Mid-Descent", ...)
    pub label: String,

    /// Source frame index
    pub frame_idx: usize,

    /// Angles at that frame
    pub angles: SnapshotAngles,
}

/// Complete squat analysis result
///
/// Built once at the end of the pipeline and not modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Weighted overall score (0-100)
    pub overall_score: u32,

    /// Letter grade for `overall_score`
    pub rating: Grade,

    /// Per-metric scores and feedback
    pub breakdown: BTreeMap<MetricKey, MetricBreakdown>,

    /// Overall feedback text
    pub feedback: String,

    /// Viewpoint classification
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_angle: Option<VideoAngle>,

    /// Representative frame per phase
    pub snapshots: BTreeMap<Phase, Snapshot>,

    /// Analysis metadata
    pub metadata: AnalysisMetadata,
}

impl AnalysisResult {
    /// Serialize to the JSON shape handed to the web layer
    ///
    /// # Example
    ///
    /// ```no_run
    /// use squat_form::{analyze_squat, AnalysisConfig};
    ///
    /// let frames = squat_form::io::keypoints::load_keypoints_json("squat.json")?;
    /// let result = analyze_squat(&frames, AnalysisConfig::default())?;
    /// println!("{}", result.to_json().unwrap_or_default());
    /// # Ok::<(), squat_form::AnalysisError>(())
    /// ```
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Pretty-printed variant of [`AnalysisResult::to_json`]
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Score of one metric
    pub fn score(&self, metric: MetricKey) -> Option<u32> {
        self.breakdown.get(&metric).map(|b| b.score)
    }

    /// Frame index tagged with a phase
    pub fn phase_frame(&self, phase: Phase) -> Option<usize> {
        self.snapshots.get(&phase).map(|s| s.frame_idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_boundaries() {
        assert_eq!(Grade::from_score(100), Grade::A);
        assert_eq!(Grade::from_score(90), Grade::A);
        assert_eq!(Grade::from_score(89), Grade::B);
        assert_eq!(Grade::from_score(80), Grade::B);
        assert_eq!(Grade::from_score(79), Grade::C);
        assert_eq!(Grade::from_score(70), Grade::C);
        assert_eq!(Grade::from_score(69), Grade::D);
        assert_eq!(Grade::from_score(60), Grade::D);
        assert_eq!(Grade::from_score(59), Grade::F);
        assert_eq!(Grade::from_score(0), Grade::F);
    }

    #[test]
    fn test_grade_serializes_as_letter() {
        assert_eq!(serde_json::to_string(&Grade::B).unwrap(), "\"B\"");
        assert_eq!(Grade::D.to_string(), "D");
    }

    #[test]
    fn test_snapshot_angles_serialize_null() {
        let angles = SnapshotAngles {
            back_angle: Some(20.0),
            ..SnapshotAngles::default()
        };
        let json: serde_json::Value = serde_json::to_value(angles).unwrap();
        assert_eq!(json["back_angle"], 20.0);
        assert!(json["left_knee_angle"].is_null());
        assert!(json["right_knee_angle"].is_null());
    }
}
