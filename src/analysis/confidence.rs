//! Confidence scoring module
//!
//! Estimates how far an analysis result can be trusted. The scores themselves
//! are computed from 2-D keypoints, so their reliability depends on how much of
//! the body was tracked, how the camera was placed, and whether every metric
//! could actually be measured.
//!
//! # Confidence Components
//!
//! 1. **Keypoint coverage**: fraction of frames with a usable hip position
//! 2. **View reliability**: side view is ideal, other views degrade the metrics
//! 3. **Measurement completeness**: fraction of metrics that were measured
//! 4. **Overall confidence**: weighted combination of the three
//!
//! # Example
//!
//! ```no_run
//! use squat_form::{analyze_squat, AnalysisConfig};
//! use squat_form::analysis::confidence::compute_confidence;
//!
//! let frames = squat_form::io::keypoints::load_keypoints_json("squat.json")?;
//! let result = analyze_squat(&frames, AnalysisConfig::default())?;
//! let confidence = compute_confidence(&result);
//!
//! println!("Overall confidence: {:.2}", confidence.overall_confidence);
//! # Ok::<(), squat_form::AnalysisError>(())
//! ```

use super::result::AnalysisResult;
use crate::features::view::ViewAngle;
use serde::{Deserialize, Serialize};

/// Coverage below which keypoints are considered sparse
const SPARSE_COVERAGE: f32 = 0.8;

/// Conditions that lower trust in a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisFlag {
    /// Recording is not side-on
    SuboptimalView,
    /// Many frames had no usable hip position
    SparseKeypoints,
    /// At least one metric fell back to the default score
    MetricUnavailable,
}

/// Analysis confidence scores
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfidence {
    /// Keypoint coverage (0.0-1.0)
    pub keypoint_coverage: f32,

    /// View reliability (0.0-1.0)
    ///
    /// - Side view: 1.0
    /// - Angled view: 0.6
    /// - Front/back view: 0.4
    /// - Unknown: 0.3
    pub view_reliability: f32,

    /// Fraction of metrics that were measured (0.0-1.0)
    pub measurement_completeness: f32,

    /// Overall confidence (weighted average)
    ///
    /// - Coverage: 40% weight
    /// - View: 30% weight
    /// - Completeness: 30% weight
    pub overall_confidence: f32,

    /// Confidence flags indicating specific issues
    pub flags: Vec<AnalysisFlag>,
}

/// Compute confidence scores for an analysis result
///
/// # Arguments
///
/// * `result` - Analysis result from `analyze_squat()`
///
/// # Returns
///
/// `AnalysisConfidence` with component and overall scores
pub fn compute_confidence(result: &AnalysisResult) -> AnalysisConfidence {
    log::debug!("Computing confidence scores for analysis result");

    let keypoint_coverage = result.metadata.keypoint_coverage().clamp(0.0, 1.0);

    let view = result.video_angle.as_ref().map(|v| v.view_angle);
    let view_reliability = view_reliability(view);

    let measured = result.breakdown.values().filter(|b| b.measured).count();
    let measurement_completeness = if result.breakdown.is_empty() {
        0.0
    } else {
        measured as f32 / result.breakdown.len() as f32
    };

    let overall_confidence = (keypoint_coverage * 0.4
        + view_reliability * 0.3
        + measurement_completeness * 0.3)
        .clamp(0.0, 1.0);

    let mut flags = Vec::new();
    if view != Some(ViewAngle::SideView) {
        flags.push(AnalysisFlag::SuboptimalView);
    }
    if keypoint_coverage < SPARSE_COVERAGE {
        flags.push(AnalysisFlag::SparseKeypoints);
    }
    if measured < result.breakdown.len() {
        flags.push(AnalysisFlag::MetricUnavailable);
    }

    log::debug!(
        "Confidence scores: coverage={:.3}, view={:.3}, completeness={:.3}, overall={:.3}",
        keypoint_coverage,
        view_reliability,
        measurement_completeness,
        overall_confidence
    );

    AnalysisConfidence {
        keypoint_coverage,
        view_reliability,
        measurement_completeness,
        overall_confidence,
        flags,
    }
}

fn view_reliability(view: Option<ViewAngle>) -> f32 {
    match view {
        Some(ViewAngle::SideView) => 1.0,
        Some(ViewAngle::AngledView) => 0.6,
        Some(ViewAngle::FrontView) | Some(ViewAngle::BackView) => 0.4,
        Some(ViewAngle::Unknown) | None => 0.3,
    }
}

impl AnalysisConfidence {
    /// Check if overall confidence is high (>= 0.7)
    pub fn is_high_confidence(&self) -> bool {
        self.overall_confidence >= 0.7
    }

    /// Check if overall confidence is low (< 0.5)
    pub fn is_low_confidence(&self) -> bool {
        self.overall_confidence < 0.5
    }

    /// Check if overall confidence is medium (0.5-0.7)
    pub fn is_medium_confidence(&self) -> bool {
        self.overall_confidence >= 0.5 && self.overall_confidence < 0.7
    }

    /// Get a human-readable confidence level description
    ///
    /// # Returns
    ///
    /// String describing the confidence level: "High", "Medium", or "Low"
    pub fn confidence_level(&self) -> &'static str {
        if self.is_high_confidence() {
            "High"
        } else if self.is_low_confidence() {
            "Low"
        } else {
            "Medium"
        }
    }
}
