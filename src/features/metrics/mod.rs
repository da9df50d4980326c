//! Biomechanical metric scoring
//!
//! Four independent scorers, each a pure function of already-computed angle
//! snapshots:
//! - Depth (hips relative to knees at the bottom)
//! - Back angle (torso lean at the bottom)
//! - Knee tracking (knee-over-ankle offset through the descent, by camera view)
//! - Alignment (balance shift between start and bottom, left/right symmetry)
//!
//! A metric whose landmarks are missing does not fail the analysis. It falls
//! back to `config.unavailable_metric_score` with `measured = false`.

pub mod alignment;
pub mod back_angle;
pub mod depth;
pub mod knee_tracking;

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::features::angles::AngleSnapshot;
use crate::features::phase::PhaseBoundaries;
use crate::features::view::ViewAngle;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Scored aspect of squat form
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKey {
    /// Knees aligned over the feet
    KneeTracking,
    /// Torso lean at the bottom
    BackAngle,
    /// Hips relative to knees at the bottom
    Depth,
    /// Balance and left/right consistency
    Alignment,
}

impl MetricKey {
    /// All metrics
    pub const ALL: [MetricKey; 4] = [
        MetricKey::KneeTracking,
        MetricKey::BackAngle,
        MetricKey::Depth,
        MetricKey::Alignment,
    ];

    /// Human-readable name
    pub fn label(&self) -> &'static str {
        match self {
            MetricKey::KneeTracking => "Knee Tracking",
            MetricKey::BackAngle => "Back Angle",
            MetricKey::Depth => "Depth",
            MetricKey::Alignment => "Alignment",
        }
    }
}

/// Score and feedback for one metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricResult {
    /// Which metric this is
    pub metric: MetricKey,
    /// Score in [0, 100]
    pub score: u32,
    /// Feedback text
    pub feedback: String,
    /// False when the metric fell back to the default score
    pub measured: bool,
}

impl MetricResult {
    /// Measured result
    pub fn measured(metric: MetricKey, score: f32, feedback: String) -> Self {
        Self {
            metric,
            score: to_score(score),
            feedback,
            measured: true,
        }
    }

    /// Fallback result for a metric that could not be measured
    pub fn unavailable(metric: MetricKey, cause: &AnalysisError, config: &AnalysisConfig) -> Self {
        log::warn!("{} unavailable: {}", metric.label(), cause);
        Self {
            metric,
            score: config.unavailable_metric_score.min(100),
            feedback: format!(
                "{} could not be measured because the required body landmarks were not visible.",
                metric.label()
            ),
            measured: false,
        }
    }
}

/// Score all four metrics for a segmented repetition
///
/// # Arguments
///
/// * `snapshots` - Angle snapshot per frame position
/// * `phases` - Segmented phase positions
/// * `view` - Detected camera view
/// * `config` - Scoring policy
pub fn score_all(
    snapshots: &[AngleSnapshot],
    phases: &PhaseBoundaries,
    view: ViewAngle,
    config: &AnalysisConfig,
) -> BTreeMap<MetricKey, MetricResult> {
    let start = &snapshots[phases.start];
    let bottom = &snapshots[phases.bottom];
    let descent = &snapshots[phases.start..=phases.bottom];

    let results = [
        knee_tracking::score_knee_tracking(descent, view, config),
        back_angle::score_back_angle(bottom, config),
        depth::score_depth(bottom, config),
        alignment::score_alignment(start, bottom, config),
    ];

    for r in &results {
        log::debug!("{}: {} ({})", r.metric.label(), r.score, r.feedback);
    }

    results.into_iter().map(|r| (r.metric, r)).collect()
}

/// Clamp to [0, 100] and round to an integer score
pub(crate) fn to_score(value: f32) -> u32 {
    if value.is_nan() {
        return 0;
    }
    value.clamp(0.0, 100.0).round() as u32
}

/// Linear penalty beyond a tolerance: 100 inside, minus `rate` per unit outside
pub(crate) fn tolerance_score(deviation: f32, tolerance: f32, rate: f32) -> f32 {
    if deviation <= tolerance {
        100.0
    } else {
        100.0 - (deviation - tolerance) * rate
    }
}
