//! Alignment: balance over the feet and left/right consistency

use super::{tolerance_score, MetricKey, MetricResult};
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::features::angles::AngleSnapshot;

/// Horizontal shift of the hip/knee centre over the ankles between start and bottom
///
/// # Errors
///
/// `AnalysisError::GeometryUndefined` if either frame lacks a balance offset
pub fn balance_shift(start: &AngleSnapshot, bottom: &AngleSnapshot) -> Result<f32, AnalysisError> {
    match (start.balance_offset, bottom.balance_offset) {
        (Some(s), Some(b)) => Ok(b - s),
        _ => Err(AnalysisError::GeometryUndefined(
            "hips, knees or ankles not visible at start or bottom".to_string(),
        )),
    }
}

/// Score alignment
///
/// The balance shift is scored against `alignment_tolerance`. When both knee
/// angles are visible at the bottom, a left/right difference beyond
/// `knee_asymmetry_tolerance` degrees costs an additional penalty.
pub fn score_alignment(
    start: &AngleSnapshot,
    bottom: &AngleSnapshot,
    config: &AnalysisConfig,
) -> MetricResult {
    let shift = match balance_shift(start, bottom) {
        Ok(s) => s,
        Err(e) => return MetricResult::unavailable(MetricKey::Alignment, &e, config),
    };

    let magnitude = shift.abs();
    let mut score = tolerance_score(
        magnitude,
        config.alignment_tolerance,
        config.alignment_penalty,
    );

    let mut feedback = if magnitude <= config.alignment_tolerance {
        "Stable balance - hips and knees stay centred over the feet".to_string()
    } else {
        format!(
            "Weight shifts {} by {:.1}% of frame width at the bottom - keep the weight over mid-foot",
            if shift < 0.0 { "backward" } else { "forward" },
            magnitude * 100.0
        )
    };

    if let (Some(left), Some(right)) = (bottom.left_knee_angle, bottom.right_knee_angle) {
        let asymmetry = (left - right).abs();
        if asymmetry > config.knee_asymmetry_tolerance {
            score -= (asymmetry - config.knee_asymmetry_tolerance) * config.knee_asymmetry_penalty;
            feedback.push_str(&format!(
                ". Left and right knees bend unevenly ({:.0}° difference) - distribute weight evenly",
                asymmetry
            ));
        }
    }

    MetricResult::measured(MetricKey::Alignment, score, feedback)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(balance: f32) -> AngleSnapshot {
        AngleSnapshot {
            balance_offset: Some(balance),
            ..AngleSnapshot::default()
        }
    }

    #[test]
    fn test_stable_balance_scores_100() {
        let r = score_alignment(&snap(0.0), &snap(0.02), &AnalysisConfig::default());
        assert_eq!(r.score, 100);
        assert!(r.feedback.starts_with("Stable balance"));
    }

    #[test]
    fn test_balance_shift_penalized() {
        let r = score_alignment(&snap(0.0), &snap(-0.1), &AnalysisConfig::default());
        assert_eq!(r.score, 80);
        assert!(r.feedback.contains("backward"));
    }

    #[test]
    fn test_knee_asymmetry_penalized() {
        let config = AnalysisConfig::default();
        let mut bottom = snap(0.0);
        bottom.left_knee_angle = Some(80.0);
        bottom.right_knee_angle = Some(105.0);
        let r = score_alignment(&snap(0.0), &bottom, &config);
        assert_eq!(r.score, 80);
        assert!(r.feedback.contains("unevenly"));

        bottom.right_knee_angle = Some(90.0);
        assert_eq!(score_alignment(&snap(0.0), &bottom, &config).score, 100);
    }

    #[test]
    fn test_missing_balance_falls_back() {
        let r = score_alignment(
            &AngleSnapshot::default(),
            &snap(0.0),
            &AnalysisConfig::default(),
        );
        assert!(!r.measured);
    }
}
