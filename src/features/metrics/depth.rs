//! Squat depth: hip height relative to knee height at the bottom

use super::{MetricKey, MetricResult};
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::features::angles::AngleSnapshot;

/// Thigh elevation ratio at the bottom
///
/// `(hip height - knee height) / hip-to-knee distance`, i.e. the sine of the
/// thigh's angle above horizontal. Zero at parallel, negative below parallel,
/// 1.0 for a vertical thigh. Dividing by the thigh length in the image keeps the
/// ratio independent of how far the subject stands from the camera.
pub fn thigh_elevation(bottom: &AngleSnapshot) -> Result<f32, AnalysisError> {
    let (Some(hip), Some(knee)) = (bottom.hip_height, bottom.knee_height) else {
        return Err(AnalysisError::GeometryUndefined(
            "hip or knee not visible at the bottom".to_string(),
        ));
    };
    match bottom.thigh_length {
        Some(thigh) if thigh > 1e-6 => Ok((hip - knee) / thigh),
        _ => Err(AnalysisError::GeometryUndefined(
            "thigh length unavailable at the bottom".to_string(),
        )),
    }
}

/// Score squat depth
///
/// Full score once the hips reach knee level; below that, the score drops by
/// `config.depth_penalty` per unit of thigh elevation.
pub fn score_depth(bottom: &AngleSnapshot, config: &AnalysisConfig) -> MetricResult {
    let ratio = match thigh_elevation(bottom) {
        Ok(r) => r,
        Err(e) => return MetricResult::unavailable(MetricKey::Depth, &e, config),
    };

    let shortfall = ratio.max(0.0);
    let score = 100.0 - shortfall * config.depth_penalty;

    let feedback = if shortfall <= 0.0 {
        "Excellent depth - hips reached or passed knee level".to_string()
    } else if shortfall < 0.15 {
        "Near parallel - hips stopped just above the knees. Sink slightly deeper.".to_string()
    } else if shortfall < 0.45 {
        format!(
            "Did not reach parallel - hips stayed {:.0}% of thigh length above the knees",
            shortfall * 100.0
        )
    } else {
        "Very shallow squat - hips stayed well above the knees. Focus on reaching parallel."
            .to_string()
    };

    MetricResult::measured(MetricKey::Depth, score, feedback)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bottom(hip_height: f32, knee_height: f32, thigh: f32) -> AngleSnapshot {
        AngleSnapshot {
            hip_height: Some(hip_height),
            knee_height: Some(knee_height),
            thigh_length: Some(thigh),
            ..AngleSnapshot::default()
        }
    }

    #[test]
    fn test_full_depth_scores_100() {
        let config = AnalysisConfig::default();
        let below = score_depth(&bottom(0.25, 0.28, 0.2), &config);
        assert_eq!(below.score, 100);
        assert!(below.feedback.contains("Excellent"));

        let parallel = score_depth(&bottom(0.28, 0.28, 0.2), &config);
        assert_eq!(parallel.score, 100);
    }

    #[test]
    fn test_shallow_squat_penalized() {
        let config = AnalysisConfig::default();
        let result = score_depth(&bottom(0.34, 0.28, 0.2), &config);
        assert_eq!(result.score, 70);
        assert!(result.feedback.contains("Did not reach parallel"));
    }

    #[test]
    fn test_depth_monotonic_in_hip_height() {
        let config = AnalysisConfig::default();
        let knee = (0.5f32, 0.72f32);
        let mut previous = 0;
        // Hip moves down from well above the knee to below it, fixed horizontal offset
        for step in 0..=30 {
            let hip_y = 0.45 + step as f32 * 0.01;
            let (dx, dy) = (0.18f32, knee.1 - hip_y);
            let thigh = (dx * dx + dy * dy).sqrt();
            let snap = bottom(1.0 - hip_y, 1.0 - knee.1, thigh);
            let score = score_depth(&snap, &config).score;
            assert!(score >= previous, "score dropped at step {}", step);
            previous = score;
        }
        assert_eq!(previous, 100);
    }

    #[test]
    fn test_missing_knee_falls_back() {
        let config = AnalysisConfig::default();
        let snap = AngleSnapshot {
            hip_height: Some(0.3),
            ..AngleSnapshot::default()
        };
        let result = score_depth(&snap, &config);
        assert!(!result.measured);
        assert_eq!(result.score, config.unavailable_metric_score);
    }
}
