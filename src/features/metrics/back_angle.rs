//! Torso lean at the bottom of the squat

use super::{MetricKey, MetricResult};
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::features::angles::AngleSnapshot;

/// Band edges compare with this slack so values rounding onto an edge count as inside
const BAND_EPSILON: f32 = 1e-3;

/// Score the back angle (degrees from vertical) at the bottom frame
///
/// Inside `[back_angle_min, back_angle_max]` scores 100. Below the band the torso is
/// overly upright (no hip hinge); above it the lifter leans too far forward. Each
/// side has its own per-degree penalty.
pub fn score_back_angle(bottom: &AngleSnapshot, config: &AnalysisConfig) -> MetricResult {
    let angle = match bottom.back_angle {
        Some(a) => a,
        None => {
            let cause =
                AnalysisError::GeometryUndefined("torso not visible at the bottom".to_string());
            return MetricResult::unavailable(MetricKey::BackAngle, &cause, config);
        }
    };

    let (score, feedback) = if angle < config.back_angle_min - BAND_EPSILON {
        let deficit = config.back_angle_min - angle;
        (
            100.0 - deficit * config.upright_penalty_per_degree,
            format!(
                "Torso too upright ({:.1}°) - hinge at the hips and let the chest come forward slightly",
                angle
            ),
        )
    } else if angle > config.back_angle_max + BAND_EPSILON {
        let excess = angle - config.back_angle_max;
        let feedback = if excess > 15.0 {
            format!(
                "Excessive forward lean ({:.1}°) - chest is collapsing; brace the core and keep the chest up",
                angle
            )
        } else {
            format!(
                "Slight forward lean ({:.1}°) - keep the chest up through the bottom",
                angle
            )
        };
        (100.0 - excess * config.lean_penalty_per_degree, feedback)
    } else {
        (
            100.0,
            format!("Good back angle ({:.1}°) - torso lean within the ideal range", angle),
        )
    };

    MetricResult::measured(MetricKey::BackAngle, score, feedback)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(angle: f32) -> AngleSnapshot {
        AngleSnapshot {
            back_angle: Some(angle),
            ..AngleSnapshot::default()
        }
    }

    #[test]
    fn test_within_band_scores_100() {
        let config = AnalysisConfig::default();
        for angle in [15.0, 25.0, 40.0, 14.9999] {
            let r = score_back_angle(&at(angle), &config);
            assert_eq!(r.score, 100, "angle {}", angle);
            assert!(r.feedback.starts_with("Good back angle"));
        }
    }

    #[test]
    fn test_upright_torso_penalized() {
        let config = AnalysisConfig::default();
        let r = score_back_angle(&at(5.0), &config);
        assert_eq!(r.score, 60);
        assert!(r.feedback.contains("too upright"));
    }

    #[test]
    fn test_forward_lean_penalized() {
        let config = AnalysisConfig::default();
        let slight = score_back_angle(&at(50.0), &config);
        assert_eq!(slight.score, 75);
        assert!(slight.feedback.contains("Slight forward lean"));

        let heavy = score_back_angle(&at(70.0), &config);
        assert_eq!(heavy.score, 25);
        assert!(heavy.feedback.contains("Excessive forward lean"));
    }

    #[test]
    fn test_missing_torso_falls_back() {
        let r = score_back_angle(&AngleSnapshot::default(), &AnalysisConfig::default());
        assert!(!r.measured);
        assert_eq!(r.score, 50);
    }
}
