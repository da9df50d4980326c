//! Knee tracking: do the knees stay over the feet on the way down?
//!
//! What "over the feet" means depends on where the camera is. From the front or
//! back the knees can cave in toward the midline or drift out away from it. From
//! the side the midline is not visible, only how far the knees travel
//! horizontally away from the ankles, so that distance is scored unsigned.

use super::{tolerance_score, MetricKey, MetricResult};
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::features::angles::AngleSnapshot;
use crate::features::view::ViewAngle;

/// Mean signed knee offset over the descent
///
/// Positive values mean the knees drift outward past the ankles, negative values
/// mean they cave inward. Frames without a measurable offset are skipped.
///
/// # Errors
///
/// `AnalysisError::GeometryUndefined` if no frame in `descent` has an offset
pub fn mean_knee_offset(descent: &[AngleSnapshot]) -> Result<f32, AnalysisError> {
    mean_over(descent, |s| s.knee_offset)
}

/// Mean unsigned knee-to-ankle horizontal distance over the descent
///
/// # Errors
///
/// `AnalysisError::GeometryUndefined` if no frame in `descent` has a knee and
/// ankle on the same side
pub fn mean_knee_travel(descent: &[AngleSnapshot]) -> Result<f32, AnalysisError> {
    mean_over(descent, |s| s.knee_travel)
}

fn mean_over(
    descent: &[AngleSnapshot],
    value: impl Fn(&AngleSnapshot) -> Option<f32>,
) -> Result<f32, AnalysisError> {
    let values: Vec<f32> = descent.iter().filter_map(value).collect();
    if values.is_empty() {
        return Err(AnalysisError::GeometryUndefined(
            "knees or ankles not visible during the descent".to_string(),
        ));
    }
    Ok(values.iter().sum::<f32>() / values.len() as f32)
}

/// Score knee tracking over the start..=bottom window
///
/// Averaging over the whole descent means a brief wobble costs little while a
/// sustained drift is penalized in full.
///
/// # Arguments
///
/// * `descent` - Snapshots from start to bottom
/// * `view` - Detected camera view; selects midline or side-on measurement
/// * `config` - Scoring policy
pub fn score_knee_tracking(
    descent: &[AngleSnapshot],
    view: ViewAngle,
    config: &AnalysisConfig,
) -> MetricResult {
    match view {
        ViewAngle::FrontView | ViewAngle::BackView => score_frontal(descent, config),
        ViewAngle::SideView | ViewAngle::AngledView | ViewAngle::Unknown => {
            score_side_on(descent, config)
        }
    }
}

fn score_frontal(descent: &[AngleSnapshot], config: &AnalysisConfig) -> MetricResult {
    let offset = match mean_knee_offset(descent) {
        Ok(o) => o,
        Err(e) => return MetricResult::unavailable(MetricKey::KneeTracking, &e, config),
    };

    let deviation = offset.abs();
    let score = tolerance_score(
        deviation,
        config.knee_tracking_tolerance,
        config.knee_tracking_penalty,
    );

    let feedback = if deviation <= config.knee_tracking_tolerance {
        "Excellent knee tracking - knees stay aligned over the feet".to_string()
    } else if offset < 0.0 {
        format!(
            "Knees cave inward during the descent ({:.1}% of frame width) - push the knees out over the toes",
            deviation * 100.0
        )
    } else {
        format!(
            "Knees drift outward during the descent ({:.1}% of frame width) - keep the knees in line with the toes",
            deviation * 100.0
        )
    };

    MetricResult::measured(MetricKey::KneeTracking, score, feedback)
}

fn score_side_on(descent: &[AngleSnapshot], config: &AnalysisConfig) -> MetricResult {
    let travel = match mean_knee_travel(descent) {
        Ok(t) => t,
        Err(e) => return MetricResult::unavailable(MetricKey::KneeTracking, &e, config),
    };

    let score = tolerance_score(
        travel,
        config.knee_tracking_tolerance,
        config.knee_tracking_penalty,
    );

    let feedback = if travel <= config.knee_tracking_tolerance {
        "Excellent knee tracking - knees stay aligned over the feet".to_string()
    } else {
        format!(
            "Knees travel {:.1}% of frame width away from the line over the ankles during the descent - keep the knees stacked over the feet",
            travel * 100.0
        )
    };

    MetricResult::measured(MetricKey::KneeTracking, score, feedback)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(offsets: &[Option<f32>]) -> Vec<AngleSnapshot> {
        offsets
            .iter()
            .map(|o| AngleSnapshot {
                knee_offset: *o,
                knee_travel: o.map(f32::abs),
                ..AngleSnapshot::default()
            })
            .collect()
    }

    fn travel_window(travel: &[Option<f32>]) -> Vec<AngleSnapshot> {
        travel
            .iter()
            .map(|t| AngleSnapshot {
                knee_travel: *t,
                ..AngleSnapshot::default()
            })
            .collect()
    }

    #[test]
    fn test_knees_over_feet_scores_100() {
        let config = AnalysisConfig::default();
        let descent = window(&[Some(0.0), Some(0.01), Some(-0.02)]);
        for view in [ViewAngle::FrontView, ViewAngle::SideView] {
            let r = score_knee_tracking(&descent, view, &config);
            assert_eq!(r.score, 100);
            assert!(r.feedback.starts_with("Excellent"));
        }
    }

    #[test]
    fn test_sustained_valgus_penalized() {
        let r = score_knee_tracking(
            &window(&[Some(-0.1), Some(-0.1), Some(-0.1)]),
            ViewAngle::FrontView,
            &AnalysisConfig::default(),
        );
        assert_eq!(r.score, 80);
        assert!(r.feedback.contains("cave inward"));
    }

    #[test]
    fn test_brief_wobble_costs_less_than_sustained_drift() {
        let config = AnalysisConfig::default();
        let mut brief = vec![Some(0.0); 9];
        brief.push(Some(0.15));
        let brief = score_knee_tracking(&window(&brief), ViewAngle::BackView, &config);
        let sustained = score_knee_tracking(&window(&[Some(0.15); 10]), ViewAngle::BackView, &config);
        assert!(brief.score > sustained.score);
        assert!(sustained.feedback.contains("outward"));
    }

    #[test]
    fn test_side_view_knees_forward_penalized() {
        // Both knees 0.12 ahead of the ankles: 100 - (0.12 - 0.05) * 400
        let config = AnalysisConfig::default();
        let descent = travel_window(&[Some(0.12); 8]);
        let r = score_knee_tracking(&descent, ViewAngle::SideView, &config);
        assert_eq!(r.score, 72);
        assert!(r.measured);
        assert!(r.feedback.contains("12.0%"));
        assert!(!r.feedback.contains("inward"));
        assert!(!r.feedback.contains("outward"));
    }

    #[test]
    fn test_side_view_ignores_midline_sign() {
        // The midline offset is meaningless side-on; opposite signs must not matter
        let config = AnalysisConfig::default();
        let forward = window(&[Some(0.12); 5]);
        let backward = window(&[Some(-0.12); 5]);
        let a = score_knee_tracking(&forward, ViewAngle::SideView, &config);
        let b = score_knee_tracking(&backward, ViewAngle::SideView, &config);
        assert_eq!(a.score, 72);
        assert_eq!(a.score, b.score);
        assert_eq!(a.feedback, b.feedback);
    }

    #[test]
    fn test_unknown_view_measured_side_on() {
        let config = AnalysisConfig::default();
        let r = score_knee_tracking(&travel_window(&[Some(0.1); 4]), ViewAngle::Unknown, &config);
        assert_eq!(r.score, 80);
    }

    #[test]
    fn test_missing_offsets_skipped_or_fall_back() {
        let config = AnalysisConfig::default();
        for view in [ViewAngle::FrontView, ViewAngle::SideView] {
            let partial = score_knee_tracking(&window(&[None, Some(0.0), None]), view, &config);
            assert!(partial.measured);

            let none = score_knee_tracking(&window(&[None, None]), view, &config);
            assert!(!none.measured);
            assert_eq!(none.score, 50);
        }
    }
}
