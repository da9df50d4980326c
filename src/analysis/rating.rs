//! Rating aggregation
//!
//! Combines the four metric results into a weighted overall score, a letter
//! grade and a feedback summary.
//!
//! # Feedback structure
//!
//! 1. One overall assessment sentence per grade band
//! 2. "Priority Focus" on the weakest metric when it scores below 70
//! 3. "Strength" for the strongest metric when it scores 85 or more
//! 4. A note that all measurements are 2-D image positions

use super::result::Grade;
use crate::config::MetricWeights;
use crate::features::metrics::{MetricKey, MetricResult};
use std::collections::BTreeMap;

/// Weakest-metric score below which it is called out
const PRIORITY_FOCUS_BELOW: u32 = 70;

/// Strongest-metric score from which it is called out
const STRENGTH_FROM: u32 = 85;

const MEASUREMENT_NOTE: &str = "Note: measurements are taken from 2-D image positions and are not corrected for camera distance or lens perspective.";

/// Weighted overall score, rounded to the nearest integer
///
/// Metrics missing from `metrics` contribute nothing.
///
/// # Example
///
/// ```
/// use squat_form::analysis::rating::overall_score;
/// use squat_form::config::MetricWeights;
/// use squat_form::features::metrics::{MetricKey, MetricResult};
/// use std::collections::BTreeMap;
///
/// let metrics: BTreeMap<_, _> = MetricKey::ALL
///     .iter()
///     .map(|&k| (k, MetricResult::measured(k, 80.0, String::new())))
///     .collect();
/// assert_eq!(overall_score(&metrics, &MetricWeights::default()), 80);
/// ```
pub fn overall_score(metrics: &BTreeMap<MetricKey, MetricResult>, weights: &MetricWeights) -> u32 {
    let weighted: f32 = metrics
        .iter()
        .map(|(key, result)| weights.weight(*key) * result.score as f32)
        .sum();
    weighted.clamp(0.0, 100.0).round() as u32
}

/// Overall feedback text
///
/// Lines are joined with `\n`. Ties for weakest go to the first metric in
/// [`MetricKey::ALL`] order, ties for strongest to the last.
pub fn comprehensive_feedback(overall: u32, metrics: &BTreeMap<MetricKey, MetricResult>) -> String {
    let mut parts: Vec<String> = vec![assessment(overall).to_string()];

    let ranked: Vec<&MetricResult> = MetricKey::ALL
        .iter()
        .filter_map(|key| metrics.get(key))
        .collect();

    if let Some(weakest) = ranked.iter().min_by_key(|r| r.score) {
        if weakest.score < PRIORITY_FOCUS_BELOW {
            parts.push(format!(
                "\nPriority Focus: {} is your weakest area (score: {}/100).",
                weakest.metric.label(),
                weakest.score
            ));
            parts.push(format!("  → {}", weakest.feedback));
        }
    }

    if let Some(strongest) = ranked.iter().max_by_key(|r| r.score) {
        if strongest.score >= STRENGTH_FROM {
            parts.push(format!(
                "\nStrength: {} is performing well (score: {}/100).",
                strongest.metric.label(),
                strongest.score
            ));
        }
    }

    parts.push(format!("\n{}", MEASUREMENT_NOTE));
    parts.join("\n")
}

fn assessment(overall: u32) -> &'static str {
    match Grade::from_score(overall) {
        Grade::A => "Excellent squat form! Your technique is very solid.",
        Grade::B => "Good squat form with minor areas for improvement.",
        Grade::C => "Decent squat form, but there are several areas to work on.",
        Grade::D => "Your squat form needs improvement. Focus on the key areas below.",
        Grade::F => "Your squat form requires significant attention. Consider working with a trainer or reviewing proper technique.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(scores: [u32; 4]) -> BTreeMap<MetricKey, MetricResult> {
        MetricKey::ALL
            .iter()
            .zip(scores)
            .map(|(&k, s)| {
                (
                    k,
                    MetricResult::measured(k, s as f32, format!("{} feedback", k.label())),
                )
            })
            .collect()
    }

    #[test]
    fn test_overall_is_weighted_sum() {
        // knee 0.25, back 0.25, depth 0.30, alignment 0.20
        let m = metrics([80, 60, 100, 90]);
        assert_eq!(overall_score(&m, &MetricWeights::default()), 83);
    }

    #[test]
    fn test_overall_rounds_half_up() {
        // 0.25*90 + 0.25*91 + 0.30*90 + 0.20*90 = 90.25
        let m = metrics([90, 91, 90, 90]);
        assert_eq!(overall_score(&m, &MetricWeights::default()), 90);
        // 0.25*100 + 0.25*100 + 0.30*85 + 0.20*85 = 92.5
        let m = metrics([100, 100, 85, 85]);
        assert_eq!(overall_score(&m, &MetricWeights::default()), 93);
    }

    #[test]
    fn test_feedback_priority_and_strength() {
        let m = metrics([100, 40, 65, 100]);
        let text = comprehensive_feedback(75, &m);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "Decent squat form, but there are several areas to work on."
        );
        assert!(text.contains("\nPriority Focus: Back Angle is your weakest area (score: 40/100)."));
        assert!(text.contains("  → Back Angle feedback"));
        // Last of the tied maxima
        assert!(text.contains("\nStrength: Alignment is performing well (score: 100/100)."));
        assert!(text.ends_with(MEASUREMENT_NOTE));
    }

    #[test]
    fn test_feedback_omits_focus_and_strength_in_middle_band() {
        let m = metrics([75, 80, 78, 72]);
        let text = comprehensive_feedback(77, &m);
        assert!(!text.contains("Priority Focus"));
        assert!(!text.contains("Strength"));
    }

    #[test]
    fn test_assessment_per_band() {
        assert!(assessment(95).starts_with("Excellent"));
        assert!(assessment(85).starts_with("Good"));
        assert!(assessment(60).contains("needs improvement"));
        assert!(assessment(10).contains("significant attention"));
    }
}
