//! Configuration parameters for squat analysis
//!
//! Every threshold and weight used by the pipeline lives here. The defaults are
//! policy values tuned against side-view bodyweight squats; override them from a
//! TOML file with [`AnalysisConfig::load`].

use crate::error::AnalysisError;
use crate::features::metrics::MetricKey;
use crate::io::keypoints::Landmark;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Per-metric weights for the overall score (must sum to 1.0)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricWeights {
    /// Knee tracking weight (default: 0.25)
    pub knee_tracking: f32,
    /// Back angle weight (default: 0.25)
    pub back_angle: f32,
    /// Depth weight (default: 0.30)
    pub depth: f32,
    /// Alignment weight (default: 0.20)
    pub alignment: f32,
}

impl Default for MetricWeights {
    fn default() -> Self {
        Self {
            knee_tracking: 0.25,
            back_angle: 0.25,
            depth: 0.30,
            alignment: 0.20,
        }
    }
}

impl MetricWeights {
    /// Weight for a single metric
    pub fn weight(&self, metric: MetricKey) -> f32 {
        match metric {
            MetricKey::KneeTracking => self.knee_tracking,
            MetricKey::BackAngle => self.back_angle,
            MetricKey::Depth => self.depth,
            MetricKey::Alignment => self.alignment,
        }
    }

    /// Sum of all weights
    pub fn total(&self) -> f32 {
        self.knee_tracking + self.back_angle + self.depth + self.alignment
    }
}

/// Analysis configuration parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    // Keypoints
    /// Landmarks below this confidence are treated as absent (default: 0.5)
    pub min_confidence: f32,

    /// Minimum frames with a usable hip position (default: 10)
    pub min_usable_frames: usize,

    /// Confident landmarks a frame needs, hips included, before its hip position
    /// counts as usable (default: 4)
    pub min_landmarks_per_frame: usize,

    /// Longest run of missing samples filled by interpolation (default: 5)
    pub max_gap_frames: usize,

    /// Moving-average window for velocity estimation (default: 3)
    pub smoothing_window: usize,

    /// Running-median window applied to hip height before segmentation; glitches
    /// shorter than half the window are removed (default: 5)
    pub median_window: usize,

    // View classification
    /// Number of early frames with both shoulders used to classify the view (default: 10)
    pub view_sample_frames: usize,

    /// Mean shoulder width below which the view is side-on (default: 0.05)
    pub side_view_max_shoulder_width: f32,

    /// Mean shoulder width up to which the view is angled (default: 0.15)
    pub angled_view_max_shoulder_width: f32,

    /// Minimum shoulder-to-hip height for a side-on classification (default: 0.1)
    pub min_torso_height: f32,

    // Segmentation
    /// Hip height changes below this are noise (default: 0.005)
    pub noise_floor: f32,

    /// Drop below the standing peak that starts a repetition (default: 0.03)
    pub descent_threshold: f32,

    /// Rise above the bottom that confirms the ascent (default: 0.03)
    pub ascent_threshold: f32,

    /// Hip velocity magnitude (per frame) considered stationary (default: 0.002)
    pub still_velocity: f32,

    /// Knee re-extension rate in degrees per frame that ends the descent (default: 1.5)
    pub knee_rise_velocity: f32,

    /// Distance from the start height that counts as standing again (default: 0.03)
    pub return_tolerance: f32,

    /// Hip drop from start to bottom a cycle needs to count as a repetition;
    /// shallower cycles are discarded and the search resumes (default: 0.06)
    pub min_squat_depth: f32,

    // Scoring
    /// Lower bound of the ideal back angle band in degrees (default: 15.0)
    pub back_angle_min: f32,

    /// Upper bound of the ideal back angle band in degrees (default: 40.0)
    pub back_angle_max: f32,

    /// Points lost per degree below the ideal band (default: 4.0)
    pub upright_penalty_per_degree: f32,

    /// Points lost per degree above the ideal band (default: 2.5)
    pub lean_penalty_per_degree: f32,

    /// Points lost per unit of thigh elevation ratio above parallel (default: 100.0)
    pub depth_penalty: f32,

    /// Mean knee-over-ankle offset tolerated without penalty (default: 0.05)
    pub knee_tracking_tolerance: f32,

    /// Points lost per unit of knee offset beyond the tolerance (default: 400.0)
    pub knee_tracking_penalty: f32,

    /// Balance offset shift tolerated without penalty (default: 0.05)
    pub alignment_tolerance: f32,

    /// Points lost per unit of balance shift beyond the tolerance (default: 400.0)
    pub alignment_penalty: f32,

    /// Left/right knee angle difference tolerated at the bottom, degrees (default: 15.0)
    pub knee_asymmetry_tolerance: f32,

    /// Points lost per degree of asymmetry beyond the tolerance (default: 2.0)
    pub knee_asymmetry_penalty: f32,

    /// Score assigned to a metric that could not be measured (default: 50)
    pub unavailable_metric_score: u32,

    /// Weights for the overall score
    pub weights: MetricWeights,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.5,
            min_usable_frames: 10,
            min_landmarks_per_frame: 4,
            max_gap_frames: 5,
            smoothing_window: 3,
            median_window: 5,
            view_sample_frames: 10,
            side_view_max_shoulder_width: 0.05,
            angled_view_max_shoulder_width: 0.15,
            min_torso_height: 0.1,
            noise_floor: 0.005,
            descent_threshold: 0.03,
            ascent_threshold: 0.03,
            still_velocity: 0.002,
            knee_rise_velocity: 1.5,
            return_tolerance: 0.03,
            min_squat_depth: 0.06,
            back_angle_min: 15.0,
            back_angle_max: 40.0,
            upright_penalty_per_degree: 4.0,
            lean_penalty_per_degree: 2.5,
            depth_penalty: 100.0,
            knee_tracking_tolerance: 0.05,
            knee_tracking_penalty: 400.0,
            alignment_tolerance: 0.05,
            alignment_penalty: 400.0,
            knee_asymmetry_tolerance: 15.0,
            knee_asymmetry_penalty: 2.0,
            unavailable_metric_score: 50,
            weights: MetricWeights::default(),
        }
    }
}

impl AnalysisConfig {
    /// Parse a configuration from TOML; missing keys take their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, AnalysisError> {
        let config: AnalysisConfig =
            toml::from_str(content).map_err(|e| AnalysisError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, AnalysisError> {
        let path = path.as_ref();
        log::debug!("Loading analysis config from {}", path.display());
        let content = fs::read_to_string(path).map_err(|e| {
            AnalysisError::ConfigError(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Serialize the configuration to TOML
    pub fn to_toml_string(&self) -> Result<String, AnalysisError> {
        toml::to_string_pretty(self).map_err(|e| AnalysisError::ConfigError(e.to_string()))
    }

    /// Check that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::ConfigError` if the weights do not sum to 1.0, a
    /// threshold is negative or out of range, or the back angle band is inverted.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if (self.weights.total() - 1.0).abs() > 1e-3 {
            return Err(AnalysisError::ConfigError(format!(
                "metric weights must sum to 1.0, got {:.3}",
                self.weights.total()
            )));
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(AnalysisError::ConfigError(format!(
                "min_confidence must be in [0, 1], got {}",
                self.min_confidence
            )));
        }
        if self.back_angle_min > self.back_angle_max {
            return Err(AnalysisError::ConfigError(format!(
                "back angle band is inverted: [{}, {}]",
                self.back_angle_min, self.back_angle_max
            )));
        }
        if self.unavailable_metric_score > 100 {
            return Err(AnalysisError::ConfigError(
                "unavailable_metric_score must be at most 100".to_string(),
            ));
        }
        let thresholds = [
            self.noise_floor,
            self.descent_threshold,
            self.ascent_threshold,
            self.still_velocity,
            self.return_tolerance,
            self.min_squat_depth,
            self.knee_tracking_tolerance,
            self.alignment_tolerance,
        ];
        if thresholds.iter().any(|t| *t < 0.0 || !t.is_finite()) {
            return Err(AnalysisError::ConfigError(
                "segmentation and scoring thresholds must be non-negative".to_string(),
            ));
        }
        if self.smoothing_window == 0 || self.median_window == 0 || self.min_usable_frames == 0 {
            return Err(AnalysisError::ConfigError(
                "smoothing_window, median_window and min_usable_frames must be positive"
                    .to_string(),
            ));
        }
        if self.min_landmarks_per_frame > Landmark::ALL.len() {
            return Err(AnalysisError::ConfigError(format!(
                "min_landmarks_per_frame must be at most {}, got {}",
                Landmark::ALL.len(),
                self.min_landmarks_per_frame
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AnalysisConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.weights.total() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AnalysisConfig::from_toml_str(
            "min_usable_frames = 20\n\n[weights]\ndepth = 0.4\nalignment = 0.1\n",
        )
        .unwrap();
        assert_eq!(config.min_usable_frames, 20);
        assert_eq!(config.weights.depth, 0.4);
        assert_eq!(config.weights.knee_tracking, 0.25);
        assert_eq!(config.back_angle_min, 15.0);
    }

    #[test]
    fn test_rejects_unbalanced_weights() {
        let result = AnalysisConfig::from_toml_str("[weights]\ndepth = 0.9\n");
        assert!(matches!(result, Err(AnalysisError::ConfigError(_))));
    }

    #[test]
    fn test_rejects_inverted_back_band() {
        let config = AnalysisConfig {
            back_angle_min: 50.0,
            back_angle_max: 20.0,
            ..AnalysisConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_unreachable_landmark_count() {
        let config = AnalysisConfig {
            min_landmarks_per_frame: 12,
            ..AnalysisConfig::default()
        };
        assert!(matches!(config.validate(), Err(AnalysisError::ConfigError(_))));

        let zero_median = AnalysisConfig {
            median_window: 0,
            ..AnalysisConfig::default()
        };
        assert!(zero_median.validate().is_err());
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = AnalysisConfig::default();
        let text = config.to_toml_string().unwrap();
        let parsed = AnalysisConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
