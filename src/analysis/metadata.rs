//! Analysis metadata structures

use serde::{Deserialize, Serialize};

/// Analysis metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    /// Frames received
    pub total_frames: usize,

    /// Frames with a confident hip position
    pub usable_frames: usize,

    /// Hip-height samples filled by short-gap interpolation
    pub interpolated_samples: usize,

    /// Source frame index of the bottom of the repetition
    pub bottom_frame_idx: usize,

    /// Processing time in milliseconds
    pub processing_time_ms: f32,

    /// Algorithm version
    pub algorithm_version: String,

    /// Conditions that lower trust in the result (non-ideal view, unmeasured metrics)
    pub confidence_warnings: Vec<String>,
}

impl Default for AnalysisMetadata {
    fn default() -> Self {
        Self {
            total_frames: 0,
            usable_frames: 0,
            interpolated_samples: 0,
            bottom_frame_idx: 0,
            processing_time_ms: 0.0,
            algorithm_version: env!("CARGO_PKG_VERSION").to_string(),
            confidence_warnings: vec![],
        }
    }
}

impl AnalysisMetadata {
    /// Fraction of received frames that were usable (0.0-1.0)
    pub fn keypoint_coverage(&self) -> f32 {
        if self.total_frames == 0 {
            0.0
        } else {
            self.usable_frames as f32 / self.total_frames as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_carries_crate_version() {
        let meta = AnalysisMetadata::default();
        assert_eq!(meta.algorithm_version, env!("CARGO_PKG_VERSION"));
        assert_eq!(meta.keypoint_coverage(), 0.0);
    }

    #[test]
    fn test_keypoint_coverage() {
        let meta = AnalysisMetadata {
            total_frames: 60,
            usable_frames: 45,
            ..AnalysisMetadata::default()
        };
        assert!((meta.keypoint_coverage() - 0.75).abs() < 1e-6);
    }
}
