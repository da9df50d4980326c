//! Error types for the squat analysis engine

use std::fmt;

/// Errors that can occur during squat analysis
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Invalid input (out-of-order frames, malformed keypoint data)
    InvalidInput(String),

    /// Too few frames with usable hip keypoints to analyze the video
    InsufficientKeypoints {
        /// Number of usable frames found
        usable: usize,
        /// Minimum number of usable frames required
        required: usize,
    },

    /// No complete start → bottom → end cycle was found
    IncompleteRepetition(String),

    /// Landmarks required by a measurement are absent
    ///
    /// Recovered locally by the metric scorers; it only escapes when a caller
    /// uses the geometry helpers directly.
    GeometryUndefined(String),

    /// The frame-rendering collaborator could not produce an image
    RenderError(String),

    /// Configuration could not be parsed or is inconsistent
    ConfigError(String),
}

impl AnalysisError {
    /// User-facing guidance for presenting this failure at the boundary layer
    pub fn guidance(&self) -> &'static str {
        match self {
            AnalysisError::InvalidInput(_) => {
                "The keypoint data could not be read. Try uploading the video again."
            }
            AnalysisError::InsufficientKeypoints { .. } => {
                "Could not detect enough of your body in the video. Make sure your whole body, \
                 especially hips and knees, is visible and well lit."
            }
            AnalysisError::IncompleteRepetition(_) => {
                "No complete squat was detected. Make sure you are fully visible and perform at \
                 least one full squat, starting and finishing standing up."
            }
            AnalysisError::GeometryUndefined(_) => {
                "Some body landmarks could not be measured in this video."
            }
            AnalysisError::RenderError(_) => "A snapshot frame could not be rendered.",
            AnalysisError::ConfigError(_) => "The analysis configuration is invalid.",
        }
    }
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            AnalysisError::InsufficientKeypoints { usable, required } => write!(
                f,
                "Insufficient keypoints: {} usable frames, at least {} required",
                usable, required
            ),
            AnalysisError::IncompleteRepetition(msg) => write!(f, "Incomplete repetition: {}", msg),
            AnalysisError::GeometryUndefined(msg) => write!(f, "Geometry undefined: {}", msg),
            AnalysisError::RenderError(msg) => write!(f, "Render error: {}", msg),
            AnalysisError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for AnalysisError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_insufficient_keypoints() {
        let err = AnalysisError::InsufficientKeypoints { usable: 3, required: 10 };
        assert_eq!(
            err.to_string(),
            "Insufficient keypoints: 3 usable frames, at least 10 required"
        );
    }

    #[test]
    fn test_guidance_mentions_visibility() {
        let err = AnalysisError::IncompleteRepetition("stream ended while descending".to_string());
        assert!(err.guidance().contains("fully visible"));
        assert!(err.to_string().starts_with("Incomplete repetition"));
    }
}
