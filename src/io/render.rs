//! Frame rendering seam
//!
//! Decoding video and encoding images is done outside this crate. Snapshot
//! selection only needs "an image for frame N", which callers provide through
//! [`FrameRenderer`].

use crate::error::AnalysisError;
use std::collections::HashMap;

/// Produces a displayable image payload (e.g. a `data:image/jpeg;base64,...` URI)
/// for a frame index
pub trait FrameRenderer {
    /// Render the frame with the given source index
    fn render_frame(&self, frame_idx: usize) -> Result<String, AnalysisError>;
}

/// Renderer backed by images that were already extracted
#[derive(Debug, Clone, Default)]
pub struct PrerenderedFrames {
    images: HashMap<usize, String>,
}

impl PrerenderedFrames {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the payload for a frame
    pub fn insert(&mut self, frame_idx: usize, image: String) {
        self.images.insert(frame_idx, image);
    }
}

impl FrameRenderer for PrerenderedFrames {
    fn render_frame(&self, frame_idx: usize) -> Result<String, AnalysisError> {
        self.images
            .get(&frame_idx)
            .cloned()
            .ok_or_else(|| AnalysisError::RenderError(format!("no image for frame {}", frame_idx)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prerendered_frames() {
        let mut frames = PrerenderedFrames::new();
        frames.insert(7, "data:image/jpeg;base64,AAAA".to_string());
        assert_eq!(frames.render_frame(7).unwrap(), "data:image/jpeg;base64,AAAA");
        assert!(matches!(frames.render_frame(8), Err(AnalysisError::RenderError(_))));
    }
}
