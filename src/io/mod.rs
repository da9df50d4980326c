//! Keypoint stream input and frame rendering
//!
//! The pose-estimation collaborator hands over per-frame keypoints as JSON; the
//! frame-rendering collaborator turns tagged frames into displayable images.

pub mod keypoints;
pub mod render;
