//! Signal preprocessing modules
//!
//! Utilities for conditioning per-frame tracked signals before segmentation:
//! - Short-gap interpolation of missing samples
//! - Moving-average smoothing for velocity estimation

pub mod interpolation;
pub mod smoothing;
