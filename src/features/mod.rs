//! Feature extraction modules
//!
//! This module contains the pose geometry and scoring stages:
//! - Per-frame angles
//! - View classification
//! - Phase segmentation (explicit state machine)
//! - Metric scoring

pub mod angles;
pub mod metrics;
pub mod phase;
pub mod view;
