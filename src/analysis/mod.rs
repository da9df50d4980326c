//! Analysis and result aggregation modules
//!
//! Combines the metric results into the final analysis:
//! - Rating (weighted score, grade, feedback)
//! - Snapshot selection
//! - Result types and metadata
//! - Confidence scoring

pub mod confidence;
pub mod metadata;
pub mod rating;
pub mod result;
pub mod snapshots;
