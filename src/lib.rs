//! # Squat Form
//!
//! Squat technique analysis from 2-D pose keypoints. Given the per-frame body
//! landmarks of a single video, finds the first complete repetition, scores it on
//! four biomechanical criteria and produces a graded result with feedback.
//!
//! ## Features
//!
//! - **Angle computation**: back angle from vertical, per-side knee angles, knee and balance offsets
//! - **View classification**: side / front / back / angled detection with advisory warnings
//! - **Phase segmentation**: explicit state machine tagging start, mid-descent, bottom, mid-ascent and end
//! - **Scoring**: knee tracking, back angle, depth and alignment, combined into a weighted score and letter grade
//!
//! ## Quick Start
//!
//! ```no_run
//! use squat_form::{analyze_squat, AnalysisConfig};
//! use squat_form::io::keypoints::load_keypoints_json;
//!
//! // Keypoints produced by the pose-estimation step
//! let frames = load_keypoints_json("squat_keypoints.json")?;
//!
//! let result = analyze_squat(&frames, AnalysisConfig::default())?;
//!
//! println!("Score: {} ({})", result.overall_score, result.rating);
//! println!("{}", result.feedback);
//! # Ok::<(), squat_form::AnalysisError>(())
//! ```
//!
//! ## Architecture
//!
//! The analysis pipeline follows this flow:
//!
//! ```text
//! Keypoints → Angles (per frame) → View → Phase Segmentation → Metric Scoring → Rating → Result
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod features;
pub mod io;
pub mod preprocessing;

// Re-export main types
pub use analysis::confidence::{compute_confidence, AnalysisConfidence, AnalysisFlag};
pub use analysis::metadata::AnalysisMetadata;
pub use analysis::result::{AnalysisResult, Grade, MetricBreakdown, Snapshot, SnapshotAngles};
pub use config::{AnalysisConfig, MetricWeights};
pub use error::AnalysisError;
pub use features::metrics::MetricKey;
pub use features::phase::Phase;
pub use features::view::{VideoAngle, ViewAngle};
pub use io::keypoints::{FrameObservation, Keypoint, Landmark};
pub use io::render::FrameRenderer;

use analysis::rating::{comprehensive_feedback, overall_score};
use analysis::snapshots::select_snapshots;
use features::angles::{compute_angles, AngleSnapshot};
use features::metrics::score_all;
use features::phase::segment_repetition;
use features::phase::signal::TrackedSignal;
use features::view::classify_view;
use io::keypoints::validate_frame_order;

/// Main analysis function
///
/// Analyzes one video's keypoints and returns the score, grade, per-metric
/// breakdown, viewpoint information and phase snapshots. Snapshot images are
/// left empty; use [`analyze_squat_with_renderer`] to attach them.
///
/// # Arguments
///
/// * `frames` - Per-frame keypoints in strictly increasing `frame_idx` order
/// * `config` - Analysis configuration parameters
///
/// # Returns
///
/// `AnalysisResult` for the first complete repetition in the video
///
/// # Errors
///
/// - `AnalysisError::InvalidInput` if frame indices are not strictly increasing
/// - `AnalysisError::ConfigError` if `config` fails validation
/// - `AnalysisError::InsufficientKeypoints` if too few frames have a usable hip position
/// - `AnalysisError::IncompleteRepetition` if no full start → bottom → end cycle is found
///
/// # Example
///
/// ```no_run
/// use squat_form::{analyze_squat, AnalysisConfig, AnalysisError};
/// use squat_form::io::keypoints::parse_keypoints_json;
///
/// let frames = parse_keypoints_json("[]")?;
/// match analyze_squat(&frames, AnalysisConfig::default()) {
///     Ok(result) => println!("{}", result.overall_score),
///     Err(e @ AnalysisError::InsufficientKeypoints { .. }) => println!("{}", e.guidance()),
///     Err(e) => return Err(e),
/// }
/// # Ok::<(), squat_form::AnalysisError>(())
/// ```
pub fn analyze_squat(
    frames: &[FrameObservation],
    config: AnalysisConfig,
) -> Result<AnalysisResult, AnalysisError> {
    analyze_squat_with_renderer(frames, None, config)
}

/// Analysis with snapshot images
///
/// Same as [`analyze_squat`], but each phase snapshot's `image` is filled in by
/// `renderer`. A frame that fails to render is logged and left without an image;
/// it never fails the analysis.
///
/// # Errors
///
/// Same as [`analyze_squat`]
pub fn analyze_squat_with_renderer(
    frames: &[FrameObservation],
    renderer: Option<&dyn FrameRenderer>,
    config: AnalysisConfig,
) -> Result<AnalysisResult, AnalysisError> {
    use std::time::Instant;
    let start_time = Instant::now();

    log::debug!("Starting squat analysis: {} frames", frames.len());

    config.validate()?;

    if frames.is_empty() {
        return Err(AnalysisError::InsufficientKeypoints {
            usable: 0,
            required: config.min_usable_frames,
        });
    }
    validate_frame_order(frames)?;

    // Per-frame geometry
    let angles: Vec<AngleSnapshot> = frames
        .iter()
        .map(|f| compute_angles(f, config.min_confidence))
        .collect();

    // Viewpoint (advisory)
    let video_angle = classify_view(frames, &config);

    // Segmentation
    let signal = TrackedSignal::from_snapshots(&angles, &config);
    let phases = segment_repetition(&signal, &config)?;

    // Scoring
    let metrics = score_all(&angles, &phases, video_angle.view_angle, &config);
    let overall = overall_score(&metrics, &config.weights);
    let rating = Grade::from_score(overall);
    let feedback = comprehensive_feedback(overall, &metrics);

    let breakdown = metrics
        .iter()
        .map(|(key, result)| (*key, MetricBreakdown::new(result, config.weights.weight(*key))))
        .collect();

    let snapshots = select_snapshots(frames, &angles, &phases, renderer);

    let mut confidence_warnings = Vec::new();
    if let Some(warning) = &video_angle.warning {
        confidence_warnings.push(warning.clone());
    }
    for result in metrics.values().filter(|r| !r.measured) {
        confidence_warnings.push(format!("{} could not be measured", result.metric.label()));
    }

    let processing_time_ms = start_time.elapsed().as_secs_f32() * 1000.0;

    log::debug!(
        "Analysis complete: score {} ({}) in {:.2} ms",
        overall,
        rating,
        processing_time_ms
    );

    Ok(AnalysisResult {
        overall_score: overall,
        rating,
        breakdown,
        feedback,
        video_angle: Some(video_angle),
        snapshots,
        metadata: AnalysisMetadata {
            total_frames: frames.len(),
            usable_frames: signal.usable_frames,
            interpolated_samples: signal.interpolated,
            bottom_frame_idx: frames[phases.bottom].frame_idx,
            processing_time_ms,
            algorithm_version: env!("CARGO_PKG_VERSION").to_string(),
            confidence_warnings,
        },
    })
}
