//! Squat phase segmentation
//!
//! Finds the first complete repetition in the tracked hip-height signal and tags
//! five representative frames:
//! - `start`: last standing frame before the descent
//! - `mid_descent`: temporal midpoint of start → bottom
//! - `bottom`: lowest hip height within the repetition
//! - `mid_ascent`: temporal midpoint of bottom → end
//! - `end`: first frame back at standing height

pub mod signal;
pub mod state_machine;

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};
use signal::TrackedSignal;
use state_machine::{Mark, SegmenterState};

/// Representative moment of a repetition
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Standing, before the descent
    Start,
    /// Halfway down
    MidDescent,
    /// Lowest point
    Bottom,
    /// Halfway up
    MidAscent,
    /// Standing again
    End,
}

impl Phase {
    /// All phases in temporal order
    pub const ALL: [Phase; 5] = [
        Phase::Start,
        Phase::MidDescent,
        Phase::Bottom,
        Phase::MidAscent,
        Phase::End,
    ];

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Start => "Start",
            Phase::MidDescent => "Mid-Descent",
            Phase::Bottom => "Bottom",
            Phase::MidAscent => "Mid-Ascent",
            Phase::End => "End",
        }
    }
}

/// Positions (indices into the frame sequence) of the five phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseBoundaries {
    /// Start position
    pub start: usize,
    /// Mid-descent position
    pub mid_descent: usize,
    /// Bottom position
    pub bottom: usize,
    /// Mid-ascent position
    pub mid_ascent: usize,
    /// End position
    pub end: usize,
}

impl PhaseBoundaries {
    /// Position tagged with `phase`
    pub fn position(&self, phase: Phase) -> usize {
        match phase {
            Phase::Start => self.start,
            Phase::MidDescent => self.mid_descent,
            Phase::Bottom => self.bottom,
            Phase::MidAscent => self.mid_ascent,
            Phase::End => self.end,
        }
    }
}

/// Segment the first complete repetition
///
/// A cycle that completes but is too shallow (less than `config.min_squat_depth`
/// between start and bottom) or too short to place the midpoints is discarded,
/// and the search restarts from Idle at the following frame.
///
/// # Arguments
///
/// * `signal` - Tracked hip height / knee angle signal for the whole video
/// * `config` - Segmentation thresholds
///
/// # Returns
///
/// Phase positions with `start < mid_descent < bottom < mid_ascent < end`
///
/// # Errors
///
/// - `AnalysisError::InsufficientKeypoints` if fewer than `config.min_usable_frames`
///   frames have a hip position
/// - `AnalysisError::IncompleteRepetition` if the video ends before the hips return
///   to standing height, or every completed cycle was discarded
pub fn segment_repetition(
    signal: &TrackedSignal,
    config: &AnalysisConfig,
) -> Result<PhaseBoundaries, AnalysisError> {
    if signal.usable_frames < config.min_usable_frames {
        return Err(AnalysisError::InsufficientKeypoints {
            usable: signal.usable_frames,
            required: config.min_usable_frames,
        });
    }

    let mut state = SegmenterState::default();
    let mut rejected: Option<String> = None;
    for position in 0..signal.len() {
        let Some(sample) = signal.sample(position) else {
            continue;
        };
        let next = state.step(&sample, config);
        if next.name() != state.name() {
            log::debug!(
                "Segmenter {} -> {} at position {} (hip height {:.3})",
                state.name(),
                next.name(),
                position,
                sample.hip_height
            );
        }
        state = next;

        if let SegmenterState::Terminal { start, end, .. } = state {
            match accept_cycle(signal, start, end.position, config) {
                Ok(boundaries) => {
                    log::debug!("Segmented repetition: {:?}", boundaries);
                    return Ok(boundaries);
                }
                Err(reason) => {
                    log::debug!("Discarding cycle: {}", reason);
                    rejected = Some(reason);
                    state = SegmenterState::default();
                }
            }
        }
    }

    let reason = match state {
        SegmenterState::Idle { .. } => rejected
            .map(|r| format!("no complete repetition found ({})", r))
            .unwrap_or_else(|| "no downward hip movement detected".to_string()),
        SegmenterState::Descending { .. } | SegmenterState::BottomSeeking { .. } => {
            "video ended before the hips started rising".to_string()
        }
        SegmenterState::Ascending { .. } | SegmenterState::Terminal { .. } => {
            "video ended before returning to the standing position".to_string()
        }
    };
    Err(AnalysisError::IncompleteRepetition(reason))
}

/// Check a completed cycle and place its phases, or say why it is discarded
fn accept_cycle(
    signal: &TrackedSignal,
    start: Mark,
    end: usize,
    config: &AnalysisConfig,
) -> Result<PhaseBoundaries, String> {
    // Lowest hip height over the whole window, not just what the FSM tracked
    let bottom = signal
        .lowest_position(start.position, end)
        .ok_or_else(|| "no hip samples inside the cycle".to_string())?;
    let depth = signal.hip_height[bottom].map_or(0.0, |h| start.height - h);

    if depth < config.min_squat_depth {
        return Err(format!(
            "cycle too shallow: hips dropped {:.3}, need {:.3} (start {}, bottom {}, end {})",
            depth, config.min_squat_depth, start.position, bottom, end
        ));
    }
    if bottom < start.position + 2 || end < bottom + 2 {
        return Err(format!(
            "cycle too short to segment (start {}, bottom {}, end {})",
            start.position, bottom, end
        ));
    }

    Ok(PhaseBoundaries {
        start: start.position,
        mid_descent: (start.position + bottom).div_ceil(2),
        bottom,
        mid_ascent: (bottom + end).div_ceil(2),
        end,
    })
}
