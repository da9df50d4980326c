//! Repetition segmentation state machine
//!
//! ```text
//! Idle ──drop below peak──▶ Descending ──slows / knees re-extend──▶ BottomSeeking
//!                                                                    │        ▲
//!                                                     rise above bottom   new low
//!                                                                    ▼        │
//!                                   Terminal ◀──back at start height── Ascending
//! ```
//!
//! Each transition is a pure function of the current state, one signal sample
//! and the configuration. Heights are the running-median hip heights, so the
//! peak and standing marks ignore one- and two-frame glitches. Terminal is
//! absorbing; the caller decides whether the cycle is kept or the search
//! restarts from Idle.

use super::signal::SignalSample;
use crate::config::AnalysisConfig;

/// A position in the frame sequence together with its filtered hip height
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mark {
    /// Position in the frame sequence
    pub position: usize,
    /// Running-median hip height at that position
    pub height: f32,
}

impl From<&SignalSample> for Mark {
    fn from(sample: &SignalSample) -> Self {
        Mark {
            position: sample.position,
            height: sample.filtered_height,
        }
    }
}

/// Segmenter state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmenterState {
    /// Waiting for the hips to start dropping
    Idle {
        /// Highest hip position seen so far
        peak: Option<Mark>,
        /// Latest frame still within the noise floor of the peak
        standing: Option<Mark>,
    },
    /// Hips moving down
    Descending {
        /// Last standing frame before the descent
        start: Mark,
        /// Lowest frame so far
        bottom: Mark,
    },
    /// Descent has slowed; waiting for the hips to rise
    BottomSeeking {
        /// Last standing frame before the descent
        start: Mark,
        /// Lowest frame so far
        bottom: Mark,
    },
    /// Hips rising back toward the start height
    Ascending {
        /// Last standing frame before the descent
        start: Mark,
        /// Lowest frame of the repetition
        bottom: Mark,
    },
    /// One full repetition found
    Terminal {
        /// Last standing frame before the descent
        start: Mark,
        /// Lowest frame of the repetition
        bottom: Mark,
        /// First frame back at standing height
        end: Mark,
    },
}

impl Default for SegmenterState {
    fn default() -> Self {
        SegmenterState::Idle {
            peak: None,
            standing: None,
        }
    }
}

impl SegmenterState {
    /// Short state name for logging
    pub fn name(&self) -> &'static str {
        match self {
            SegmenterState::Idle { .. } => "idle",
            SegmenterState::Descending { .. } => "descending",
            SegmenterState::BottomSeeking { .. } => "bottom-seeking",
            SegmenterState::Ascending { .. } => "ascending",
            SegmenterState::Terminal { .. } => "terminal",
        }
    }

    /// True once a full repetition has been found
    pub fn is_terminal(&self) -> bool {
        matches!(self, SegmenterState::Terminal { .. })
    }

    /// Advance the state machine by one sample
    pub fn step(self, sample: &SignalSample, config: &AnalysisConfig) -> SegmenterState {
        let here = Mark::from(sample);
        match self {
            SegmenterState::Idle { peak, standing } => step_idle(peak, standing, sample, config),

            SegmenterState::Descending { start, bottom } => {
                let bottom = lower(bottom, here);
                let slowed = sample.velocity > -config.still_velocity;
                let knees_extending = sample
                    .knee_velocity
                    .is_some_and(|v| v > config.knee_rise_velocity);
                if slowed || knees_extending {
                    SegmenterState::BottomSeeking { start, bottom }
                } else {
                    SegmenterState::Descending { start, bottom }
                }
            }

            SegmenterState::BottomSeeking { start, bottom } => {
                let bottom = lower(bottom, here);
                if here.height > bottom.height + config.ascent_threshold {
                    SegmenterState::Ascending { start, bottom }
                } else {
                    SegmenterState::BottomSeeking { start, bottom }
                }
            }

            SegmenterState::Ascending { start, bottom } => {
                if here.height < bottom.height {
                    return SegmenterState::BottomSeeking { start, bottom: here };
                }
                let at_start_height = here.height >= start.height - config.noise_floor;
                let settled = here.height >= start.height - config.return_tolerance
                    && sample.velocity.abs() <= config.still_velocity;
                if (at_start_height || settled) && here.position >= bottom.position + 2 {
                    SegmenterState::Terminal {
                        start,
                        bottom,
                        end: here,
                    }
                } else {
                    SegmenterState::Ascending { start, bottom }
                }
            }

            terminal @ SegmenterState::Terminal { .. } => terminal,
        }
    }
}

fn step_idle(
    peak: Option<Mark>,
    standing: Option<Mark>,
    sample: &SignalSample,
    config: &AnalysisConfig,
) -> SegmenterState {
    let here = Mark::from(sample);
    let Some(peak) = peak else {
        return SegmenterState::Idle {
            peak: Some(here),
            standing: Some(here),
        };
    };

    if here.height > peak.height {
        SegmenterState::Idle {
            peak: Some(here),
            standing: Some(here),
        }
    } else if here.height >= peak.height - config.noise_floor {
        SegmenterState::Idle {
            peak: Some(peak),
            standing: Some(here),
        }
    } else if here.height < peak.height - config.descent_threshold && sample.velocity < 0.0 {
        SegmenterState::Descending {
            start: standing.unwrap_or(peak),
            bottom: here,
        }
    } else {
        SegmenterState::Idle {
            peak: Some(peak),
            standing,
        }
    }
}

fn lower(a: Mark, b: Mark) -> Mark {
    if b.height < a.height {
        b
    } else {
        a
    }
}
