//! Tracked per-frame signals for segmentation
//!
//! Hip height is the primary signal, knee angle the secondary one. Both are
//! gap-filled over short dropouts; velocities come from the smoothed versions.
//! The state machine reads a running-median copy of the hip height so that a
//! glitch lasting a frame or two cannot start or end a repetition.
//!
//! A frame's hip position is only used when the frame has at least
//! `min_landmarks_per_frame` confident landmarks; a lone hip in an otherwise
//! empty frame is treated as a dropout.

use crate::config::AnalysisConfig;
use crate::features::angles::AngleSnapshot;
use crate::preprocessing::interpolation::fill_short_gaps;
use crate::preprocessing::smoothing::{median_filter, moving_average, velocity};

/// One step of the tracked signal, as consumed by the state machine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalSample {
    /// Position in the frame sequence
    pub position: usize,
    /// Hip height (gap-filled, unsmoothed)
    pub hip_height: f32,
    /// Running-median hip height
    pub filtered_height: f32,
    /// Hip height change per frame (smoothed)
    pub velocity: f32,
    /// Mean knee angle in degrees, if known
    pub knee_angle: Option<f32>,
    /// Knee angle change per frame in degrees (smoothed)
    pub knee_velocity: Option<f32>,
}

/// Gap-filled hip height and knee angle series for one video
#[derive(Debug, Clone)]
pub struct TrackedSignal {
    /// Hip height per position
    pub hip_height: Vec<Option<f32>>,
    /// Running-median hip height per position
    pub filtered_height: Vec<Option<f32>>,
    /// Mean knee angle per position
    pub knee_angle: Vec<Option<f32>>,
    /// Smoothed hip velocity per position
    pub hip_velocity: Vec<Option<f32>>,
    /// Smoothed knee angular velocity per position
    pub knee_velocity: Vec<Option<f32>>,
    /// Frames where the hips were actually observed
    pub usable_frames: usize,
    /// Hip samples filled by interpolation
    pub interpolated: usize,
}

impl TrackedSignal {
    /// Build the tracked signals from per-frame angle snapshots
    pub fn from_snapshots(snapshots: &[AngleSnapshot], config: &AnalysisConfig) -> Self {
        let raw_hip: Vec<Option<f32>> = snapshots
            .iter()
            .map(|s| s.hip_height.filter(|_| s.visible_landmarks >= config.min_landmarks_per_frame))
            .collect();
        let raw_knee: Vec<Option<f32>> = snapshots.iter().map(|s| s.mean_knee_angle()).collect();
        let usable_frames = raw_hip.iter().filter(|h| h.is_some()).count();

        let (hip_height, interpolated) = fill_short_gaps(&raw_hip, config.max_gap_frames);
        let (knee_angle, _) = fill_short_gaps(&raw_knee, config.max_gap_frames);

        let filtered_height = median_filter(&hip_height, config.median_window);
        let hip_velocity = velocity(&moving_average(&hip_height, config.smoothing_window));
        let knee_velocity = velocity(&moving_average(&knee_angle, config.smoothing_window));

        log::debug!(
            "Tracked signal: {} frames, {} usable, {} interpolated",
            snapshots.len(),
            usable_frames,
            interpolated
        );

        Self {
            hip_height,
            filtered_height,
            knee_angle,
            hip_velocity,
            knee_velocity,
            usable_frames,
            interpolated,
        }
    }

    /// Number of positions
    pub fn len(&self) -> usize {
        self.hip_height.len()
    }

    /// True when there are no positions
    pub fn is_empty(&self) -> bool {
        self.hip_height.is_empty()
    }

    /// Sample at a position, `None` where the hip height is still missing
    pub fn sample(&self, position: usize) -> Option<SignalSample> {
        let hip_height = (*self.hip_height.get(position)?)?;
        let velocity = self.hip_velocity[position].unwrap_or(0.0);
        Some(SignalSample {
            position,
            hip_height,
            filtered_height: self.filtered_height[position].unwrap_or(hip_height),
            velocity,
            knee_angle: self.knee_angle[position],
            knee_velocity: self.knee_velocity[position],
        })
    }

    /// Position of the lowest hip height within `[from, to]`, first one on ties
    pub fn lowest_position(&self, from: usize, to: usize) -> Option<usize> {
        let to = to.min(self.len().checked_sub(1)?);
        (from..=to)
            .filter_map(|p| self.hip_height[p].map(|h| (p, h)))
            .fold(None, |best: Option<(usize, f32)>, (p, h)| match best {
                Some((_, bh)) if bh <= h => best,
                _ => Some((p, h)),
            })
            .map(|(p, _)| p)
    }
}
