//! Snapshot selection
//!
//! Packages the five phase frames for display: source frame index, label,
//! angles, and an image from the optional frame renderer.

use super::result::{Snapshot, SnapshotAngles};
use crate::features::angles::AngleSnapshot;
use crate::features::phase::{Phase, PhaseBoundaries};
use crate::io::keypoints::FrameObservation;
use crate::io::render::FrameRenderer;
use std::collections::BTreeMap;

/// Build one snapshot per phase
///
/// # Arguments
///
/// * `frames` - Input frames (positions index into this slice)
/// * `angles` - Angle snapshot per position
/// * `phases` - Segmented phase positions
/// * `renderer` - Optional image source
///
/// # Returns
///
/// Snapshot per phase. A failed render leaves `image` as `None`.
pub fn select_snapshots(
    frames: &[FrameObservation],
    angles: &[AngleSnapshot],
    phases: &PhaseBoundaries,
    renderer: Option<&dyn FrameRenderer>,
) -> BTreeMap<Phase, Snapshot> {
    Phase::ALL
        .iter()
        .map(|&phase| {
            let position = phases.position(phase);
            let frame_idx = frames[position].frame_idx;
            let image = renderer.and_then(|r| match r.render_frame(frame_idx) {
                Ok(image) => Some(image),
                Err(e) => {
                    log::warn!("Snapshot for {} unavailable: {}", phase.label(), e);
                    None
                }
            });
            let snapshot = Snapshot {
                image,
                label: phase.label().to_string(),
                frame_idx,
                angles: SnapshotAngles::from(&angles[position]),
            };
            (phase, snapshot)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::render::PrerenderedFrames;

    fn fixture() -> (Vec<FrameObservation>, Vec<AngleSnapshot>, PhaseBoundaries) {
        let frames: Vec<FrameObservation> =
            (0..10).map(|i| FrameObservation::new(100 + i * 2)).collect();
        let angles: Vec<AngleSnapshot> = (0..10)
            .map(|i| AngleSnapshot {
                back_angle: Some(i as f32),
                ..AngleSnapshot::default()
            })
            .collect();
        let phases = PhaseBoundaries {
            start: 0,
            mid_descent: 2,
            bottom: 4,
            mid_ascent: 6,
            end: 8,
        };
        (frames, angles, phases)
    }

    #[test]
    fn test_snapshots_use_source_frame_indices() {
        let (frames, angles, phases) = fixture();
        let snaps = select_snapshots(&frames, &angles, &phases, None);

        assert_eq!(snaps.len(), 5);
        assert_eq!(snaps[&Phase::Bottom].frame_idx, 108);
        assert_eq!(snaps[&Phase::Bottom].label, "Bottom");
        assert_eq!(snaps[&Phase::MidDescent].label, "Mid-Descent");
        assert_eq!(snaps[&Phase::End].angles.back_angle, Some(8.0));
        assert!(snaps.values().all(|s| s.image.is_none()));
    }

    #[test]
    fn test_render_failure_leaves_image_null() {
        let (frames, angles, phases) = fixture();
        let mut renderer = PrerenderedFrames::new();
        renderer.insert(100, "data:image/jpeg;base64,AAAA".to_string());

        let snaps = select_snapshots(&frames, &angles, &phases, Some(&renderer));
        assert_eq!(
            snaps[&Phase::Start].image.as_deref(),
            Some("data:image/jpeg;base64,AAAA")
        );
        assert!(snaps[&Phase::Bottom].image.is_none());
    }
}
