//! Short-gap interpolation of tracked signals

/// Fill interior runs of missing samples by linear interpolation
///
/// Only gaps bounded by present samples on both sides and no longer than
/// `max_gap` samples are filled. Leading and trailing gaps, and longer interior
/// gaps, are left missing.
///
/// # Arguments
///
/// * `signal` - Per-frame samples, `None` where the signal is absent
/// * `max_gap` - Longest run of missing samples to fill
///
/// # Returns
///
/// The filled signal and the number of samples that were filled
///
/// # Example
///
/// ```
/// use squat_form::preprocessing::interpolation::fill_short_gaps;
///
/// let (filled, count) = fill_short_gaps(&[Some(1.0), None, Some(3.0)], 2);
/// assert_eq!(filled, vec![Some(1.0), Some(2.0), Some(3.0)]);
/// assert_eq!(count, 1);
/// ```
pub fn fill_short_gaps(signal: &[Option<f32>], max_gap: usize) -> (Vec<Option<f32>>, usize) {
    let mut filled = signal.to_vec();
    let mut count = 0;
    let mut last_present: Option<usize> = None;

    for i in 0..signal.len() {
        let Some(value) = signal[i] else {
            continue;
        };

        if let Some(prev) = last_present {
            let gap = i - prev - 1;
            if gap > 0 && gap <= max_gap {
                // prev is only set from present samples
                let start = signal[prev].unwrap_or(value);
                let span = (i - prev) as f32;
                for (offset, slot) in filled[prev + 1..i].iter_mut().enumerate() {
                    let t = (offset + 1) as f32 / span;
                    *slot = Some(start + (value - start) * t);
                }
                count += gap;
            }
        }
        last_present = Some(i);
    }

    if count > 0 {
        log::debug!("Interpolated {} missing samples (max gap {})", count, max_gap);
    }

    (filled, count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_short_gap() {
        let signal = vec![Some(0.0), None, None, None, Some(4.0)];
        let (filled, count) = fill_short_gaps(&signal, 3);
        assert_eq!(count, 3);
        for (i, v) in filled.iter().enumerate() {
            assert!((v.unwrap() - i as f32).abs() < 1e-6);
        }
    }

    #[test]
    fn test_long_gap_left_missing() {
        let signal = vec![Some(0.0), None, None, None, Some(4.0)];
        let (filled, count) = fill_short_gaps(&signal, 2);
        assert_eq!(count, 0);
        assert_eq!(filled, signal);
    }

    #[test]
    fn test_edges_left_missing() {
        let signal = vec![None, Some(1.0), None, Some(3.0), None];
        let (filled, count) = fill_short_gaps(&signal, 5);
        assert_eq!(count, 1);
        assert_eq!(filled[0], None);
        assert_eq!(filled[2], Some(2.0));
        assert_eq!(filled[4], None);
    }

    #[test]
    fn test_empty_signal() {
        let (filled, count) = fill_short_gaps(&[], 3);
        assert!(filled.is_empty());
        assert_eq!(count, 0);
    }
}
