//! Moving-average and running-median smoothing, frame-to-frame velocity

/// Centered moving average over present samples
///
/// Each present sample is replaced by the mean of the present samples within
/// `window / 2` positions on either side. Missing samples stay missing. A window
/// of 1 (or 0) returns the signal unchanged.
pub fn moving_average(signal: &[Option<f32>], window: usize) -> Vec<Option<f32>> {
    let half = window / 2;
    if half == 0 {
        return signal.to_vec();
    }

    (0..signal.len())
        .map(|i| {
            signal[i]?;
            let lo = i.saturating_sub(half);
            let hi = (i + half).min(signal.len() - 1);
            let (sum, n) = signal[lo..=hi]
                .iter()
                .flatten()
                .fold((0.0f32, 0usize), |(sum, n), v| (sum + v, n + 1));
            Some(sum / n as f32)
        })
        .collect()
}

/// Centered running median over present samples
///
/// The window shrinks symmetrically near the ends, so the first and last samples
/// pass through unchanged and monotone stretches are preserved exactly. Runs of
/// outliers shorter than half the window are removed. Missing samples stay
/// missing.
pub fn median_filter(signal: &[Option<f32>], window: usize) -> Vec<Option<f32>> {
    let half = window / 2;
    if half == 0 {
        return signal.to_vec();
    }

    let last = signal.len().saturating_sub(1);
    (0..signal.len())
        .map(|i| {
            signal[i]?;
            let reach = half.min(i).min(last - i);
            let mut values: Vec<f32> = signal[i - reach..=i + reach].iter().flatten().copied().collect();
            values.sort_by(|a, b| a.total_cmp(b));
            let mid = values.len() / 2;
            if values.len() % 2 == 0 {
                Some((values[mid - 1] + values[mid]) * 0.5)
            } else {
                Some(values[mid])
            }
        })
        .collect()
}

/// Change per frame against the closest earlier present sample
///
/// The difference is divided by the number of positions between the two
/// samples, so a jump across a gap is spread over the frames it spans. The first
/// present sample has velocity 0.0; missing samples have no velocity.
pub fn velocity(signal: &[Option<f32>]) -> Vec<Option<f32>> {
    let mut previous: Option<(usize, f32)> = None;
    signal
        .iter()
        .enumerate()
        .map(|(i, sample)| {
            let value = (*sample)?;
            let v = previous.map_or(0.0, |(pi, p)| (value - p) / (i - pi) as f32);
            previous = Some((i, value));
            Some(v)
        })
        .collect()
}
