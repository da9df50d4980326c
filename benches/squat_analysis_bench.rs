//! Performance benchmarks for squat analysis

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use squat_form::features::angles::compute_angles;
use squat_form::{analyze_squat, AnalysisConfig, FrameObservation, Landmark};

/// Side-on squat: `down` frames descending, `down` frames ascending, standing padding
fn synthetic_squat(down: usize, padding: usize) -> Vec<FrameObservation> {
    let mut hip_y: Vec<f32> = vec![0.45; padding];
    hip_y.extend((0..=down).map(|i| 0.45 + 0.3 * i as f32 / down as f32));
    hip_y.extend((1..=down).map(|i| 0.75 - 0.3 * i as f32 / down as f32));
    hip_y.extend(std::iter::repeat(0.45).take(padding));

    hip_y
        .iter()
        .enumerate()
        .map(|(idx, &y)| {
            FrameObservation::new(idx)
                .with(Landmark::Nose, 0.59, y - 0.37, 0.9)
                .with(Landmark::LeftShoulder, 0.52, y - 0.29, 0.9)
                .with(Landmark::RightShoulder, 0.54, y - 0.29, 0.9)
                .with(Landmark::LeftHip, 0.44, y, 0.9)
                .with(Landmark::RightHip, 0.46, y, 0.9)
                .with(Landmark::LeftKnee, 0.49, 0.72, 0.9)
                .with(Landmark::RightKnee, 0.51, 0.72, 0.9)
                .with(Landmark::LeftAnkle, 0.49, 0.95, 0.9)
                .with(Landmark::RightAnkle, 0.51, 0.95, 0.9)
        })
        .collect()
}

fn bench_analyze_squat(c: &mut Criterion) {
    // ~10 seconds at 30 fps
    let frames = synthetic_squat(120, 30);
    let config = AnalysisConfig::default();

    c.bench_function("analyze_squat_300_frames", |b| {
        b.iter(|| {
            let _ = analyze_squat(black_box(&frames), black_box(config.clone()));
        });
    });
}

fn bench_compute_angles(c: &mut Criterion) {
    let frames = synthetic_squat(30, 0);
    let frame = &frames[15];

    c.bench_function("compute_angles_single_frame", |b| {
        b.iter(|| compute_angles(black_box(frame), black_box(0.5)));
    });
}

criterion_group!(benches, bench_analyze_squat, bench_compute_angles);
criterion_main!(benches);
