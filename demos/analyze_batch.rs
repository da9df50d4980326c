//! Example: Analyze multiple keypoint files in parallel
//!
//! Usage:
//!   cargo run --release --example analyze_batch -- [--jobs N] [--json] [--config FILE] <file1> <file2> ...
//!
//! Notes:
//! - Parallelism is across files (batch-level). Each analysis is still single-threaded.
//! - Default workers: (available CPU threads - 1), keeping one core free for the system.

use rayon::prelude::*;
use squat_form::io::keypoints::load_keypoints_json;
use squat_form::{analyze_squat, compute_confidence, AnalysisConfig, AnalysisResult};
use std::env;
use std::time::Instant;

fn default_jobs() -> usize {
    let n = std::thread::available_parallelism().map(|v| v.get()).unwrap_or(1);
    std::cmp::max(1, n.saturating_sub(1))
}

fn percentile(mut xs: Vec<f32>, p: f32) -> Option<f32> {
    if xs.is_empty() {
        return None;
    }
    xs.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let idx = ((xs.len() - 1) as f32 * p.clamp(0.0, 1.0)).round() as usize;
    Some(xs[idx.min(xs.len() - 1)])
}

struct ItemOut {
    path: String,
    result: Result<(AnalysisResult, f32), String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args: Vec<String> = env::args().skip(1).collect();

    let mut json = false;
    let mut jobs: Option<usize> = None;
    let mut config = AnalysisConfig::default();
    let mut paths: Vec<String> = Vec::new();

    while let Some(a) = args.first().cloned() {
        args.remove(0);
        match a.as_str() {
            "--json" => json = true,
            "--jobs" => {
                let v = args
                    .first()
                    .ok_or("--jobs requires a value")?
                    .parse::<usize>()?;
                args.remove(0);
                jobs = Some(std::cmp::max(1, v));
            }
            "--config" => {
                let path = args.first().ok_or("--config requires a path")?.clone();
                args.remove(0);
                config = AnalysisConfig::load(path)?;
            }
            "--help" | "-h" => {
                eprintln!(
                    "Usage: analyze_batch [--jobs N] [--json] [--config FILE] <file1> <file2> ...\n\
                     \n\
                     --jobs N       Parallel workers (default: CPU-1)\n\
                     --json         Emit one JSON object per line (JSONL)\n\
                     --config FILE  Load analysis settings from a TOML file\n"
                );
                return Ok(());
            }
            _ => paths.push(a),
        }
    }

    if paths.is_empty() {
        eprintln!("ERROR: Provide at least one keypoint file path. Use --help for usage.");
        std::process::exit(2);
    }

    let jobs = jobs.unwrap_or_else(default_jobs);
    eprintln!("Batch: {} files, jobs={}", paths.len(), jobs);

    let t0 = Instant::now();
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .expect("Failed to build rayon thread pool");

    let outs: Vec<ItemOut> = pool.install(|| {
        paths
            .par_iter()
            .map(|path| {
                let result = load_keypoints_json(path)
                    .and_then(|frames| analyze_squat(&frames, config.clone()))
                    .map(|res| {
                        let conf = compute_confidence(&res).overall_confidence;
                        (res, conf)
                    })
                    .map_err(|e| format!("{} ({})", e, e.guidance()));
                ItemOut {
                    path: path.clone(),
                    result,
                }
            })
            .collect()
    });

    if json {
        for o in &outs {
            let line = match &o.result {
                Ok((res, conf)) => serde_json::json!({
                    "file": o.path,
                    "confidence": conf,
                    "result": res,
                }),
                Err(e) => serde_json::json!({
                    "file": o.path,
                    "error": e,
                }),
            };
            println!("{}", line);
        }
    } else {
        for (idx, o) in outs.iter().enumerate() {
            match &o.result {
                Ok((res, conf)) => println!(
                    "[{}/{}] {}: score={} rating={} bottom=frame {} (conf={:.2}) time={:.2}ms",
                    idx + 1,
                    outs.len(),
                    o.path,
                    res.overall_score,
                    res.rating,
                    res.metadata.bottom_frame_idx,
                    conf,
                    res.metadata.processing_time_ms
                ),
                Err(e) => println!("[{}/{}] {}: ERROR: {}", idx + 1, outs.len(), o.path, e),
            }
        }
    }

    let ok: Vec<&AnalysisResult> = outs
        .iter()
        .filter_map(|o| o.result.as_ref().ok().map(|(r, _)| r))
        .collect();
    let ok_times: Vec<f32> = ok.iter().map(|r| r.metadata.processing_time_ms).collect();
    let wall_ms = t0.elapsed().as_secs_f64() * 1000.0;

    eprintln!("Done: ok={}/{} wall={:.0}ms", ok.len(), outs.len(), wall_ms);
    if !ok.is_empty() {
        let mean_score =
            ok.iter().map(|r| r.overall_score as f32).sum::<f32>() / ok.len() as f32;
        let mean = ok_times.iter().sum::<f32>() / ok_times.len() as f32;
        let p50 = percentile(ok_times.clone(), 0.50).unwrap_or(mean);
        let p90 = percentile(ok_times.clone(), 0.90).unwrap_or(mean);
        let min = ok_times.iter().cloned().fold(f32::INFINITY, f32::min);
        let max = ok_times.iter().cloned().fold(0.0, f32::max);
        eprintln!("overall_score: mean={:.1}", mean_score);
        eprintln!(
            "processing_time_ms: mean={:.2} p50={:.2} p90={:.2} min={:.2} max={:.2}",
            mean, p50, p90, min, max
        );
    }

    Ok(())
}
