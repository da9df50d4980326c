//! Example: Analyze a single keypoint file
//!
//! Usage:
//!   cargo run --example analyze_file -- <keypoints.json> [config.toml]
//!
//! The keypoint file is a JSON array of frame observations as written by the
//! pose-estimation step.

use squat_form::io::keypoints::load_keypoints_json;
use squat_form::{analyze_squat, compute_confidence, AnalysisConfig, AnalysisError};
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::init();

    let mut args = env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("Usage: analyze_file <keypoints.json> [config.toml]");
        std::process::exit(2);
    };

    // Configure analysis
    let config = match args.next() {
        Some(config_path) => AnalysisConfig::load(config_path)?,
        None => AnalysisConfig::default(),
    };

    let frames = load_keypoints_json(&path)?;

    // Analyze
    let result = match analyze_squat(&frames, config) {
        Ok(result) => result,
        Err(
            e @ (AnalysisError::InsufficientKeypoints { .. }
            | AnalysisError::IncompleteRepetition(_)),
        ) => {
            println!("Analysis failed: {}", e);
            println!("{}", e.guidance());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    let confidence = compute_confidence(&result);

    // Print results
    println!("Analysis Results:");
    println!("  Overall: {}/100 ({})", result.overall_score, result.rating);
    for (metric, entry) in &result.breakdown {
        println!(
            "  {:<14} {:>3}/100  {}",
            metric.label(),
            entry.score,
            entry.feedback
        );
    }
    if let Some(warning) = result.video_angle.as_ref().and_then(|v| v.warning.as_ref()) {
        println!("  View warning: {}", warning);
    }
    for (phase, snapshot) in &result.snapshots {
        println!("  {:<12} frame {}", phase.label(), snapshot.frame_idx);
    }
    println!(
        "  Confidence: {:.2} ({})",
        confidence.overall_confidence,
        confidence.confidence_level()
    );
    println!("  Processing time: {:.2} ms", result.metadata.processing_time_ms);
    println!();
    println!("{}", result.feedback);

    Ok(())
}
