//! Run the analysis pipeline over a frame stream.

use std::path::PathBuf;

use anyhow::Context;

use framewatch_analysis_core::anomaly::AnomalyDetector;
use framewatch_analyzers::backends::{
    detect_best_face_analyzer, detect_best_pose_extractor, BlockMatchingFlow,
};
use framewatch_common::config::AppConfig;
use framewatch_pipeline::{FrameSource, ImageSequenceSource, VideoPipeline};

pub fn run(path: PathBuf, output: PathBuf, threshold: Option<f64>) -> anyhow::Result<()> {
    let config = AppConfig::load();
    let threshold = threshold.unwrap_or(config.analysis.anomaly_threshold);

    let mut source =
        ImageSequenceSource::open(&path).context("Failed to open the video source")?;

    println!("Analyzing frames from: {}", path.display());
    if let Some(total) = source.total_frames() {
        println!("  {total} frames, anomaly threshold {threshold}");
    }

    let faces = detect_best_face_analyzer();
    let pose = detect_best_pose_extractor();
    let anomaly = AnomalyDetector::new(
        Box::new(BlockMatchingFlow::new(config.analysis.flow.clone())),
        threshold,
    );

    let mut pipeline = VideoPipeline::new(faces, pose, anomaly);
    let report = pipeline
        .process(&mut source)
        .context("Processing failed")?;

    report
        .save(&output)
        .context("Failed to write the report")?;

    println!(
        "Processing complete. Report saved to '{}'.",
        output.display()
    );
    Ok(())
}
