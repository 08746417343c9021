//! Show a saved summary report.

use std::path::PathBuf;

use framewatch_frame_model::AggregateReport;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    let report = AggregateReport::load(&path)
        .map_err(|e| anyhow::anyhow!("Failed to load report: {e}"))?;

    println!("Report: {}", path.display());
    println!("  Frames: {}", report.total_frames);
    println!("  Faces detected: {}", report.total_faces);
    println!("  Anomalies detected: {}", report.total_anomalies);
    println!();

    println!("Emotions:");
    if report.emotions.is_empty() {
        println!("  (none)");
    }
    for (emotion, count) in &report.emotions {
        println!("  {emotion:?}: {count}");
    }
    println!();

    println!("Activities:");
    if report.activities.is_empty() {
        println!("  (none)");
    }
    for (activity, count) in &report.activities {
        println!("  {activity:?}: {count}");
    }

    Ok(())
}
