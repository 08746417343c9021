//! The sequential frame-processing pipeline.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use framewatch_analysis_core::activity::classify;
use framewatch_analysis_core::anomaly::AnomalyDetector;
use framewatch_analyzers::{FaceEmotionAnalyzer, PoseExtractor};
use framewatch_common::error::FramewatchResult;
use framewatch_frame_model::{ActivityLabel, AggregateReport, Emotion, Frame};

use crate::source::FrameSource;

/// Running per-frame tallies, reduced into the report at end of stream.
#[derive(Debug, Default)]
struct Tally {
    frames: u64,
    faces: u64,
    anomalies: u64,
    emotions: BTreeMap<Emotion, u64>,
    activities: BTreeMap<ActivityLabel, u64>,
}

impl Tally {
    fn into_report(self) -> AggregateReport {
        AggregateReport {
            total_frames: self.frames,
            total_faces: self.faces,
            total_anomalies: self.anomalies,
            emotions: self.emotions,
            activities: self.activities,
        }
    }
}

/// Frame-by-frame analysis pipeline.
///
/// Collaborators are injected at construction time; one pipeline instance
/// is single-threaded and processes one stream at a time.
pub struct VideoPipeline {
    faces: Box<dyn FaceEmotionAnalyzer>,
    pose: Box<dyn PoseExtractor>,
    anomaly: AnomalyDetector,
    stop_flag: Arc<AtomicBool>,
}

impl VideoPipeline {
    pub fn new(
        faces: Box<dyn FaceEmotionAnalyzer>,
        pose: Box<dyn PoseExtractor>,
        anomaly: AnomalyDetector,
    ) -> Self {
        Self {
            faces,
            pose,
            anomaly,
            stop_flag: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Get the stop flag for external coordination. Checked once per frame
    /// boundary, never mid-frame, so a stopped run keeps consistent tallies.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        self.stop_flag.clone()
    }

    /// Process every frame of `source` and reduce the tallies into one
    /// aggregate report.
    ///
    /// Analyzer faults are recovered per frame: a failing face or pose
    /// backend degrades that frame to "no detection" (logged at warn) and
    /// processing continues. A source read failure is fatal: the error is
    /// returned and no report is produced, so a partial run is never
    /// mistaken for a complete one. A cooperative stop ends the run cleanly
    /// at the frames processed so far.
    pub fn process(&mut self, source: &mut dyn FrameSource) -> FramewatchResult<AggregateReport> {
        let total = source.total_frames();
        let mut tally = Tally::default();
        let mut previous: Option<Frame> = None;

        tracing::info!(source = source.name(), ?total, "Pipeline started");

        while !self.stop_flag.load(Ordering::Relaxed) {
            let frame = match source.next_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => break,
                Err(e) => {
                    tracing::error!(
                        frames_processed = tally.frames,
                        error = %e,
                        "Frame read failed"
                    );
                    return Err(e);
                }
            };

            // Faces and emotions. A backend fault on one frame yields zero
            // detections for that frame only.
            let detections = match self.faces.analyze(&frame) {
                Ok(detections) => detections,
                Err(e) => {
                    tracing::warn!(
                        frame = frame.index,
                        backend = self.faces.name(),
                        error = %e,
                        "Face analyzer fault, no detections for this frame"
                    );
                    Vec::new()
                }
            };
            tally.faces += detections.len() as u64;
            for detection in &detections {
                *tally.emotions.entry(detection.emotion).or_insert(0) += 1;
            }

            // Posture. Exactly one label per frame, Unknown included.
            let landmarks = match self.pose.extract(&frame) {
                Ok(landmarks) => landmarks,
                Err(e) => {
                    tracing::warn!(
                        frame = frame.index,
                        backend = self.pose.name(),
                        error = %e,
                        "Pose extractor fault, no landmarks for this frame"
                    );
                    None
                }
            };
            let label = classify(landmarks.as_ref());
            *tally.activities.entry(label).or_insert(0) += 1;

            // Motion anomaly against the immediate predecessor.
            if self.anomaly.detect(previous.as_ref(), &frame) {
                tally.anomalies += 1;
            }

            // Retain the current frame untouched for the next iteration.
            previous = Some(frame);
            tally.frames += 1;

            match total {
                Some(total) => {
                    tracing::info!(frame = tally.frames, total, "Processed frame");
                }
                None => {
                    tracing::info!(frame = tally.frames, "Processed frame");
                }
            }
        }

        if self.stop_flag.load(Ordering::Relaxed) {
            tracing::info!(frames = tally.frames, "Pipeline stopped on request");
        } else {
            tracing::info!(frames = tally.frames, "Stream exhausted");
        }

        Ok(tally.into_report())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;
    use framewatch_analyzers::backends::{StubFaceAnalyzer, StubPoseExtractor};
    use framewatch_common::error::FramewatchError;
    use framewatch_frame_model::{BoundingBox, FaceDetection};
    use image::{Rgb, RgbImage};

    fn flat_frames(count: u64) -> Vec<Frame> {
        (0..count)
            .map(|i| Frame::new(i, RgbImage::from_pixel(32, 32, Rgb([90, 90, 90]))))
            .collect()
    }

    fn detection(emotion: Emotion) -> FaceDetection {
        FaceDetection::new(
            BoundingBox {
                x: 0,
                y: 0,
                w: 8,
                h: 8,
            },
            emotion,
        )
    }

    /// Source that fails after yielding a number of frames.
    struct FailingSource {
        yielded: u64,
        fail_after: u64,
    }

    impl FrameSource for FailingSource {
        fn next_frame(&mut self) -> FramewatchResult<Option<Frame>> {
            if self.yielded >= self.fail_after {
                return Err(FramewatchError::source("simulated read failure"));
            }
            let frame = Frame::new(self.yielded, RgbImage::from_pixel(8, 8, Rgb([0, 0, 0])));
            self.yielded += 1;
            Ok(Some(frame))
        }

        fn total_frames(&self) -> Option<u64> {
            None
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn quiet_pipeline() -> VideoPipeline {
        VideoPipeline::new(
            Box::new(StubFaceAnalyzer::empty()),
            Box::new(StubPoseExtractor::empty()),
            AnomalyDetector::with_defaults(),
        )
    }

    #[test]
    fn test_identical_quiet_frames() {
        let mut pipeline = quiet_pipeline();
        let mut source = MemorySource::new(flat_frames(3));
        let report = pipeline.process(&mut source).unwrap();

        assert_eq!(report.total_frames, 3);
        assert_eq!(report.total_faces, 0);
        assert_eq!(report.total_anomalies, 0);
        assert!(report.emotions.is_empty());
        assert_eq!(report.activities.get(&ActivityLabel::Unknown), Some(&3));
        assert_eq!(report.activities.len(), 1);
    }

    #[test]
    fn test_face_tallies_accumulate() {
        let mut pipeline = VideoPipeline::new(
            Box::new(StubFaceAnalyzer::scripted(vec![
                vec![detection(Emotion::Happy), detection(Emotion::Happy)],
                vec![detection(Emotion::Sad)],
                vec![],
            ])),
            Box::new(StubPoseExtractor::empty()),
            AnomalyDetector::with_defaults(),
        );
        let mut source = MemorySource::new(flat_frames(3));
        let report = pipeline.process(&mut source).unwrap();

        assert_eq!(report.total_faces, 3);
        assert_eq!(report.emotions.get(&Emotion::Happy), Some(&2));
        assert_eq!(report.emotions.get(&Emotion::Sad), Some(&1));
        let emotion_sum: u64 = report.emotions.values().sum();
        assert_eq!(emotion_sum, report.total_faces);
    }

    #[test]
    fn test_analyzer_faults_degrade_to_no_detection() {
        let mut pipeline = VideoPipeline::new(
            Box::new(StubFaceAnalyzer::failing("face model crashed")),
            Box::new(StubPoseExtractor::failing("pose model crashed")),
            AnomalyDetector::with_defaults(),
        );
        let mut source = MemorySource::new(flat_frames(2));
        let report = pipeline.process(&mut source).unwrap();

        assert_eq!(report.total_frames, 2);
        assert_eq!(report.total_faces, 0);
        assert_eq!(report.activities.get(&ActivityLabel::Unknown), Some(&2));
    }

    #[test]
    fn test_read_failure_is_fatal() {
        let mut pipeline = quiet_pipeline();
        let mut source = FailingSource {
            yielded: 0,
            fail_after: 2,
        };
        let err = pipeline.process(&mut source).unwrap_err();
        assert!(matches!(err, FramewatchError::Source { .. }));
    }

    /// Source that raises a stop flag after yielding a number of frames.
    struct StoppingSource {
        inner: MemorySource,
        stop_after: u64,
        yielded: u64,
        flag: Arc<AtomicBool>,
    }

    impl FrameSource for StoppingSource {
        fn next_frame(&mut self) -> FramewatchResult<Option<Frame>> {
            let frame = self.inner.next_frame()?;
            if frame.is_some() {
                self.yielded += 1;
                if self.yielded == self.stop_after {
                    self.flag.store(true, Ordering::SeqCst);
                }
            }
            Ok(frame)
        }

        fn total_frames(&self) -> Option<u64> {
            self.inner.total_frames()
        }

        fn name(&self) -> &str {
            "stopping"
        }
    }

    #[test]
    fn test_stop_flag_mid_stream_keeps_consistent_tallies() {
        let mut pipeline = VideoPipeline::new(
            Box::new(StubFaceAnalyzer::scripted(vec![
                vec![detection(Emotion::Happy)],
                vec![detection(Emotion::Sad), detection(Emotion::Neutral)],
                vec![detection(Emotion::Fear)],
            ])),
            Box::new(StubPoseExtractor::empty()),
            AnomalyDetector::with_defaults(),
        );
        // The flag is raised while frame 1 is in flight; that frame still
        // completes, then the next boundary check ends the run.
        let mut source = StoppingSource {
            inner: MemorySource::new(flat_frames(5)),
            stop_after: 2,
            yielded: 0,
            flag: pipeline.stop_flag(),
        };
        let report = pipeline.process(&mut source).unwrap();

        assert_eq!(report.total_frames, 2);
        assert_eq!(report.total_faces, 3);
        assert_eq!(report.emotions.get(&Emotion::Happy), Some(&1));
        assert_eq!(report.emotions.get(&Emotion::Sad), Some(&1));
        assert_eq!(report.emotions.get(&Emotion::Neutral), Some(&1));
        let activity_sum: u64 = report.activities.values().sum();
        let emotion_sum: u64 = report.emotions.values().sum();
        assert_eq!(activity_sum, report.total_frames);
        assert_eq!(emotion_sum, report.total_faces);
    }

    #[test]
    fn test_stop_flag_halts_before_first_frame() {
        let mut pipeline = quiet_pipeline();
        pipeline.stop_flag().store(true, Ordering::SeqCst);
        let mut source = MemorySource::new(flat_frames(5));
        let report = pipeline.process(&mut source).unwrap();
        assert_eq!(report.total_frames, 0);
    }

    #[test]
    fn test_histogram_sums_match_totals() {
        let mut pipeline = VideoPipeline::new(
            Box::new(StubFaceAnalyzer::scripted(vec![
                vec![detection(Emotion::Neutral)],
                vec![detection(Emotion::Fear), detection(Emotion::Angry)],
            ])),
            Box::new(StubPoseExtractor::empty()),
            AnomalyDetector::with_defaults(),
        );
        let mut source = MemorySource::new(flat_frames(4));
        let report = pipeline.process(&mut source).unwrap();

        let activity_sum: u64 = report.activities.values().sum();
        let emotion_sum: u64 = report.emotions.values().sum();
        assert_eq!(activity_sum, report.total_frames);
        assert_eq!(emotion_sum, report.total_faces);
    }
}
