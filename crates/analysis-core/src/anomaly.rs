//! Motion anomaly detection over dense optical flow.
//!
//! A frame pair is anomalous when the maximum flow magnitude anywhere in
//! the frame exceeds a fixed threshold (default 20.0 pixels of displacement
//! per frame, tunable configuration rather than derived from the data).

use framewatch_analyzers::OpticalFlowEstimator;
use framewatch_common::config::AnalysisDefaults;
use framewatch_frame_model::Frame;

/// Per-frame-pair motion anomaly detector.
///
/// Owns its flow estimator; construct one per pipeline and inject it at
/// pipeline construction time. Single-threaded use.
pub struct AnomalyDetector {
    estimator: Box<dyn OpticalFlowEstimator>,
    threshold: f64,
}

impl AnomalyDetector {
    pub fn new(estimator: Box<dyn OpticalFlowEstimator>, threshold: f64) -> Self {
        Self {
            estimator,
            threshold,
        }
    }

    /// Block-matching flow with the shared configuration defaults.
    pub fn with_defaults() -> Self {
        let defaults = AnalysisDefaults::default();
        Self::new(
            Box::new(framewatch_analyzers::backends::BlockMatchingFlow::new(
                defaults.flow,
            )),
            defaults.anomaly_threshold,
        )
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Decide whether the motion between `previous` and `current` is
    /// anomalous.
    ///
    /// The first frame of a stream has no predecessor and can never be
    /// anomalous. Pure given the two frames and a deterministic estimator.
    pub fn detect(&self, previous: Option<&Frame>, current: &Frame) -> bool {
        let Some(previous) = previous else {
            return false;
        };

        let flow = self
            .estimator
            .estimate(&previous.to_gray(), &current.to_gray());
        let max_magnitude = f64::from(flow.max_magnitude());

        tracing::debug!(
            frame = current.index,
            max_magnitude,
            threshold = self.threshold,
            "Flow magnitude"
        );

        max_magnitude > self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use framewatch_frame_model::FlowField;
    use image::{GrayImage, Rgb, RgbImage};

    /// Test estimator returning a field with one fixed displacement.
    struct ConstFlow {
        dx: f32,
        dy: f32,
    }

    impl OpticalFlowEstimator for ConstFlow {
        fn estimate(&self, _prev: &GrayImage, curr: &GrayImage) -> FlowField {
            let mut field = FlowField::zeros(curr.width(), curr.height());
            if curr.width() > 0 && curr.height() > 0 {
                field.set(0, 0, self.dx, self.dy);
            }
            field
        }

        fn name(&self) -> &str {
            "const"
        }
    }

    fn flat_frame(index: u64, value: u8) -> Frame {
        Frame::new(index, RgbImage::from_pixel(64, 48, Rgb([value, value, value])))
    }

    fn disc_frame(index: u64, disc_x: f64) -> Frame {
        let pixels = RgbImage::from_fn(128, 96, |x, y| {
            let dx = x as f64 - disc_x;
            let dy = y as f64 - 48.0;
            if (dx * dx + dy * dy).sqrt() < 10.0 {
                Rgb([230, 230, 230])
            } else {
                Rgb([25, 25, 25])
            }
        });
        Frame::new(index, pixels)
    }

    #[test]
    fn test_first_frame_is_never_anomalous() {
        let detector = AnomalyDetector::new(
            Box::new(ConstFlow { dx: 999.0, dy: 0.0 }),
            AnalysisDefaults::default().anomaly_threshold,
        );
        assert!(!detector.detect(None, &flat_frame(0, 128)));
    }

    #[test]
    fn test_default_threshold_comes_from_shared_config() {
        let detector = AnomalyDetector::with_defaults();
        assert_eq!(
            detector.threshold(),
            AnalysisDefaults::default().anomaly_threshold
        );
        assert_eq!(detector.threshold(), 20.0);
    }

    #[test]
    fn test_identical_frames_are_not_anomalous() {
        let detector = AnomalyDetector::with_defaults();
        let a = disc_frame(0, 64.0);
        let b = disc_frame(1, 64.0);
        assert!(!detector.detect(Some(&a), &b));
    }

    #[test]
    fn test_large_translation_is_anomalous() {
        let detector = AnomalyDetector::with_defaults();
        let a = disc_frame(0, 64.0);
        let b = disc_frame(1, 40.0);
        assert!(detector.detect(Some(&a), &b));
    }

    #[test]
    fn test_threshold_is_strictly_greater_than() {
        let prev = flat_frame(0, 128);
        let curr = flat_frame(1, 128);

        let at_threshold =
            AnomalyDetector::new(Box::new(ConstFlow { dx: 20.0, dy: 0.0 }), 20.0);
        assert!(!at_threshold.detect(Some(&prev), &curr));

        let above_threshold =
            AnomalyDetector::new(Box::new(ConstFlow { dx: 20.5, dy: 0.0 }), 20.0);
        assert!(above_threshold.detect(Some(&prev), &curr));
    }
}
