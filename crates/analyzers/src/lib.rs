//! Framewatch Analyzers
//!
//! Trait boundaries for the three external analysis collaborators, plus the
//! backends that implement them:
//!
//! - **FaceEmotionAnalyzer:** per-frame face detections with dominant emotion
//! - **PoseExtractor:** per-frame normalized skeletal landmarks
//! - **OpticalFlowEstimator:** dense motion field between consecutive frames
//!
//! Backends are pluggable. Model-backed face/pose analyzers are external
//! integrations; when none is compiled in, `detect_best_*` falls back to a
//! stub that yields no detections, so a pipeline still runs end to end.
//!
//! Analyzer instances are single-threaded: construct one per pipeline and
//! inject it at pipeline construction time. Backends keep whatever internal
//! model context they need between frames.

pub mod backends;

use image::GrayImage;

use framewatch_common::error::FramewatchResult;
use framewatch_frame_model::{FaceDetection, FlowField, Frame, LandmarkSet};

/// Face detection and dominant-emotion classification boundary.
///
/// `analyze` must tolerate frames with zero, one, or multiple faces. A
/// returned error means the backend failed on this frame only; callers
/// treat it as zero detections.
pub trait FaceEmotionAnalyzer: Send {
    /// Analyze one frame, returning every detected face with its dominant
    /// emotion.
    fn analyze(&mut self, frame: &Frame) -> FramewatchResult<Vec<FaceDetection>>;

    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Check if the backend is available on this system.
    fn is_available(&self) -> bool;
}

/// Pose landmark extraction boundary.
///
/// Returns at most one landmark set per frame (single-person extraction).
pub trait PoseExtractor: Send {
    /// Extract normalized skeletal landmarks, if a body is visible.
    fn extract(&mut self, frame: &Frame) -> FramewatchResult<Option<LandmarkSet>>;

    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Check if the backend is available on this system.
    fn is_available(&self) -> bool;
}

/// Dense optical flow boundary.
///
/// Implementations must be deterministic: identical inputs produce an
/// identical field. The returned field has the same spatial dimensions as
/// the inputs.
pub trait OpticalFlowEstimator: Send {
    /// Estimate per-pixel displacement from `prev_gray` to `curr_gray`.
    fn estimate(&self, prev_gray: &GrayImage, curr_gray: &GrayImage) -> FlowField;

    /// Backend name for logging.
    fn name(&self) -> &str;
}
