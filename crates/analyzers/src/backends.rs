//! Analyzer backend implementations.
//!
//! Face/emotion and pose extraction are model-backed capabilities; this
//! crate ships stub backends (scripted fixtures for tests, empty fallback
//! for production) and a real pyramidal block-matching optical flow
//! estimator.

use image::GrayImage;

use framewatch_common::config::FlowParams;
use framewatch_common::error::{FramewatchError, FramewatchResult};
use framewatch_frame_model::{FaceDetection, FlowField, Frame, LandmarkSet};

use crate::{FaceEmotionAnalyzer, OpticalFlowEstimator, PoseExtractor};

/// Stub face analyzer that replays scripted per-frame detections.
pub struct StubFaceAnalyzer {
    frames: Vec<Vec<FaceDetection>>,
    index: usize,
    fail_message: Option<String>,
    available: bool,
}

impl StubFaceAnalyzer {
    /// Replay one detection list per frame; exhausted frames yield no faces.
    pub fn scripted(frames: Vec<Vec<FaceDetection>>) -> Self {
        Self {
            frames,
            index: 0,
            fail_message: None,
            available: true,
        }
    }

    /// The production fallback when no model backend is compiled in. Never
    /// detects anything and reports itself unavailable.
    pub fn empty() -> Self {
        Self {
            frames: vec![],
            index: 0,
            fail_message: None,
            available: false,
        }
    }

    /// A stub whose every call fails, for exercising the degrade path.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            frames: vec![],
            index: 0,
            fail_message: Some(message.into()),
            available: true,
        }
    }
}

impl FaceEmotionAnalyzer for StubFaceAnalyzer {
    fn analyze(&mut self, _frame: &Frame) -> FramewatchResult<Vec<FaceDetection>> {
        if let Some(ref message) = self.fail_message {
            return Err(FramewatchError::analyzer(message.clone()));
        }
        let detections = self.frames.get(self.index).cloned().unwrap_or_default();
        self.index += 1;
        Ok(detections)
    }

    fn name(&self) -> &str {
        "stub-face"
    }

    fn is_available(&self) -> bool {
        self.available
    }
}

/// Stub pose extractor that replays scripted per-frame landmark sets.
pub struct StubPoseExtractor {
    frames: Vec<Option<LandmarkSet>>,
    index: usize,
    fail_message: Option<String>,
    available: bool,
}

impl StubPoseExtractor {
    /// Replay one optional landmark set per frame; exhausted frames yield
    /// no landmarks.
    pub fn scripted(frames: Vec<Option<LandmarkSet>>) -> Self {
        Self {
            frames,
            index: 0,
            fail_message: None,
            available: true,
        }
    }

    /// The production fallback when no model backend is compiled in. Never
    /// finds a body and reports itself unavailable.
    pub fn empty() -> Self {
        Self {
            frames: vec![],
            index: 0,
            fail_message: None,
            available: false,
        }
    }

    /// A stub whose every call fails.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            frames: vec![],
            index: 0,
            fail_message: Some(message.into()),
            available: true,
        }
    }
}

impl PoseExtractor for StubPoseExtractor {
    fn extract(&mut self, _frame: &Frame) -> FramewatchResult<Option<LandmarkSet>> {
        if let Some(ref message) = self.fail_message {
            return Err(FramewatchError::analyzer(message.clone()));
        }
        let landmarks = self.frames.get(self.index).cloned().flatten();
        self.index += 1;
        Ok(landmarks)
    }

    fn name(&self) -> &str {
        "stub-pose"
    }

    fn is_available(&self) -> bool {
        self.available
    }
}

/// Detect the best available face/emotion backend.
pub fn detect_best_face_analyzer() -> Box<dyn FaceEmotionAnalyzer> {
    tracing::warn!(
        "No face/emotion model backend compiled in, faces will not be detected"
    );
    Box::new(StubFaceAnalyzer::empty())
}

/// Detect the best available pose extraction backend.
pub fn detect_best_pose_extractor() -> Box<dyn PoseExtractor> {
    tracing::warn!(
        "No pose model backend compiled in, every frame will classify as Desconhecida"
    );
    Box::new(StubPoseExtractor::empty())
}

/// Pyramidal block-matching dense optical flow.
///
/// Exhaustive SAD search over a window at each pyramid level, coarse to
/// fine, with the coarse estimate seeding the finer levels. Integer-only
/// matching in a fixed scan order keeps the result deterministic.
pub struct BlockMatchingFlow {
    params: FlowParams,
}

impl BlockMatchingFlow {
    pub fn new(params: FlowParams) -> Self {
        Self { params }
    }

    pub fn with_defaults() -> Self {
        Self::new(FlowParams::default())
    }

    /// Build an image pyramid, full resolution first.
    fn build_pyramid(&self, img: &GrayImage) -> Vec<GrayImage> {
        let mut pyramid = vec![img.clone()];
        let min_dim = (self.params.window_size * 2).max(8);

        for _ in 1..self.params.pyramid_levels {
            let Some(last) = pyramid.last() else { break };
            let w = (last.width() as f64 * self.params.pyramid_scale).round() as u32;
            let h = (last.height() as f64 * self.params.pyramid_scale).round() as u32;
            if w < min_dim || h < min_dim {
                break;
            }
            let next = image::imageops::resize(last, w, h, image::imageops::FilterType::Triangle);
            pyramid.push(next);
        }

        pyramid
    }
}

impl OpticalFlowEstimator for BlockMatchingFlow {
    fn estimate(&self, prev_gray: &GrayImage, curr_gray: &GrayImage) -> FlowField {
        let (width, height) = curr_gray.dimensions();
        if prev_gray.dimensions() != (width, height) || width == 0 || height == 0 {
            return FlowField::zeros(width, height);
        }

        let prev_pyramid = self.build_pyramid(prev_gray);
        let curr_pyramid = self.build_pyramid(curr_gray);
        let coarsest = prev_pyramid.len() - 1;
        let gain = (1.0 / self.params.pyramid_scale) as f32;

        let mut flow = FlowField::zeros(
            prev_pyramid[coarsest].width(),
            prev_pyramid[coarsest].height(),
        );

        for level in (0..prev_pyramid.len()).rev() {
            if level != coarsest {
                flow = upsample_flow(
                    &flow,
                    prev_pyramid[level].width(),
                    prev_pyramid[level].height(),
                    gain,
                );
            }
            for _ in 0..self.params.iterations {
                refine(
                    &prev_pyramid[level],
                    &curr_pyramid[level],
                    &mut flow,
                    self.params.window_size,
                );
            }
        }

        flow
    }

    fn name(&self) -> &str {
        "block-matching"
    }
}

/// One block-matching refinement pass over a single pyramid level.
fn refine(prev: &GrayImage, curr: &GrayImage, flow: &mut FlowField, window: u32) {
    let (width, height) = curr.dimensions();
    let step = window.max(1);
    let half = (window / 2) as i32;
    let radius = half.max(1);
    let mut updated = FlowField::zeros(width, height);

    let mut by = 0;
    while by < height {
        let mut bx = 0;
        while bx < width {
            let cx = (bx + step / 2).min(width - 1) as i32;
            let cy = (by + step / 2).min(height - 1) as i32;

            let (fx, fy) = flow.get(cx as u32, cy as u32);
            let seed = (fx.round() as i32, fy.round() as i32);

            // Strict improvement keeps the seed on ties, so identical frames
            // stay at zero displacement everywhere.
            let mut best = seed;
            let mut best_cost = block_cost(prev, curr, cx, cy, half, seed.0, seed.1);
            for dy in -radius..=radius {
                for dx in -radius..=radius {
                    if dx == 0 && dy == 0 {
                        continue;
                    }
                    let cand = (seed.0 + dx, seed.1 + dy);
                    let cost = block_cost(prev, curr, cx, cy, half, cand.0, cand.1);
                    if cost < best_cost {
                        best_cost = cost;
                        best = cand;
                    }
                }
            }

            for y in by..(by + step).min(height) {
                for x in bx..(bx + step).min(width) {
                    updated.set(x, y, best.0 as f32, best.1 as f32);
                }
            }

            bx += step;
        }
        by += step;
    }

    *flow = updated;
}

/// Sum of absolute differences between a window in `prev` centered at
/// `(cx, cy)` and a window in `curr` displaced by `(dx, dy)`. Reads are
/// clamped at the image borders.
fn block_cost(prev: &GrayImage, curr: &GrayImage, cx: i32, cy: i32, half: i32, dx: i32, dy: i32) -> u64 {
    let mut sum = 0u64;
    for oy in -half..=half {
        for ox in -half..=half {
            let p = sample(prev, cx + ox, cy + oy);
            let c = sample(curr, cx + dx + ox, cy + dy + oy);
            sum += u64::from((i32::from(p) - i32::from(c)).unsigned_abs());
        }
    }
    sum
}

fn sample(img: &GrayImage, x: i32, y: i32) -> u8 {
    let x = x.clamp(0, img.width() as i32 - 1) as u32;
    let y = y.clamp(0, img.height() as i32 - 1) as u32;
    img.get_pixel(x, y).0[0]
}

/// Nearest-neighbor upsample of a flow field, scaling displacements by
/// `gain` to account for the resolution change.
fn upsample_flow(flow: &FlowField, new_width: u32, new_height: u32, gain: f32) -> FlowField {
    let mut out = FlowField::zeros(new_width, new_height);
    if flow.width() == 0 || flow.height() == 0 {
        return out;
    }

    for y in 0..new_height {
        let sy = ((y as u64 * flow.height() as u64) / new_height as u64) as u32;
        for x in 0..new_width {
            let sx = ((x as u64 * flow.width() as u64) / new_width as u64) as u32;
            let (dx, dy) = flow.get(sx.min(flow.width() - 1), sy.min(flow.height() - 1));
            out.set(x, y, dx * gain, dy * gain);
        }
    }

    out
}
