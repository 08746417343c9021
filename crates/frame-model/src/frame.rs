//! Video frames and dense motion fields.

use image::{GrayImage, RgbImage};

/// A single decoded video frame.
///
/// Frames are ephemeral: the pipeline owns one frame for the duration of a
/// single iteration plus one look-back (the retained previous frame used by
/// anomaly detection).
#[derive(Debug, Clone)]
pub struct Frame {
    /// Zero-based position in capture order.
    pub index: u64,

    /// RGB pixel data, height x width x 3.
    pub pixels: RgbImage,
}

impl Frame {
    /// Create a frame from an RGB buffer.
    pub fn new(index: u64, pixels: RgbImage) -> Self {
        Self { index, pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Single-channel intensity image used by optical flow.
    pub fn to_gray(&self) -> GrayImage {
        image::imageops::grayscale(&self.pixels)
    }
}

/// Dense per-pixel 2D displacement field between two consecutive frames.
///
/// Same spatial dimensions as the frames it was computed from. Displacement
/// units are pixels per frame.
#[derive(Debug, Clone)]
pub struct FlowField {
    width: u32,
    height: u32,
    dx: Vec<f32>,
    dy: Vec<f32>,
}

impl FlowField {
    /// Create a zero-motion field of the given dimensions.
    pub fn zeros(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            dx: vec![0.0; len],
            dy: vec![0.0; len],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn idx(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y as usize * self.width as usize + x as usize
    }

    /// Displacement vector at a pixel.
    pub fn get(&self, x: u32, y: u32) -> (f32, f32) {
        let i = self.idx(x, y);
        (self.dx[i], self.dy[i])
    }

    pub fn set(&mut self, x: u32, y: u32, dx: f32, dy: f32) {
        let i = self.idx(x, y);
        self.dx[i] = dx;
        self.dy[i] = dy;
    }

    /// Displacement magnitude at a pixel.
    pub fn magnitude_at(&self, x: u32, y: u32) -> f32 {
        let (dx, dy) = self.get(x, y);
        (dx * dx + dy * dy).sqrt()
    }

    /// Maximum displacement magnitude over the whole field.
    ///
    /// Returns 0.0 for an empty field.
    pub fn max_magnitude(&self) -> f32 {
        self.dx
            .iter()
            .zip(&self.dy)
            .map(|(dx, dy)| (dx * dx + dy * dy).sqrt())
            .fold(0.0_f32, f32::max)
    }
}
