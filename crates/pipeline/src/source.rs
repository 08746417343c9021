//! Frame sources.
//!
//! Container demuxing is out of scope: the pipeline consumes frames through
//! the `FrameSource` trait, and the shipped backend reads a directory of
//! demuxed frame images in lexical order. Sources own their handles and
//! release them on drop, whichever way processing ends.

use std::path::{Path, PathBuf};

use framewatch_common::error::{FramewatchError, FramewatchResult};
use framewatch_frame_model::Frame;

/// A sequential, ordered stream of video frames.
pub trait FrameSource {
    /// Read the next frame in capture order. `None` means the stream is
    /// exhausted, which is expected termination rather than an error.
    fn next_frame(&mut self) -> FramewatchResult<Option<Frame>>;

    /// Total frame count when known up front. Used for progress reporting
    /// only, never for correctness.
    fn total_frames(&self) -> Option<u64>;

    /// Source name for logging.
    fn name(&self) -> &str;
}

const FRAME_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// Reads demuxed frames from a directory of numbered image files.
#[derive(Debug)]
pub struct ImageSequenceSource {
    paths: Vec<PathBuf>,
    index: usize,
}

impl ImageSequenceSource {
    /// Open a frame directory. Fails when the directory is unreadable or
    /// holds no frame images, since there is nothing to process either way.
    pub fn open(dir: &Path) -> FramewatchResult<Self> {
        let entries = std::fs::read_dir(dir).map_err(|e| {
            FramewatchError::source(format!("Failed to open {}: {e}", dir.display()))
        })?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| {
                        let ext = ext.to_ascii_lowercase();
                        FRAME_EXTENSIONS.iter().any(|known| *known == ext)
                    })
                    .unwrap_or(false)
            })
            .collect();
        paths.sort();

        if paths.is_empty() {
            return Err(FramewatchError::source(format!(
                "No frame images found in {}",
                dir.display()
            )));
        }

        tracing::info!(frames = paths.len(), dir = %dir.display(), "Opened frame sequence");

        Ok(Self { paths, index: 0 })
    }
}

impl FrameSource for ImageSequenceSource {
    fn next_frame(&mut self) -> FramewatchResult<Option<Frame>> {
        let Some(path) = self.paths.get(self.index) else {
            return Ok(None);
        };

        let pixels = image::open(path)
            .map_err(|e| {
                FramewatchError::source(format!("Failed to read {}: {e}", path.display()))
            })?
            .to_rgb8();

        let frame = Frame::new(self.index as u64, pixels);
        self.index += 1;
        Ok(Some(frame))
    }

    fn total_frames(&self) -> Option<u64> {
        Some(self.paths.len() as u64)
    }

    fn name(&self) -> &str {
        "image-sequence"
    }
}

/// In-memory source for tests and synthetic streams.
pub struct MemorySource {
    frames: std::vec::IntoIter<Frame>,
    total: u64,
}

impl MemorySource {
    pub fn new(frames: Vec<Frame>) -> Self {
        let total = frames.len() as u64;
        Self {
            frames: frames.into_iter(),
            total,
        }
    }
}

impl FrameSource for MemorySource {
    fn next_frame(&mut self) -> FramewatchResult<Option<Frame>> {
        Ok(self.frames.next())
    }

    fn total_frames(&self) -> Option<u64> {
        Some(self.total)
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_open_missing_directory_is_source_error() {
        let err = ImageSequenceSource::open(Path::new("/nonexistent-frames")).unwrap_err();
        assert!(matches!(err, FramewatchError::Source { .. }));
    }

    #[test]
    fn test_empty_directory_is_source_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ImageSequenceSource::open(dir.path()).unwrap_err();
        assert!(matches!(err, FramewatchError::Source { .. }));
    }

    #[test]
    fn test_frames_come_back_in_lexical_order() {
        let dir = tempfile::tempdir().unwrap();
        for (name, value) in [("frame_0002.png", 20u8), ("frame_0000.png", 0), ("frame_0001.png", 10)] {
            let img = RgbImage::from_pixel(4, 4, Rgb([value, value, value]));
            img.save(dir.path().join(name)).unwrap();
        }
        // A non-frame file must be ignored.
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let mut source = ImageSequenceSource::open(dir.path()).unwrap();
        assert_eq!(source.total_frames(), Some(3));

        for expected in [0u8, 10, 20] {
            let frame = source.next_frame().unwrap().unwrap();
            assert_eq!(frame.pixels.get_pixel(0, 0).0[0], expected);
        }
        assert!(source.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_unreadable_frame_is_source_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("frame_0000.png"), "not an image").unwrap();

        let mut source = ImageSequenceSource::open(dir.path()).unwrap();
        let err = source.next_frame().unwrap_err();
        assert!(matches!(err, FramewatchError::Source { .. }));
    }

    #[test]
    fn test_memory_source_exhausts_cleanly() {
        let frames = vec![
            Frame::new(0, RgbImage::from_pixel(2, 2, Rgb([0, 0, 0]))),
            Frame::new(1, RgbImage::from_pixel(2, 2, Rgb([1, 1, 1]))),
        ];
        let mut source = MemorySource::new(frames);
        assert_eq!(source.total_frames(), Some(2));
        assert!(source.next_frame().unwrap().is_some());
        assert!(source.next_frame().unwrap().is_some());
        assert!(source.next_frame().unwrap().is_none());
    }
}
