use std::path::{Path, PathBuf};

use anyhow::Context as _;
use image::RgbImage;

use crate::foundation::{
    core::FrameIndex,
    error::{BelleError, BelleResult},
};

/// Consumer of saved frames, in the order they are saved.
pub trait FrameSink {
    /// Frames persisted so far; also the index the next frame will receive.
    fn frames_written(&self) -> u64;
    /// Persist one frame and return its index.
    fn write_frame(&mut self, frame: &RgbImage) -> BelleResult<FrameIndex>;
}

/// Writes frames as `<dir>/<zero-padded index>.png`.
///
/// The directory is owned exclusively: it is wiped and recreated on construction.
#[derive(Debug)]
pub struct PngSequenceSink {
    dir: PathBuf,
    digits: usize,
    written: u64,
}

impl PngSequenceSink {
    /// Default zero-padded width of frame file names.
    pub const DEFAULT_DIGITS: usize = 10;

    /// Delete `dir` if it exists, then create it empty.
    pub fn create(dir: impl Into<PathBuf>, digits: usize) -> BelleResult<Self> {
        let dir = dir.into();
        if digits == 0 {
            return Err(BelleError::validation("frame digit count must be > 0"));
        }
        if dir.exists() {
            std::fs::remove_dir_all(&dir)
                .with_context(|| format!("remove frame directory '{}'", dir.display()))?;
        }
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("create frame directory '{}'", dir.display()))?;
        Ok(Self {
            dir,
            digits,
            written: 0,
        })
    }

    /// Directory receiving the frames.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Zero-padded width of frame file names.
    pub fn digits(&self) -> usize {
        self.digits
    }

    /// File path of frame `idx`.
    pub fn frame_path(&self, idx: FrameIndex) -> PathBuf {
        self.dir
            .join(format!("{:0width$}.png", idx.0, width = self.digits))
    }

    /// printf-style input pattern for ffmpeg, e.g. `frames/%010d.png`.
    pub fn ffmpeg_pattern(&self) -> PathBuf {
        self.dir.join(format!("%0{}d.png", self.digits))
    }

    /// Delete the frame directory and everything in it.
    pub fn remove(self) -> BelleResult<()> {
        std::fs::remove_dir_all(&self.dir)
            .with_context(|| format!("remove frame directory '{}'", self.dir.display()))?;
        Ok(())
    }
}

impl FrameSink for PngSequenceSink {
    fn frames_written(&self) -> u64 {
        self.written
    }

    fn write_frame(&mut self, frame: &RgbImage) -> BelleResult<FrameIndex> {
        let idx = FrameIndex(self.written);
        let path = self.frame_path(idx);
        frame
            .save_with_format(&path, image::ImageFormat::Png)
            .with_context(|| format!("write png '{}'", path.display()))?;
        self.written += 1;
        Ok(idx)
    }
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    frames: Vec<RgbImage>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames in save order.
    pub fn frames(&self) -> &[RgbImage] {
        &self.frames
    }
}

impl FrameSink for InMemorySink {
    fn frames_written(&self) -> u64 {
        self.frames.len() as u64
    }

    fn write_frame(&mut self, frame: &RgbImage) -> BelleResult<FrameIndex> {
        self.frames.push(frame.clone());
        Ok(FrameIndex(self.frames.len() as u64 - 1))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
