use std::path::{Path, PathBuf};

use crate::{
    foundation::error::{SketchError, SketchResult},
    render::frame::FrameRGBA,
};

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
}

/// Sink contract for consuming rendered frames.
///
/// Ordering contract: `push_frame` is called with strictly increasing indices starting at 0.
pub trait FrameSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> SketchResult<()>;
    /// Push one frame.
    fn push_frame(&mut self, idx: u64, frame: &FrameRGBA) -> SketchResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> SketchResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(u64, FrameRGBA)>,
    ended: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Captured frames in push order.
    pub fn frames(&self) -> &[(u64, FrameRGBA)] {
        &self.frames
    }

    /// Whether `end` was called.
    pub fn ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> SketchResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: u64, frame: &FrameRGBA) -> SketchResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> SketchResult<()> {
        self.ended = true;
        Ok(())
    }
}

/// Writes each frame to `<dir>/<prefix>-NNNN.png`.
#[derive(Debug)]
pub struct PngSequenceSink {
    dir: PathBuf,
    prefix: String,
    written: Vec<PathBuf>,
}

impl PngSequenceSink {
    /// Sink writing `frame-0000.png`, `frame-0001.png`, ... into `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_prefix(dir, "frame")
    }

    /// Sink with a custom file name prefix.
    pub fn with_prefix(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
            written: Vec::new(),
        }
    }

    /// Path the frame with index `idx` is written to.
    pub fn frame_path(&self, idx: u64) -> PathBuf {
        self.dir.join(format!("{}-{idx:04}.png", self.prefix))
    }

    /// Files written so far.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl FrameSink for PngSequenceSink {
    fn begin(&mut self, _cfg: SinkConfig) -> SketchResult<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            SketchError::io(format!("create output dir '{}': {e}", self.dir.display()))
        })?;
        self.written.clear();
        Ok(())
    }

    fn push_frame(&mut self, idx: u64, frame: &FrameRGBA) -> SketchResult<()> {
        let path = self.frame_path(idx);
        write_png(&path, frame)?;
        tracing::info!(path = %path.display(), "wrote frame");
        self.written.push(path);
        Ok(())
    }

    fn end(&mut self) -> SketchResult<()> {
        Ok(())
    }
}

/// Encode `frame` as an RGBA8 PNG, creating parent directories as needed.
pub fn write_png(path: &Path, frame: &FrameRGBA) -> SketchResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            SketchError::io(format!("create output dir '{}': {e}", parent.display()))
        })?;
    }

    image::save_buffer_with_format(
        path,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|e| SketchError::io(format!("write png '{}': {e}", path.display())))
}
