use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::encode::ffmpeg::ensure_dir;
use crate::encode::sink::{FrameOrder, FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{BitreelError, BitreelResult};
use crate::raster::frame::Frame;

const FRAME_PREFIX: &str = "frame_";

/// Sink that writes each frame as `frame_<index>.png` into a directory.
pub struct PngDirSink {
    dir: PathBuf,
    cfg: Option<SinkConfig>,
    order: FrameOrder,
    written: Vec<PathBuf>,
}

impl PngDirSink {
    /// Create a sink writing into `dir` (created on `begin`).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cfg: None,
            order: FrameOrder::default(),
            written: Vec::new(),
        }
    }

    /// Paths written so far, in frame order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

/// Path of frame `idx` inside `dir`.
pub fn png_frame_path(dir: &Path, idx: FrameIndex) -> PathBuf {
    dir.join(format!("{FRAME_PREFIX}{}.png", idx.0))
}

impl FrameSink for PngDirSink {
    fn begin(&mut self, cfg: SinkConfig) -> BitreelResult<()> {
        cfg.geometry.validate()?;
        ensure_dir(&self.dir)?;
        self.cfg = Some(cfg);
        self.order = FrameOrder::default();
        self.written.clear();
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &Frame) -> BitreelResult<()> {
        let cfg = self
            .cfg
            .ok_or_else(|| BitreelError::validation("png sink not started"))?;
        self.order.check(&cfg, idx, frame)?;

        let path = png_frame_path(&self.dir, idx);
        image::save_buffer_with_format(
            &path,
            &frame.data,
            frame.width,
            frame.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        self.written.push(path);
        Ok(())
    }

    fn end(&mut self) -> BitreelResult<()> {
        tracing::debug!(frames = self.written.len(), dir = %self.dir.display(), "wrote png frames");
        self.cfg = None;
        Ok(())
    }
}

/// Load a `frame_<index>.png` dump back into frames, ordered by numeric index.
///
/// Files that do not follow the naming pattern are ignored.
pub fn read_png_frames(dir: &Path) -> BitreelResult<Vec<Frame>> {
    let mut indexed = Vec::new();
    let listing =
        std::fs::read_dir(dir).with_context(|| format!("list frames in '{}'", dir.display()))?;
    for item in listing {
        let item = item.with_context(|| format!("list frames in '{}'", dir.display()))?;
        let file_name = item.file_name();
        let Some(idx) = file_name
            .to_str()
            .and_then(|n| n.strip_prefix(FRAME_PREFIX))
            .and_then(|n| n.strip_suffix(".png"))
            .and_then(|n| n.parse::<u64>().ok())
        else {
            continue;
        };
        indexed.push((idx, item.path()));
    }
    indexed.sort_by_key(|(idx, _)| *idx);

    let mut frames = Vec::with_capacity(indexed.len());
    for (_, path) in indexed {
        let img = image::open(&path)
            .with_context(|| format!("decode png '{}'", path.display()))?
            .to_rgba8();
        let (width, height) = img.dimensions();
        frames.push(Frame::from_rgba(width, height, img.into_raw())?);
    }
    Ok(frames)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
