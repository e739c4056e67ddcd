use std::path::Path;

use anyhow::Context as _;

use crate::foundation::core::{Fps, FrameGeometry};
use crate::foundation::error::{BitreelError, BitreelResult};
use crate::raster::threading::Threading;

/// Lossless video codec used when frames are handed to `ffmpeg`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoCodec {
    /// FFV1 in Matroska, `bgr0` pixels.
    #[default]
    Ffv1,
    /// `libx264rgb` at `-qp 0` in MP4, `rgb24` pixels.
    X264rgb,
}

impl VideoCodec {
    /// File extension matching the container this codec is written into.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Ffv1 => "mkv",
            Self::X264rgb => "mp4",
        }
    }

    pub(crate) fn ffmpeg_output_args(self) -> &'static [&'static str] {
        match self {
            Self::Ffv1 => &[
                "-c:v",
                "ffv1",
                "-level",
                "3",
                "-pix_fmt",
                "bgr0",
                "-f",
                "matroska",
            ],
            Self::X264rgb => &[
                "-c:v",
                "libx264rgb",
                "-qp",
                "0",
                "-preset",
                "veryfast",
                "-pix_fmt",
                "rgb24",
                "-f",
                "mp4",
            ],
        }
    }
}

impl std::str::FromStr for VideoCodec {
    type Err = BitreelError;

    fn from_str(s: &str) -> BitreelResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ffv1" => Ok(Self::Ffv1),
            "x264rgb" | "libx264rgb" => Ok(Self::X264rgb),
            _ => Err(BitreelError::validation(format!(
                "unknown video codec '{s}' (expected ffv1 or x264rgb)"
            ))),
        }
    }
}

/// Options for one encode or decode run.
///
/// Every field has a default, so a JSON config file only needs the fields it changes.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CodecOpts {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Output frame rate.
    pub fps: Fps,
    /// Video codec for `ffmpeg` output.
    pub codec: VideoCodec,
    /// Spread rasterizing/sampling across a rayon pool.
    pub parallel: bool,
    /// Frames built or sampled per batch; bounds how many frames are held in memory.
    pub chunk_size: usize,
    /// Explicit worker count; `None` uses rayon defaults.
    pub threads: Option<usize>,
}

impl Default for CodecOpts {
    fn default() -> Self {
        Self {
            width: FrameGeometry::DEFAULT.width,
            height: FrameGeometry::DEFAULT.height,
            fps: Fps::default(),
            codec: VideoCodec::default(),
            parallel: true,
            chunk_size: Threading::default().chunk_size,
            threads: None,
        }
    }
}

impl CodecOpts {
    /// Load options from a JSON file; missing fields keep their defaults.
    pub fn from_json_file(path: &Path) -> BitreelResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read codec config '{}'", path.display()))?;
        let opts: Self = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse codec config '{}'", path.display()))?;
        opts.validate()?;
        Ok(opts)
    }

    /// Check geometry, frame rate and threading.
    pub fn validate(&self) -> BitreelResult<()> {
        self.geometry().validate()?;
        Fps::new(self.fps.num, self.fps.den)?;
        if self.codec == VideoCodec::X264rgb
            && (!self.width.is_multiple_of(2) || !self.height.is_multiple_of(2))
        {
            return Err(BitreelError::validation(
                "x264rgb output needs even width/height",
            ));
        }
        self.threading().validate()
    }

    /// Frame dimensions.
    pub fn geometry(&self) -> FrameGeometry {
        FrameGeometry {
            width: self.width,
            height: self.height,
        }
    }

    /// Threading controls derived from `parallel`/`chunk_size`/`threads`.
    pub fn threading(&self) -> Threading {
        Threading {
            parallel: self.parallel,
            chunk_size: self.chunk_size,
            threads: self.threads,
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config/opts.rs"]
mod tests;
