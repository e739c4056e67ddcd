use std::ops::Range;

use rayon::prelude::*;

use crate::codec::bits::BitSequence;
use crate::foundation::core::FrameGeometry;
use crate::foundation::error::{BitreelError, BitreelResult};
use crate::raster::palette::PixelLabel;
use crate::raster::threading::Threading;

/// One raster frame as opaque RGBA8 pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
}

impl Frame {
    /// Wrap an RGBA8 buffer, checking its length against the dimensions.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> BitreelResult<Self> {
        let geom = FrameGeometry::new(width, height)?;
        if data.len() != geom.rgba_len() {
            return Err(BitreelError::validation(format!(
                "frame data is {} bytes, expected {} for {}x{} rgba8",
                data.len(),
                geom.rgba_len(),
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Frame with every pixel set to `label`'s color.
    pub fn filled(geom: FrameGeometry, label: PixelLabel) -> Self {
        let px = label.rgba();
        let mut data = vec![0u8; geom.rgba_len()];
        for dst in data.chunks_exact_mut(4) {
            dst.copy_from_slice(&px);
        }
        Self {
            width: geom.width,
            height: geom.height,
            data,
        }
    }

    /// Dimensions of this frame.
    pub fn geometry(&self) -> FrameGeometry {
        FrameGeometry {
            width: self.width,
            height: self.height,
        }
    }

    /// RGB of the pixel at `(x, y)`.
    pub fn rgb_at(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let off = (y as usize * self.width as usize + x as usize) * 4;
        Some([self.data[off], self.data[off + 1], self.data[off + 2]])
    }

    /// Overwrite the pixel at `(x, y)` with an opaque RGB color.
    pub fn set_rgb(&mut self, x: u32, y: u32, rgb: [u8; 3]) -> BitreelResult<()> {
        if x >= self.width || y >= self.height {
            return Err(BitreelError::validation(format!(
                "pixel ({x}, {y}) is outside {}x{}",
                self.width, self.height
            )));
        }
        let off = (y as usize * self.width as usize + x as usize) * 4;
        self.data[off..off + 3].copy_from_slice(&rgb);
        self.data[off + 3] = 255;
        Ok(())
    }
}

/// Lay `bits` out over as many frames as needed, in raster order.
///
/// Produces exactly `ceil(bits.len() / capacity)` frames (none for an empty sequence). Pixels
/// past the last bit are padding.
#[tracing::instrument(skip(bits, threading), fields(bits = bits.len()))]
pub fn rasterize(
    bits: &BitSequence,
    geom: FrameGeometry,
    threading: &Threading,
) -> BitreelResult<Vec<Frame>> {
    geom.validate()?;
    let count = geom.frames_for_bits(bits.len());
    let pool = threading.pool_for(count)?;
    let frames = rasterize_range(bits, geom, 0..count, pool.as_ref());
    tracing::debug!(frames = frames.len(), "rasterized frames");
    Ok(frames)
}

/// Build frames `range` of `bits`. Indices past the last bit yield all-padding frames.
pub(crate) fn rasterize_range(
    bits: &BitSequence,
    geom: FrameGeometry,
    range: Range<usize>,
    pool: Option<&rayon::ThreadPool>,
) -> Vec<Frame> {
    let render = |idx: usize| rasterize_one(bits, geom, idx);
    match pool {
        Some(pool) if range.len() > 1 => {
            pool.install(|| range.into_par_iter().map(render).collect())
        }
        _ => range.map(render).collect(),
    }
}

fn rasterize_one(bits: &BitSequence, geom: FrameGeometry, idx: usize) -> Frame {
    let cap = geom.capacity_bits();
    let start = idx * cap;
    let mut data = vec![0u8; geom.rgba_len()];
    for (p, dst) in data.chunks_exact_mut(4).enumerate() {
        let label = match bits.get(start + p) {
            Some(bit) => PixelLabel::Bit(bit),
            None => PixelLabel::Pad,
        };
        dst.copy_from_slice(&label.rgba());
    }
    Frame {
        width: geom.width,
        height: geom.height,
        data,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/frame.rs"]
mod tests;
