use crate::foundation::error::{BitreelError, BitreelResult};

/// Absolute 0-based frame index within one video.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32, // must be > 0
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> BitreelResult<Self> {
        if den == 0 {
            return Err(BitreelError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(BitreelError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self { num: 10, den: 1 }
    }
}

/// Pixel dimensions of every frame in a video.
///
/// One pixel carries one bit, so a frame holds `width * height` bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameGeometry {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl FrameGeometry {
    /// Default 480p geometry (854x480).
    pub const DEFAULT: Self = Self {
        width: 854,
        height: 480,
    };

    /// Create a validated geometry with non-zero dimensions.
    pub fn new(width: u32, height: u32) -> BitreelResult<Self> {
        let geom = Self { width, height };
        geom.validate()?;
        Ok(geom)
    }

    /// Reject zero-sized frames.
    pub fn validate(self) -> BitreelResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(BitreelError::validation(format!(
                "frame geometry must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Number of pixels (and therefore data bits) per frame.
    pub fn capacity_bits(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Size of one RGBA8 frame buffer in bytes.
    pub fn rgba_len(self) -> usize {
        self.capacity_bits() * 4
    }

    /// Frames needed to carry `bits` data bits: `ceil(bits / capacity)`.
    pub fn frames_for_bits(self, bits: usize) -> usize {
        bits.div_ceil(self.capacity_bits())
    }
}

impl Default for FrameGeometry {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
