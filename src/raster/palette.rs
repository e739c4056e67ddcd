/// Pixel color for a `1` bit (pure black).
pub const INK_RGB: [u8; 3] = [0, 0, 0];
/// Pixel color for a `0` bit (pure white).
pub const PAPER_RGB: [u8; 3] = [255, 255, 255];
/// Pixel color for "no data" (`#008000`), used to fill the tail of the last frame.
pub const PADDING_RGB: [u8; 3] = [0, 128, 0];

/// What a single pixel carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelLabel {
    /// One data bit.
    Bit(bool),
    /// No data.
    Pad,
}

impl PixelLabel {
    /// Opaque RGBA8 color that encodes this label.
    pub fn rgba(self) -> [u8; 4] {
        let [r, g, b] = match self {
            Self::Bit(true) => INK_RGB,
            Self::Bit(false) => PAPER_RGB,
            Self::Pad => PADDING_RGB,
        };
        [r, g, b, 255]
    }

    /// Classify a pixel by exact RGB equality; alpha is ignored.
    ///
    /// Returns `None` for any color that is not one of the three reserved values.
    pub fn classify(rgb: [u8; 3]) -> Option<Self> {
        match rgb {
            INK_RGB => Some(Self::Bit(true)),
            PAPER_RGB => Some(Self::Bit(false)),
            PADDING_RGB => Some(Self::Pad),
            _ => None,
        }
    }

    /// Like [`PixelLabel::classify`], but foreign colors become [`PixelLabel::Pad`].
    pub fn from_rgb(rgb: [u8; 3]) -> Self {
        Self::classify(rgb).unwrap_or(Self::Pad)
    }

    /// The data bit, if any.
    pub fn bit(self) -> Option<bool> {
        match self {
            Self::Bit(b) => Some(b),
            Self::Pad => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/palette.rs"]
mod tests;
