//! Pixel-level half of the codec: bits to frames and frames back to bits.

pub(crate) mod frame;
pub(crate) mod palette;
pub(crate) mod sample;
pub(crate) mod threading;
