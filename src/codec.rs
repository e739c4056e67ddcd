//! Byte-level half of the codec: record framing and bit packing.

pub(crate) mod bits;
pub(crate) mod record;
