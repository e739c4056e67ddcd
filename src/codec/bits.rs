use crate::foundation::error::{BitreelError, BitreelResult};

/// Ordered sequence of bits, stored packed MSB-first.
///
/// Bit `i` lives in byte `i / 8` at position `7 - i % 8`, so a sequence built from bytes reads
/// back as each byte expanded most-significant bit first. Trailing bits of the last byte beyond
/// `len` are always zero.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BitSequence {
    bytes: Vec<u8>,
    len: usize,
}

impl BitSequence {
    /// Create an empty sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Expand `bytes` into `8 * bytes.len()` bits.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let len = bytes.len() * 8;
        Self { bytes, len }
    }

    /// Number of bits.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Return `true` when the sequence holds no bits.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bit at `idx`, or `None` past the end.
    pub fn get(&self, idx: usize) -> Option<bool> {
        if idx >= self.len {
            return None;
        }
        Some(self.bytes[idx / 8] & (0x80 >> (idx % 8)) != 0)
    }

    /// Append one bit.
    pub fn push(&mut self, bit: bool) {
        let pos = self.len % 8;
        if pos == 0 {
            self.bytes.push(0);
        }
        if bit && let Some(last) = self.bytes.last_mut() {
            *last |= 0x80 >> pos;
        }
        self.len += 1;
    }

    /// Iterate bits in order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(move |i| self.bytes[i / 8] & (0x80 >> (i % 8)) != 0)
    }

    /// Pack back into bytes.
    ///
    /// Fails with [`BitreelError::TruncatedStream`] when the length is not a multiple of 8.
    pub fn into_bytes(self) -> BitreelResult<Vec<u8>> {
        if !self.len.is_multiple_of(8) {
            return Err(BitreelError::TruncatedStream { bits: self.len });
        }
        Ok(self.bytes)
    }
}

impl Extend<bool> for BitSequence {
    fn extend<I: IntoIterator<Item = bool>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.bytes.reserve(iter.size_hint().0.div_ceil(8));
        for bit in iter {
            self.push(bit);
        }
    }
}

impl FromIterator<bool> for BitSequence {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let mut seq = Self::new();
        seq.extend(iter);
        seq
    }
}

#[cfg(test)]
#[path = "../../tests/unit/codec/bits.rs"]
mod tests;
