/// Convenience result type used across the public API.
pub type BitreelResult<T> = Result<T, BitreelError>;

/// Error type shared by every codec stage and collaborator wrapper.
///
/// The first six variants are the codec taxonomy proper: they tell a caller *which* stage gave
/// up and why. `Validation`, `Media` and `Other` cover options, external tools and plain I/O.
#[derive(thiserror::Error, Debug)]
pub enum BitreelError {
    /// An entry cannot be framed (empty, oversized or non-UTF-8 name).
    #[error("invalid entry: {0}")]
    InvalidEntry(String),

    /// Entry content does not fit the record length prefix.
    #[error("content too large: entry '{name}' has {len} bytes")]
    ContentTooLarge {
        /// Offending entry name.
        name: String,
        /// Content length in bytes.
        len: usize,
    },

    /// Retained data bits do not form whole bytes.
    #[error("truncated stream: {bits} data bits is not a whole number of bytes")]
    TruncatedStream {
        /// Number of bits left after dropping padding.
        bits: usize,
    },

    /// A record boundary did not start with the record sentinel.
    #[error("missing record header at byte offset {offset}")]
    MissingHeader {
        /// Byte offset of the expected header.
        offset: usize,
    },

    /// A record header or body runs past the end of the stream.
    #[error("truncated record at byte offset {offset}: need {needed} bytes, {remaining} remain")]
    TruncatedRecord {
        /// Byte offset of the field being read.
        offset: usize,
        /// Bytes the field requires.
        needed: u64,
        /// Bytes actually left in the stream.
        remaining: usize,
    },

    /// The archive collaborator rejected its input.
    #[error("corrupt archive: {0}")]
    CorruptArchive(String),

    /// Options or frame geometry are unusable.
    #[error("validation error: {0}")]
    Validation(String),

    /// `ffmpeg`/`ffprobe` could not be run or reported a failure.
    #[error("media error: {0}")]
    Media(String),

    /// Any other failure, mostly I/O with context attached.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BitreelError {
    /// Build a [`BitreelError::InvalidEntry`] value.
    pub fn invalid_entry(msg: impl Into<String>) -> Self {
        Self::InvalidEntry(msg.into())
    }

    /// Build a [`BitreelError::CorruptArchive`] value.
    pub fn corrupt_archive(msg: impl Into<String>) -> Self {
        Self::CorruptArchive(msg.into())
    }

    /// Build a [`BitreelError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`BitreelError::Media`] value.
    pub fn media(msg: impl Into<String>) -> Self {
        Self::Media(msg.into())
    }

    /// Return `true` for errors that mean the frames did not come from this codec, or were
    /// damaged on the way back.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::TruncatedStream { .. } | Self::MissingHeader { .. } | Self::TruncatedRecord { .. }
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
