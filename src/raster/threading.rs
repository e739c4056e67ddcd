use std::ops::Range;

use crate::foundation::error::{BitreelError, BitreelResult};

/// Frame-level parallelism and batching controls for rasterizing and sampling.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Threading {
    /// Spread frames across a rayon pool when `true`.
    pub parallel: bool,
    /// Frames built (or sampled) per batch before they are handed on. `0` is treated as `1`.
    pub chunk_size: usize,
    /// Optional explicit worker thread count. `None` uses rayon defaults.
    pub threads: Option<usize>,
}

impl Default for Threading {
    fn default() -> Self {
        Self {
            parallel: true,
            chunk_size: 64,
            threads: None,
        }
    }
}

impl Threading {
    /// Single-threaded processing.
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    /// Reject `threads == Some(0)`.
    pub fn validate(&self) -> BitreelResult<()> {
        if let Some(n) = self.threads
            && n == 0
        {
            return Err(BitreelError::validation(
                "threading 'threads' must be >= 1 when set",
            ));
        }
        Ok(())
    }

    /// Pool to run frame work on, or `None` when the work should stay on the caller's thread.
    pub(crate) fn pool_for(&self, frames: usize) -> BitreelResult<Option<rayon::ThreadPool>> {
        self.validate()?;
        if !self.parallel || frames < 2 {
            return Ok(None);
        }
        build_thread_pool(self.threads).map(Some)
    }

    /// Batches of at most `chunk_size` consecutive frame indices covering `0..frames`.
    pub(crate) fn chunk_ranges(&self, frames: usize) -> impl Iterator<Item = Range<usize>> {
        let size = normalized_chunk_size(self.chunk_size);
        (0..frames)
            .step_by(size)
            .map(move |start| start..(start + size).min(frames))
    }

    pub(crate) fn batch_len(&self) -> usize {
        normalized_chunk_size(self.chunk_size)
    }
}

fn normalized_chunk_size(chunk_size: usize) -> usize {
    if chunk_size == 0 { 1 } else { chunk_size }
}

fn build_thread_pool(threads: Option<usize>) -> BitreelResult<rayon::ThreadPool> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| {
            BitreelError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}"))
        })
}

#[cfg(test)]
#[path = "../../tests/unit/raster/threading.rs"]
mod tests;
