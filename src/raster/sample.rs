use rayon::prelude::*;

use crate::codec::bits::BitSequence;
use crate::foundation::error::BitreelResult;
use crate::raster::frame::Frame;
use crate::raster::palette::PixelLabel;
use crate::raster::threading::Threading;

/// Labels for every pixel of `frame`, row-major.
pub fn sample_frame(frame: &Frame) -> Vec<PixelLabel> {
    sample_frame_counting(frame).0
}

/// Sample `frame` and count pixels whose color matched none of the reserved values.
fn sample_frame_counting(frame: &Frame) -> (Vec<PixelLabel>, usize) {
    let mut foreign = 0usize;
    let labels = frame
        .data
        .chunks_exact(4)
        .map(|px| match PixelLabel::classify([px[0], px[1], px[2]]) {
            Some(label) => label,
            None => {
                foreign += 1;
                PixelLabel::Pad
            }
        })
        .collect();
    (labels, foreign)
}

fn sample_batch(
    frames: &[Frame],
    pool: Option<&rayon::ThreadPool>,
) -> Vec<(Vec<PixelLabel>, usize)> {
    match pool {
        Some(pool) if frames.len() > 1 => {
            pool.install(|| frames.par_iter().map(sample_frame_counting).collect())
        }
        _ => frames.iter().map(sample_frame_counting).collect(),
    }
}

fn warn_foreign(foreign: usize) {
    if foreign > 0 {
        tracing::warn!(
            foreign,
            "pixels matched no reserved color and were treated as padding"
        );
    }
}

/// Labels for all frames, concatenated in frame order.
#[tracing::instrument(skip(frames, threading), fields(frames = frames.len()))]
pub fn sample_frames(frames: &[Frame], threading: &Threading) -> BitreelResult<Vec<PixelLabel>> {
    let pool = threading.pool_for(frames.len())?;
    let per_frame = sample_batch(frames, pool.as_ref());

    let total = per_frame.iter().map(|(labels, _)| labels.len()).sum();
    let mut out = Vec::with_capacity(total);
    let mut foreign = 0usize;
    for (labels, n) in per_frame {
        out.extend(labels);
        foreign += n;
    }
    warn_foreign(foreign);
    Ok(out)
}

/// Drop every [`PixelLabel::Pad`] and pack the remaining bits into bytes.
///
/// Padding is dropped wherever it appears, not only as a trailing run. Fails with
/// [`crate::BitreelError::TruncatedStream`] when the kept bits do not form whole bytes.
pub fn reassemble(labels: &[PixelLabel]) -> BitreelResult<Vec<u8>> {
    let bits: BitSequence = labels.iter().filter_map(|l| l.bit()).collect();
    tracing::debug!(bits = bits.len(), pixels = labels.len(), "reassembled bits");
    bits.into_bytes()
}

/// Bytes recovered from a frame stream.
#[derive(Debug)]
pub(crate) struct SampledStream {
    pub(crate) bytes: Vec<u8>,
    pub(crate) frames: usize,
}

/// Sample and reassemble frames as they arrive, `chunk_size` at a time.
///
/// Only the current batch of frames and its labels are held; data bits accumulate packed. The
/// first error from `frames` stops the run.
pub(crate) fn sample_stream<I>(frames: I, threading: &Threading) -> BitreelResult<SampledStream>
where
    I: Iterator<Item = BitreelResult<Frame>>,
{
    let mut frames = frames;
    let batch_len = threading.batch_len();
    let pool = threading.pool_for(batch_len)?;

    let mut bits = BitSequence::new();
    let mut batch = Vec::with_capacity(batch_len);
    let (mut count, mut pixels, mut foreign) = (0usize, 0usize, 0usize);
    loop {
        batch.clear();
        for frame in frames.by_ref().take(batch_len) {
            batch.push(frame?);
        }
        if batch.is_empty() {
            break;
        }
        count += batch.len();
        for (labels, n) in sample_batch(&batch, pool.as_ref()) {
            pixels += labels.len();
            foreign += n;
            bits.extend(labels.iter().filter_map(|l| l.bit()));
        }
    }

    warn_foreign(foreign);
    tracing::debug!(frames = count, bits = bits.len(), pixels, "reassembled bits");
    Ok(SampledStream {
        bytes: bits.into_bytes()?,
        frames: count,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/raster/sample.rs"]
mod tests;
