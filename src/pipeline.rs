use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Context as _;

use crate::archive::{read_zip_entries, write_zip_entries};
use crate::codec::record::{ArchiveEntry, assemble_bits, demux_records};
use crate::config::CodecOpts;
use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, ensure_parent_dir};
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{FrameGeometry, FrameIndex};
use crate::foundation::error::BitreelResult;
use crate::media::{decode_video_frames, probe_video};
use crate::raster::frame::{Frame, rasterize, rasterize_range};
use crate::raster::sample::{reassemble, sample_frames, sample_stream};
use crate::raster::threading::Threading;

/// Counters reported by an encode run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct EncodeStats {
    /// Entries framed.
    pub entries: usize,
    /// Framed stream length in bytes (headers included).
    pub stream_bytes: usize,
    /// Frames handed to the sink.
    pub frames: usize,
}

/// Size of one decoded entry.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct EntrySummary {
    /// Entry name.
    pub name: String,
    /// Content length in bytes.
    pub size: usize,
}

/// What a decoded video contains.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct VideoSummary {
    /// Frame dimensions.
    pub geometry: FrameGeometry,
    /// Number of decoded frames.
    pub frames: usize,
    /// Framed stream length in bytes.
    pub stream_bytes: usize,
    /// Entries in encode order.
    pub entries: Vec<EntrySummary>,
}

/// Turn entries into frames without touching any sink.
///
/// Pure: assemble records, expand to bits, rasterize. No entries means no frames.
pub fn encode_frames(entries: &[ArchiveEntry], opts: &CodecOpts) -> BitreelResult<Vec<Frame>> {
    opts.validate()?;
    let bits = assemble_bits(entries)?;
    rasterize(&bits, opts.geometry(), &opts.threading())
}

/// Encode `entries` and stream the frames into `sink`.
///
/// Frames are built `chunk_size` at a time and pushed before the next batch is built, so only
/// one batch is in memory. Entries are validated before the sink is started. At least one frame
/// is always emitted: an empty entry set becomes a single all-padding frame, since a video cannot
/// have zero frames.
#[tracing::instrument(skip(entries, opts, sink), fields(entries = entries.len()))]
pub fn encode_files(
    entries: &[ArchiveEntry],
    opts: &CodecOpts,
    sink: &mut dyn FrameSink,
) -> BitreelResult<EncodeStats> {
    opts.validate()?;
    let bits = assemble_bits(entries)?;
    let geometry = opts.geometry();
    let threading = opts.threading();
    let frames = geometry.frames_for_bits(bits.len()).max(1);
    let pool = threading.pool_for(frames)?;

    sink.begin(SinkConfig {
        geometry,
        fps: opts.fps,
    })?;
    for range in threading.chunk_ranges(frames) {
        let batch = rasterize_range(&bits, geometry, range.clone(), pool.as_ref());
        for (idx, frame) in range.zip(&batch) {
            sink.push_frame(FrameIndex(idx as u64), frame)?;
        }
    }
    sink.end()?;

    let stats = EncodeStats {
        entries: entries.len(),
        stream_bytes: bits.len() / 8,
        frames,
    };
    tracing::info!(
        entries = stats.entries,
        stream_bytes = stats.stream_bytes,
        frames = stats.frames,
        "encoded entries"
    );
    Ok(stats)
}

/// Recover entries from frames: sample, reassemble, demultiplex.
#[tracing::instrument(skip(frames, threading), fields(frames = frames.len()))]
pub fn decode_frames(frames: &[Frame], threading: &Threading) -> BitreelResult<Vec<ArchiveEntry>> {
    let labels = sample_frames(frames, threading)?;
    let bytes = reassemble(&labels)?;
    demux_records(&bytes)
}

/// Decode in-memory frames and describe their contents.
pub fn inspect_frames(frames: &[Frame], threading: &Threading) -> BitreelResult<VideoSummary> {
    let entries = decode_frames(frames, threading)?;
    let geometry = frames
        .first()
        .map(Frame::geometry)
        .unwrap_or(FrameGeometry::DEFAULT);
    Ok(summarize(geometry, frames.len(), &entries))
}

/// Read a zip blob and encode its files into a video at `out_path`.
///
/// The video is written to a hidden sibling file first and renamed into place on success; on
/// any failure the partial file is removed and `out_path` is left untouched.
#[tracing::instrument(skip(zip_blob, opts), fields(out = %out_path.display()))]
pub fn encode_archive_to_video(
    zip_blob: &[u8],
    out_path: &Path,
    opts: &CodecOpts,
) -> BitreelResult<EncodeStats> {
    opts.validate()?;
    let entries = read_zip_entries(zip_blob)?;

    ensure_parent_dir(out_path)?;
    let guard = TempFileGuard::new(partial_path(out_path));
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(guard.path(), opts.codec));
    let stats = encode_files(&entries, opts, &mut sink)?;
    guard.persist(out_path)?;
    Ok(stats)
}

/// Decode a video file back into its entries.
pub fn decode_video(video_path: &Path, opts: &CodecOpts) -> BitreelResult<Vec<ArchiveEntry>> {
    Ok(decode_video_stream(video_path, opts)?.entries)
}

/// Decode a video file and pack its entries into a zip blob.
#[tracing::instrument(skip(opts), fields(video = %video_path.display()))]
pub fn decode_video_to_archive(video_path: &Path, opts: &CodecOpts) -> BitreelResult<Vec<u8>> {
    let entries = decode_video(video_path, opts)?;
    let blob = write_zip_entries(&entries)?;
    tracing::info!(
        entries = entries.len(),
        zip_bytes = blob.len(),
        "decoded video"
    );
    Ok(blob)
}

/// Decode a video and describe its contents.
pub fn inspect_video(video_path: &Path, opts: &CodecOpts) -> BitreelResult<VideoSummary> {
    let decoded = decode_video_stream(video_path, opts)?;
    Ok(summarize(decoded.geometry, decoded.frames, &decoded.entries))
}

fn summarize(geometry: FrameGeometry, frames: usize, entries: &[ArchiveEntry]) -> VideoSummary {
    VideoSummary {
        geometry,
        frames,
        stream_bytes: entries.iter().map(ArchiveEntry::framed_len).sum(),
        entries: entries
            .iter()
            .map(|e| EntrySummary {
                name: e.name.clone(),
                size: e.content.len(),
            })
            .collect(),
    }
}

struct DecodedVideo {
    geometry: FrameGeometry,
    frames: usize,
    entries: Vec<ArchiveEntry>,
}

fn decode_video_stream(video_path: &Path, opts: &CodecOpts) -> BitreelResult<DecodedVideo> {
    opts.validate()?;
    let source = probe_video(video_path)?;
    let frames = decode_video_frames(&source)?;
    let decoded = sample_stream(frames, &opts.threading()).and_then(|stream| {
        Ok(DecodedVideo {
            geometry: source.geometry,
            frames: stream.frames,
            entries: demux_records(&stream.bytes)?,
        })
    });
    if let Err(e) = &decoded
        && e.is_structural()
    {
        tracing::warn!(
            codec = source.codec_name.as_deref().unwrap_or("unknown"),
            error = %e,
            "video frames hold no intact record stream; it may have been re-encoded lossily"
        );
    }
    decoded
}

/// Write `bytes` to `path` through a temporary sibling, so readers never see a partial file.
pub fn write_atomically(path: &Path, bytes: &[u8]) -> BitreelResult<()> {
    ensure_parent_dir(path)?;
    let guard = TempFileGuard::new(partial_path(path));
    std::fs::write(guard.path(), bytes)
        .with_context(|| format!("write '{}'", guard.path().display()))?;
    guard.persist(path)
}

static PARTIAL_SEQ: AtomicU64 = AtomicU64::new(0);

fn partial_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_owned());
    let seq = PARTIAL_SEQ.fetch_add(1, Ordering::Relaxed);
    path.with_file_name(format!(".{name}.{}.{seq}.partial", std::process::id()))
}

/// Removes its file on drop unless persisted.
struct TempFileGuard(Option<PathBuf>);

impl TempFileGuard {
    fn new(path: PathBuf) -> Self {
        Self(Some(path))
    }

    fn path(&self) -> &Path {
        self.0.as_deref().unwrap_or(Path::new(""))
    }

    fn persist(mut self, dest: &Path) -> BitreelResult<()> {
        if let Some(tmp) = self.0.take() {
            if let Err(e) = std::fs::rename(&tmp, dest) {
                let _ = std::fs::remove_file(&tmp);
                return Err(anyhow::Error::new(e)
                    .context(format!("move output into '{}'", dest.display()))
                    .into());
            }
        }
        Ok(())
    }
}

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/pipeline/pipeline.rs"]
mod tests;
