//! bitreel stores arbitrary files as lossless monochrome video frames, and reads them back.
//!
//! # Pipeline overview
//!
//! Encode:
//!
//! 1. **Frame records**: each `(name, bytes)` entry becomes `MAGIC | name_len | name | len | bytes`
//! 2. **Expand**: the record stream becomes bits, most-significant bit first
//! 3. **Rasterize**: one bit per pixel, ink for `1`, paper for `0`, padding after the last bit
//! 4. **Encode** (optional): stream frames to the system `ffmpeg` with a lossless codec
//!
//! Decode runs the same steps backwards. Pixels are classified by exact color, so anything a
//! lossy re-encode has touched turns into padding and surfaces as a structural error instead of
//! silently wrong bytes.
//!
//! The codec stages are pure; `ffmpeg`, `ffprobe` and zip handling stay at the edges
//! ([`encode_archive_to_video`], [`decode_video_to_archive`]).
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod archive;
mod codec;
mod config;
mod foundation;
mod media;
mod pipeline;
mod raster;

/// Frame sinks (in-memory, PNG dump, `ffmpeg`).
pub mod encode;

pub use archive::{read_zip_entries, write_zip_entries};
pub use codec::bits::BitSequence;
pub use codec::record::{
    ArchiveEntry, RECORD_HEADER_FIXED_LEN, RECORD_MAGIC, assemble_bits, assemble_records,
    demux_records, write_record,
};
pub use config::{CodecOpts, VideoCodec};
pub use encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path, is_ffprobe_on_path};
pub use encode::png::{PngDirSink, png_frame_path, read_png_frames};
pub use encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use foundation::core::{Fps, FrameGeometry, FrameIndex};
pub use foundation::error::{BitreelError, BitreelResult};
pub use media::{VideoFrames, VideoSourceInfo, decode_video_frames, probe_video};
pub use pipeline::{
    EncodeStats, EntrySummary, VideoSummary, decode_frames, decode_video, decode_video_to_archive,
    encode_archive_to_video, encode_files, encode_frames, inspect_frames, inspect_video,
    write_atomically,
};
pub use raster::frame::{Frame, rasterize};
pub use raster::palette::{INK_RGB, PADDING_RGB, PAPER_RGB, PixelLabel};
pub use raster::sample::{reassemble, sample_frame, sample_frames};
pub use raster::threading::Threading;
