//! Frame sinks: where rasterized frames go after the codec is done with them.

/// `ffmpeg`-based sink (lossless video via system `ffmpeg`).
pub mod ffmpeg;
/// Per-frame PNG dump.
pub mod png;
/// Generic frame sink trait and the in-memory sink.
pub mod sink;
