//! Video source boundary: `ffprobe` for geometry, `ffmpeg` for raw RGBA frames.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};

use crate::encode::ffmpeg::{is_ffmpeg_on_path, is_ffprobe_on_path};
use crate::foundation::core::FrameGeometry;
use crate::foundation::error::{BitreelError, BitreelResult};
use crate::raster::frame::Frame;

#[derive(Clone, Debug)]
/// Basic metadata about a source video file.
pub struct VideoSourceInfo {
    /// Source path used for probing/decoding.
    pub source_path: PathBuf,
    /// Frame dimensions of the first video stream.
    pub geometry: FrameGeometry,
    /// Codec name reported by ffprobe, when present.
    pub codec_name: Option<String>,
}

#[derive(serde::Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    codec_name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
}

#[derive(serde::Deserialize)]
struct ProbeOut {
    streams: Vec<ProbeStream>,
}

/// Probe source video metadata through `ffprobe`.
pub fn probe_video(source_path: &Path) -> BitreelResult<VideoSourceInfo> {
    if !is_ffprobe_on_path() {
        return Err(BitreelError::media(
            "ffprobe is required for video decoding, but was not found on PATH",
        ));
    }

    let out = Command::new("ffprobe")
        .args(["-v", "error", "-print_format", "json", "-show_streams"])
        .arg(source_path)
        .output()
        .map_err(|e| BitreelError::media(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(BitreelError::media(format!(
            "ffprobe failed for '{}': {}",
            source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    parse_probe_json(source_path, &out.stdout)
}

fn parse_probe_json(source_path: &Path, json: &[u8]) -> BitreelResult<VideoSourceInfo> {
    let parsed: ProbeOut = serde_json::from_slice(json)
        .map_err(|e| BitreelError::media(format!("ffprobe json parse failed: {e}")))?;
    let video_stream = parsed
        .streams
        .into_iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| BitreelError::media("no video stream found"))?;
    let width = video_stream
        .width
        .ok_or_else(|| BitreelError::media("missing video width from ffprobe"))?;
    let height = video_stream
        .height
        .ok_or_else(|| BitreelError::media("missing video height from ffprobe"))?;

    Ok(VideoSourceInfo {
        source_path: source_path.to_path_buf(),
        geometry: FrameGeometry::new(width, height)?,
        codec_name: video_stream.codec_name,
    })
}

/// Frames of a running `ffmpeg` decode, read from its stdout one frame at a time.
///
/// Yields frames in presentation order. When stdout ends, the process exit status is checked and
/// a failure is yielded as the final item. Dropping the iterator early kills `ffmpeg`.
pub struct VideoFrames {
    source_path: PathBuf,
    geometry: FrameGeometry,

    child: Option<Child>,
    stdout: Option<ChildStdout>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,

    decoded: usize,
}

impl VideoFrames {
    fn finish(&mut self) -> BitreelResult<()> {
        drop(self.stdout.take());
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };
        let status = child
            .wait()
            .map_err(|e| BitreelError::media(format!("failed to wait for ffmpeg to finish: {e}")))?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| BitreelError::media("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| BitreelError::media(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };

        if !status.success() {
            return Err(BitreelError::media(format!(
                "ffmpeg video decode failed for '{}': {}",
                self.source_path.display(),
                String::from_utf8_lossy(&stderr_bytes).trim()
            )));
        }
        tracing::debug!(frames = self.decoded, "decoded video frames");
        Ok(())
    }
}

impl Iterator for VideoFrames {
    type Item = BitreelResult<Frame>;

    fn next(&mut self) -> Option<Self::Item> {
        let stdout = self.stdout.as_mut()?;
        match read_rgba_frame(stdout, self.geometry) {
            Ok(Some(frame)) => {
                self.decoded += 1;
                Some(Ok(frame))
            }
            Ok(None) => self.finish().err().map(Err),
            Err(e) => {
                // A short frame usually means ffmpeg gave up; prefer its own report.
                let exit = self.finish();
                Some(Err(exit.err().unwrap_or(e)))
            }
        }
    }
}

impl Drop for VideoFrames {
    fn drop(&mut self) {
        drop(self.stdout.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

/// Start decoding every frame of `source` as RGBA8.
///
/// Frames are passed through without rate conversion, so none are dropped or duplicated. Only
/// one frame is buffered at a time; see [`VideoFrames`].
#[tracing::instrument(skip(source), fields(path = %source.source_path.display()))]
pub fn decode_video_frames(source: &VideoSourceInfo) -> BitreelResult<VideoFrames> {
    if !is_ffmpeg_on_path() {
        return Err(BitreelError::media(
            "ffmpeg is required for video decoding, but was not found on PATH",
        ));
    }

    let mut child = Command::new("ffmpeg")
        .args(["-v", "error", "-i"])
        .arg(&source.source_path)
        .args([
            "-map",
            "0:v:0",
            "-fps_mode",
            "passthrough",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "pipe:1",
        ])
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| BitreelError::media(format!("failed to run ffmpeg for video decode: {e}")))?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| BitreelError::media("failed to open ffmpeg stdout (unexpected)"))?;
    let mut stderr = child
        .stderr
        .take()
        .ok_or_else(|| BitreelError::media("failed to open ffmpeg stderr (unexpected)"))?;
    let stderr_drain = std::thread::spawn(move || {
        let mut stderr_bytes = Vec::new();
        stderr.read_to_end(&mut stderr_bytes)?;
        Ok(stderr_bytes)
    });

    Ok(VideoFrames {
        source_path: source.source_path.clone(),
        geometry: source.geometry,
        child: Some(child),
        stdout: Some(stdout),
        stderr_drain: Some(stderr_drain),
        decoded: 0,
    })
}

/// Read exactly one RGBA8 frame, or `None` at a clean end of stream.
fn read_rgba_frame(reader: &mut impl Read, geom: FrameGeometry) -> BitreelResult<Option<Frame>> {
    let expected_len = geom.rgba_len();
    let mut data = Vec::with_capacity(expected_len);
    reader
        .by_ref()
        .take(expected_len as u64)
        .read_to_end(&mut data)
        .map_err(|e| BitreelError::media(format!("failed to read decoded frame: {e}")))?;

    match data.len() {
        0 => Ok(None),
        n if n == expected_len => Frame::from_rgba(geom.width, geom.height, data).map(Some),
        n => Err(BitreelError::media(format!(
            "decoded video has invalid size: stream ended {n} bytes into a {expected_len} byte frame"
        ))),
    }
}

#[cfg(test)]
#[path = "../tests/unit/media/probe.rs"]
mod tests;
