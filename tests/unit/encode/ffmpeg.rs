use super::*;
use crate::foundation::core::FrameGeometry;

fn cfg(width: u32, height: u32) -> SinkConfig {
    SinkConfig {
        geometry: FrameGeometry::new(width, height).unwrap(),
        fps: Fps::default(),
    }
}

#[test]
fn x264rgb_rejects_odd_dimensions_before_spawning() {
    let out = PathBuf::from("target").join("unit_ffmpeg").join("odd.mp4");
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(&out, VideoCodec::X264rgb));
    let err = sink.begin(cfg(3, 2)).unwrap_err();
    assert!(matches!(err, BitreelError::Validation(_)));
}

#[test]
fn refuses_to_overwrite_when_asked_not_to() {
    let dir = PathBuf::from("target").join("unit_ffmpeg");
    std::fs::create_dir_all(&dir).unwrap();
    let out = dir.join("exists.mkv");
    std::fs::write(&out, b"x").unwrap();

    let mut opts = FfmpegSinkOpts::new(&out, VideoCodec::Ffv1);
    opts.overwrite = false;
    let err = FfmpegSink::new(opts).begin(cfg(2, 2)).unwrap_err();
    assert!(matches!(err, BitreelError::Validation(_)));
}

#[test]
fn push_and_end_before_begin_fail() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("unused.mkv", VideoCodec::Ffv1));
    let frame = Frame::from_rgba(1, 1, vec![0, 0, 0, 255]).unwrap();
    assert!(sink.push_frame(FrameIndex(0), &frame).is_err());
    assert!(sink.end().is_err());
}

#[test]
fn parent_dir_of_bare_file_name_is_fine() {
    assert!(ensure_parent_dir(Path::new("bare.mkv")).is_ok());
}
