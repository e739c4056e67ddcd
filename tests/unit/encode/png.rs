use super::*;
use crate::foundation::core::{Fps, FrameGeometry};
use crate::raster::palette::PixelLabel;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("unit_png").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

#[test]
fn png_dump_reloads_in_numeric_order() {
    let dir = scratch_dir("reload");
    let geom = FrameGeometry::new(3, 2).unwrap();
    let labels = [
        PixelLabel::Bit(true),
        PixelLabel::Bit(false),
        PixelLabel::Pad,
    ];
    let frames: Vec<Frame> = (0..12)
        .map(|i| Frame::filled(geom, labels[i % labels.len()]))
        .collect();

    let mut sink = PngDirSink::new(&dir);
    sink.begin(SinkConfig {
        geometry: geom,
        fps: Fps::default(),
    })
    .unwrap();
    for (i, frame) in frames.iter().enumerate() {
        sink.push_frame(FrameIndex(i as u64), frame).unwrap();
    }
    sink.end().unwrap();
    assert_eq!(sink.written().len(), 12);
    assert!(png_frame_path(&dir, FrameIndex(10)).exists());

    std::fs::write(dir.join("notes.txt"), b"ignored").unwrap();
    let reloaded = read_png_frames(&dir).unwrap();
    assert_eq!(reloaded, frames);
}

#[test]
fn missing_dir_is_an_error() {
    let dir = scratch_dir("missing");
    assert!(read_png_frames(&dir).is_err());
}
