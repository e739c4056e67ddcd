use super::*;
use crate::foundation::core::FrameGeometry;
use crate::foundation::error::BitreelError;
use crate::raster::frame::rasterize;

fn frames_for(bytes: Vec<u8>, width: u32, height: u32) -> Vec<Frame> {
    let geom = FrameGeometry::new(width, height).unwrap();
    rasterize(&BitSequence::from_bytes(bytes), geom, &Threading::sequential()).unwrap()
}

#[test]
fn sampling_inverts_rasterizing() {
    let bytes = vec![0x00, 0x01, 0x7F, 0x80, 0xFF, 0x5A];
    let frames = frames_for(bytes.clone(), 5, 3);
    let labels = sample_frames(&frames, &Threading::sequential()).unwrap();
    assert_eq!(labels.len(), frames.len() * 15);
    assert_eq!(reassemble(&labels).unwrap(), bytes);
}

#[test]
fn classification_is_idempotent() {
    let frames = frames_for(vec![0xC3, 0x3C, 0x01], 4, 4);
    for frame in &frames {
        assert_eq!(sample_frame(frame), sample_frame(frame));
    }
}

#[test]
fn padding_is_a_trailing_run_only() {
    let frames = frames_for(vec![0x12, 0x34, 0x56], 7, 2);
    let labels = sample_frames(&frames, &Threading::default()).unwrap();
    let first_pad = labels
        .iter()
        .position(|l| *l == PixelLabel::Pad)
        .unwrap();
    assert!(labels[first_pad..].iter().all(|l| *l == PixelLabel::Pad));
    assert_eq!(first_pad, 24);
}

#[test]
fn padding_in_the_middle_is_dropped_by_label() {
    let mut labels = vec![PixelLabel::Pad; 3];
    labels.extend(std::iter::repeat_n(PixelLabel::Bit(true), 4));
    labels.push(PixelLabel::Pad);
    labels.extend(std::iter::repeat_n(PixelLabel::Bit(false), 4));
    assert_eq!(reassemble(&labels).unwrap(), vec![0xF0]);
}

#[test]
fn all_padding_reassembles_to_nothing() {
    let labels = vec![PixelLabel::Pad; 32];
    assert!(reassemble(&labels).unwrap().is_empty());
}

#[test]
fn odd_bit_count_is_truncated_stream() {
    let labels = vec![PixelLabel::Bit(true); 9];
    assert!(matches!(
        reassemble(&labels).unwrap_err(),
        BitreelError::TruncatedStream { bits: 9 }
    ));
}

#[test]
fn foreign_pixel_becomes_padding() {
    let mut frames = frames_for(vec![0xFF], 4, 2);
    frames[0].set_rgb(0, 0, [12, 200, 99]).unwrap();
    let labels = sample_frame(&frames[0]);
    assert_eq!(labels[0], PixelLabel::Pad);
    assert_eq!(labels[1], PixelLabel::Bit(true));
}

#[test]
fn parallel_sampling_matches_sequential() {
    let frames = frames_for((0..64u8).collect(), 6, 6);
    let seq = sample_frames(&frames, &Threading::sequential()).unwrap();
    let par = sample_frames(
        &frames,
        &Threading {
            parallel: true,
            threads: Some(2),
            ..Threading::default()
        },
    )
    .unwrap();
    assert_eq!(seq, par);
}

#[test]
fn streamed_sampling_matches_whole_frame_decode() {
    let bytes: Vec<u8> = (0..200u8).collect();
    let frames = frames_for(bytes.clone(), 5, 4);
    for chunk_size in [1, 3, 64] {
        let threading = Threading {
            chunk_size,
            threads: Some(2),
            ..Threading::default()
        };
        let stream = sample_stream(frames.iter().cloned().map(Ok), &threading).unwrap();
        assert_eq!(stream.frames, frames.len());
        assert_eq!(stream.bytes, bytes, "chunk_size={chunk_size}");
    }
}

#[test]
fn streamed_sampling_stops_at_the_first_source_error() {
    let frames = frames_for(vec![0xAB; 8], 4, 4);
    let mut pulled = 0usize;
    let source = frames
        .iter()
        .cloned()
        .map(Ok)
        .chain(std::iter::once(Err(BitreelError::media("decoder died"))))
        .chain(frames.iter().cloned().map(Ok))
        .inspect(|_| pulled += 1);
    let threading = Threading {
        chunk_size: 2,
        ..Threading::sequential()
    };
    let err = sample_stream(source, &threading).unwrap_err();
    assert!(matches!(err, BitreelError::Media(_)));
    assert_eq!(pulled, frames.len() + 1);
}

#[test]
fn streamed_sampling_of_nothing_is_empty() {
    let stream = sample_stream(std::iter::empty(), &Threading::default()).unwrap();
    assert_eq!(stream.frames, 0);
    assert!(stream.bytes.is_empty());
}
