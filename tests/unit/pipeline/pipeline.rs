use super::*;
use crate::encode::sink::InMemorySink;
use crate::raster::palette::PixelLabel;

fn small_opts(width: u32, height: u32) -> CodecOpts {
    CodecOpts {
        width,
        height,
        parallel: false,
        ..CodecOpts::default()
    }
}

#[test]
fn empty_entry_set_emits_one_padding_frame() {
    let opts = small_opts(4, 4);
    assert!(encode_frames(&[], &opts).unwrap().is_empty());

    let mut sink = InMemorySink::new();
    let stats = encode_files(&[], &opts, &mut sink).unwrap();
    assert_eq!(stats.frames, 1);
    assert_eq!(sink.frames()[0], Frame::filled(opts.geometry(), PixelLabel::Pad));
    assert!(decode_frames(sink.frames(), &opts.threading()).unwrap().is_empty());
}

#[test]
fn stats_count_framed_bytes_and_frames() {
    let entries = vec![ArchiveEntry::new("x", vec![1, 2, 3])];
    let opts = small_opts(8, 8);
    let mut sink = InMemorySink::new();
    let stats = encode_files(&entries, &opts, &mut sink).unwrap();
    assert_eq!(stats.entries, 1);
    assert_eq!(stats.stream_bytes, entries[0].framed_len());
    assert_eq!(stats.frames, (stats.stream_bytes * 8).div_ceil(64));
    assert_eq!(sink.frames().len(), stats.frames);
}

#[test]
fn invalid_entry_never_starts_the_sink() {
    let mut sink = InMemorySink::new();
    let err = encode_files(
        &[ArchiveEntry::new("", vec![1])],
        &small_opts(4, 4),
        &mut sink,
    )
    .unwrap_err();
    assert!(matches!(err, crate::BitreelError::InvalidEntry(_)));
    assert!(sink.config().is_none());
}

#[test]
fn chunked_encode_matches_whole_stream_rasterizing() {
    let entries = vec![
        ArchiveEntry::new("a.bin", (0..=255u8).collect::<Vec<u8>>()),
        ArchiveEntry::new("b.txt", b"chunked".to_vec()),
    ];
    let expected = encode_frames(&entries, &small_opts(8, 4)).unwrap();
    assert!(expected.len() > 10);

    for (chunk_size, parallel) in [(1, false), (3, false), (4, true), (64, true), (0, true)] {
        let opts = CodecOpts {
            chunk_size,
            parallel,
            threads: Some(2),
            ..small_opts(8, 4)
        };
        let mut sink = InMemorySink::new();
        let stats = encode_files(&entries, &opts, &mut sink).unwrap();
        assert_eq!(stats.frames, expected.len(), "chunk_size={chunk_size}");
        assert_eq!(sink.frames(), expected.as_slice(), "chunk_size={chunk_size}");
    }
}

#[test]
fn sink_failure_stops_the_batch_loop() {
    struct FailAt(u64, usize);
    impl FrameSink for FailAt {
        fn begin(&mut self, _cfg: SinkConfig) -> BitreelResult<()> {
            Ok(())
        }
        fn push_frame(&mut self, idx: FrameIndex, _frame: &Frame) -> BitreelResult<()> {
            self.1 += 1;
            if idx.0 == self.0 {
                return Err(crate::BitreelError::media("sink full"));
            }
            Ok(())
        }
        fn end(&mut self) -> BitreelResult<()> {
            Ok(())
        }
    }

    let opts = CodecOpts {
        chunk_size: 2,
        ..small_opts(4, 2)
    };
    let mut sink = FailAt(3, 0);
    let err = encode_files(&[ArchiveEntry::new("x", vec![7; 16])], &opts, &mut sink).unwrap_err();
    assert!(matches!(err, crate::BitreelError::Media(_)));
    assert_eq!(sink.1, 4);
}

#[test]
fn summary_lists_entries_in_order() {
    let entries = vec![
        ArchiveEntry::new("a", vec![0; 3]),
        ArchiveEntry::new("b", Vec::new()),
    ];
    let opts = small_opts(16, 16);
    let frames = encode_frames(&entries, &opts).unwrap();
    let summary = inspect_frames(&frames, &opts.threading()).unwrap();
    assert_eq!(summary.frames, frames.len());
    assert_eq!(summary.geometry, FrameGeometry::new(16, 16).unwrap());
    assert_eq!(
        summary.stream_bytes,
        entries.iter().map(ArchiveEntry::framed_len).sum::<usize>()
    );
    assert_eq!(
        summary.entries,
        vec![
            EntrySummary {
                name: "a".into(),
                size: 3
            },
            EntrySummary {
                name: "b".into(),
                size: 0
            },
        ]
    );
}

#[test]
fn partial_path_is_a_hidden_sibling() {
    let p = partial_path(Path::new("out/dir/video.mkv"));
    assert_eq!(p.parent(), Some(Path::new("out/dir")));
    let name = p.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with(".video.mkv."));
    assert!(name.ends_with(".partial"));
}

#[test]
fn partial_paths_differ_per_call() {
    let target = Path::new("out/video.mkv");
    assert_ne!(partial_path(target), partial_path(target));
}

#[test]
fn write_atomically_leaves_only_the_target() {
    let dir = PathBuf::from("target").join("unit_pipeline").join("atomic");
    let _ = std::fs::remove_dir_all(&dir);
    let target = dir.join("out.zip");
    write_atomically(&target, b"payload").unwrap();
    assert_eq!(std::fs::read(&target).unwrap(), b"payload");

    let names: Vec<_> = std::fs::read_dir(&dir)
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(names.len(), 1);
}

#[test]
fn dropped_guard_removes_its_file() {
    let dir = PathBuf::from("target").join("unit_pipeline").join("guard");
    std::fs::create_dir_all(&dir).unwrap();
    let tmp = dir.join("tmp.partial");
    std::fs::write(&tmp, b"x").unwrap();
    drop(TempFileGuard::new(tmp.clone()));
    assert!(!tmp.exists());
}
