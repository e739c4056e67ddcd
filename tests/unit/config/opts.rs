use super::*;

#[test]
fn defaults_are_480p_at_ten_fps() {
    let opts = CodecOpts::default();
    assert_eq!(opts.geometry(), FrameGeometry::new(854, 480).unwrap());
    assert_eq!(opts.fps, Fps::new(10, 1).unwrap());
    assert_eq!(opts.codec, VideoCodec::Ffv1);
    assert_eq!(opts.threading(), Threading::default());
    assert!(opts.validate().is_ok());
}

#[test]
fn partial_json_keeps_defaults() {
    let opts: CodecOpts =
        serde_json::from_str(r#"{ "width": 64, "codec": "x264rgb", "threads": 2 }"#).unwrap();
    assert_eq!(opts.width, 64);
    assert_eq!(opts.height, 480);
    assert_eq!(opts.codec, VideoCodec::X264rgb);
    assert_eq!(opts.threading().threads, Some(2));
    assert_eq!(opts.threading().chunk_size, 64);
    assert!(opts.validate().is_ok());
}

#[test]
fn validation_catches_bad_values() {
    let mut opts = CodecOpts {
        width: 0,
        ..CodecOpts::default()
    };
    assert!(opts.validate().is_err());

    opts = CodecOpts {
        fps: Fps { num: 0, den: 1 },
        ..CodecOpts::default()
    };
    assert!(opts.validate().is_err());

    opts = CodecOpts {
        width: 3,
        codec: VideoCodec::X264rgb,
        ..CodecOpts::default()
    };
    assert!(opts.validate().is_err());
    opts.codec = VideoCodec::Ffv1;
    assert!(opts.validate().is_ok());

    opts.threads = Some(0);
    assert!(opts.validate().is_err());
}

#[test]
fn codec_names_parse() {
    assert_eq!("FFV1".parse::<VideoCodec>().unwrap(), VideoCodec::Ffv1);
    assert_eq!(
        "libx264rgb".parse::<VideoCodec>().unwrap(),
        VideoCodec::X264rgb
    );
    assert!("h264".parse::<VideoCodec>().is_err());
    assert_eq!(VideoCodec::Ffv1.extension(), "mkv");
    assert_eq!(VideoCodec::X264rgb.extension(), "mp4");
}

#[test]
fn config_file_is_loaded_and_validated() {
    let dir = std::path::PathBuf::from("target").join("unit_config");
    std::fs::create_dir_all(&dir).unwrap();

    let good = dir.join("good.json");
    std::fs::write(&good, r#"{ "width": 32, "height": 16, "fps": { "num": 5, "den": 1 } }"#)
        .unwrap();
    let opts = CodecOpts::from_json_file(&good).unwrap();
    assert_eq!(opts.geometry().capacity_bits(), 512);
    assert_eq!(opts.fps.num, 5);

    let bad = dir.join("bad.json");
    std::fs::write(&bad, r#"{ "height": 0 }"#).unwrap();
    assert!(CodecOpts::from_json_file(&bad).is_err());
}
