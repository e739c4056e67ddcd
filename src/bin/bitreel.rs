use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "bitreel", version, about = "Store files as lossless monochrome video")]
struct Cli {
    /// Log more (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encode the files of a zip archive into a video (requires `ffmpeg` on PATH).
    Encode(EncodeArgs),
    /// Decode a video (or PNG frame dump) back into a zip archive.
    Decode(DecodeArgs),
    /// Print what a video (or PNG frame dump) contains, as JSON.
    Inspect(InspectArgs),
}

#[derive(Args, Debug)]
struct CodecArgs {
    /// JSON file with codec options; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Frame width in pixels.
    #[arg(long)]
    width: Option<u32>,

    /// Frame height in pixels.
    #[arg(long)]
    height: Option<u32>,

    /// Frames per second (integer).
    #[arg(long)]
    fps: Option<u32>,

    /// Lossless video codec.
    #[arg(long, value_enum)]
    codec: Option<CodecChoice>,

    /// Worker threads for rasterizing/sampling.
    #[arg(long)]
    threads: Option<usize>,

    /// Frames built or sampled per batch.
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Process frames on a single thread.
    #[arg(long)]
    sequential: bool,
}

#[derive(Parser, Debug)]
struct EncodeArgs {
    /// Input zip archive.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output video path. Defaults to the input path with the codec's extension, unless only
    /// `--frames-dir` is given.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Also (or only) write every frame as `frame_<n>.png` into this directory.
    #[arg(long)]
    frames_dir: Option<PathBuf>,

    #[command(flatten)]
    codec: CodecArgs,
}

#[derive(Parser, Debug)]
struct DecodeArgs {
    /// Input video.
    #[arg(long = "in", required_unless_present = "frames_dir", conflicts_with = "frames_dir")]
    in_path: Option<PathBuf>,

    /// Read frames from a `frame_<n>.png` dump instead of a video.
    #[arg(long)]
    frames_dir: Option<PathBuf>,

    /// Output zip archive.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    codec: CodecArgs,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Input video.
    #[arg(long = "in", required_unless_present = "frames_dir", conflicts_with = "frames_dir")]
    in_path: Option<PathBuf>,

    /// Read frames from a `frame_<n>.png` dump instead of a video.
    #[arg(long)]
    frames_dir: Option<PathBuf>,

    #[command(flatten)]
    codec: CodecArgs,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CodecChoice {
    Ffv1,
    X264rgb,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Encode(args) => cmd_encode(args),
        Command::Decode(args) => cmd_decode(args),
        Command::Inspect(args) => cmd_inspect(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn codec_opts(args: &CodecArgs) -> anyhow::Result<bitreel::CodecOpts> {
    let mut opts = match &args.config {
        Some(path) => bitreel::CodecOpts::from_json_file(path)?,
        None => bitreel::CodecOpts::default(),
    };
    if let Some(width) = args.width {
        opts.width = width;
    }
    if let Some(height) = args.height {
        opts.height = height;
    }
    if let Some(fps) = args.fps {
        opts.fps = bitreel::Fps::new(fps, 1)?;
    }
    if let Some(codec) = args.codec {
        opts.codec = match codec {
            CodecChoice::Ffv1 => bitreel::VideoCodec::Ffv1,
            CodecChoice::X264rgb => bitreel::VideoCodec::X264rgb,
        };
    }
    if args.threads.is_some() {
        opts.threads = args.threads;
    }
    if let Some(chunk_size) = args.chunk_size {
        opts.chunk_size = chunk_size;
    }
    if args.sequential {
        opts.parallel = false;
    }
    opts.validate()?;
    Ok(opts)
}

fn cmd_encode(args: EncodeArgs) -> anyhow::Result<()> {
    let opts = codec_opts(&args.codec)?;
    let zip_blob = std::fs::read(&args.in_path)
        .with_context(|| format!("read archive '{}'", args.in_path.display()))?;

    let out = match (&args.out, &args.frames_dir) {
        (Some(out), _) => Some(out.clone()),
        (None, Some(_)) => None,
        (None, None) => Some(args.in_path.with_extension(opts.codec.extension())),
    };

    if let Some(out) = &out {
        let stats = bitreel::encode_archive_to_video(&zip_blob, out, &opts)
            .with_context(|| format!("encode '{}'", args.in_path.display()))?;
        eprintln!(
            "wrote {} ({} entries, {} frames)",
            out.display(),
            stats.entries,
            stats.frames
        );
    }

    if let Some(dir) = &args.frames_dir {
        let entries = bitreel::read_zip_entries(&zip_blob)?;
        let mut sink = bitreel::PngDirSink::new(dir);
        let stats = bitreel::encode_files(&entries, &opts, &mut sink)
            .with_context(|| format!("write frames into '{}'", dir.display()))?;
        eprintln!("wrote {} frames into {}", stats.frames, dir.display());
    }
    Ok(())
}

fn cmd_decode(args: DecodeArgs) -> anyhow::Result<()> {
    let opts = codec_opts(&args.codec)?;
    let blob = match (args.in_path.as_deref(), args.frames_dir.as_deref()) {
        (_, Some(dir)) => {
            let frames = bitreel::read_png_frames(dir)?;
            let entries = bitreel::decode_frames(&frames, &opts.threading())
                .with_context(|| format!("decode frames in '{}'", dir.display()))?;
            bitreel::write_zip_entries(&entries)?
        }
        (Some(video), None) => bitreel::decode_video_to_archive(video, &opts)
            .with_context(|| format!("decode '{}'", video.display()))?,
        (None, None) => anyhow::bail!("either --in or --frames-dir is required"),
    };
    bitreel::write_atomically(&args.out, &blob)?;
    eprintln!("wrote {} ({} bytes)", args.out.display(), blob.len());
    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let opts = codec_opts(&args.codec)?;
    let summary = match (args.in_path.as_deref(), args.frames_dir.as_deref()) {
        (_, Some(dir)) => {
            let frames = bitreel::read_png_frames(dir)?;
            bitreel::inspect_frames(&frames, &opts.threading())
                .with_context(|| format!("decode frames in '{}'", dir.display()))?
        }
        (Some(video), None) => bitreel::inspect_video(video, &opts)
            .with_context(|| format!("decode '{}'", video.display()))?,
        (None, None) => anyhow::bail!("either --in or --frames-dir is required"),
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
