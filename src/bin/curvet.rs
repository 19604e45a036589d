//! Command-line front end: composite single frames to PNG or export the
//! curve-reveal animation to MP4.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use curvet::{
    CancelToken, ControlPoints, CurveCompositor, CurveFrameParams, CurveModel, FfmpegSinkOpts,
    FrameRGBA, FrameSource as _, ImageFrameSource, RenderConfig, Viewport,
};

#[derive(Parser, Debug)]
#[command(name = "curvet", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Composite a single frame at a given progress and write a PNG.
    Frame(FrameArgs),
    /// Export the curve-reveal animation as an MP4 (requires `ffmpeg` on PATH).
    Export(ExportArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Optional JSON file with normalized control points
    /// (`{"start": {"x": 0.8, "y": 0.5}, "seed": …, "end": …}`).
    #[arg(long)]
    curve: Option<PathBuf>,

    /// Background image; a white background is used when omitted.
    #[arg(long)]
    image: Option<PathBuf>,

    /// Animation progress in [0, 1].
    #[arg(long, default_value_t = 1.0)]
    progress: f64,

    /// Output width in pixels.
    #[arg(long, default_value_t = RenderConfig::DEFAULT_SIZE)]
    width: u32,

    /// Output height in pixels.
    #[arg(long, default_value_t = RenderConfig::DEFAULT_SIZE)]
    height: u32,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Optional JSON file with normalized control points.
    #[arg(long)]
    curve: Option<PathBuf>,

    /// Background image; a white background is used when omitted.
    #[arg(long)]
    image: Option<PathBuf>,

    /// Animation duration in seconds.
    #[arg(long, default_value_t = 2.0)]
    duration: f64,

    /// Output width in pixels (must be even).
    #[arg(long, default_value_t = RenderConfig::DEFAULT_SIZE)]
    width: u32,

    /// Output height in pixels (must be even).
    #[arg(long, default_value_t = RenderConfig::DEFAULT_SIZE)]
    height: u32,

    /// Average video bitrate in bits per second.
    #[arg(long, default_value_t = FfmpegSinkOpts::DEFAULT_BITRATE)]
    bitrate: u32,

    /// Overwrite the output if it already exists.
    #[arg(long, default_value_t = true)]
    overwrite: bool,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Export(args) => cmd_export(args),
    }
}

fn load_model(curve: &Option<PathBuf>, width: u32, height: u32) -> anyhow::Result<CurveModel> {
    let points = match curve {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("read curve description '{}'", path.display()))?;
            serde_json::from_str::<ControlPoints>(&text)
                .with_context(|| format!("parse curve description '{}'", path.display()))?
        }
        None => ControlPoints::default(),
    };
    let model = CurveModel::new(
        points,
        Viewport::new(f64::from(width), f64::from(height)),
        CurveModel::DEFAULT_SAMPLE_COUNT,
    )?;
    Ok(model)
}

fn open_source(image: &Option<PathBuf>, width: u32, height: u32) -> anyhow::Result<ImageFrameSource> {
    let source = match image {
        Some(path) => ImageFrameSource::open(path)?,
        None => ImageFrameSource::from_frame(FrameRGBA::solid(
            width,
            height,
            [255, 255, 255, 255],
        ))?,
    };
    Ok(source)
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let model = load_model(&args.curve, args.width, args.height)?;
    let mut source = open_source(&args.image, args.width, args.height)?;

    let background = source
        .fetch_frame(args.width, args.height)?
        .context("background source yielded no frame")?;
    let params = CurveFrameParams::for_progress(
        &model,
        args.progress.clamp(0.0, 1.0),
        CurveFrameParams::DEFAULT_RADIUS,
        CurveFrameParams::DEFAULT_STROKE_WIDTH,
    )?;
    let compositor = CurveCompositor::new(Default::default())?;
    let frame = compositor.composite(&background, &params)?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        &args.out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let model = load_model(&args.curve, args.width, args.height)?;
    let mut source = open_source(&args.image, args.width, args.height)?;

    let cfg = RenderConfig {
        width: args.width,
        height: args.height,
        duration_secs: args.duration,
        ..RenderConfig::with_duration(args.duration)
    };
    let sink_opts = FfmpegSinkOpts {
        out_path: args.out.clone(),
        overwrite: args.overwrite,
        bitrate: args.bitrate,
    };

    let report = curvet::export_to_mp4(&model, &mut source, sink_opts, cfg, CancelToken::new())?;
    eprintln!(
        "wrote {} ({} frames)",
        args.out.display(),
        report.frames_pushed
    );
    Ok(())
}
