use std::io::{BufWriter, Write as _};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use noisemask::{
    AudioMode, CancelToken, FfmpegTool, JobParams, ProgressRegistry, StreamingSession,
};

const PROGRESS_POLL: Duration = Duration::from_millis(250);

#[derive(Parser, Debug)]
#[command(name = "noisemask", version, about = "Mask video content behind animated noise")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a whole video to MP4 (requires `ffmpeg` and `ffprobe` on PATH).
    Render(RenderArgs),
    /// Write paced preview frames as JPEGs (requires `ffmpeg` and `ffprobe` on PATH).
    Preview(PreviewArgs),
}

#[derive(Args, Debug)]
struct JobArgs {
    /// Input video.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Job parameters JSON; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output scale factor.
    #[arg(long)]
    scale: Option<f64>,

    /// Gray noise instead of color noise.
    #[arg(long, default_value_t = false)]
    gray: bool,

    /// Playback speed multiplier.
    #[arg(long)]
    speed: Option<f64>,

    /// Use the fast frame-difference detector.
    #[arg(long, default_value_t = false)]
    nitro: bool,

    /// Seed for reproducible noise.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    job: JobArgs,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Audio track: mute, original, white or brown.
    #[arg(long)]
    audio: Option<AudioMode>,
}

#[derive(Args, Debug)]
struct PreviewArgs {
    #[command(flatten)]
    job: JobArgs,

    /// Directory receiving the frames.
    #[arg(long)]
    out_dir: PathBuf,

    /// Stop after this many frames.
    #[arg(long)]
    max_frames: Option<u64>,

    /// Write one `multipart/x-mixed-replace` stream file instead of numbered JPEGs.
    #[arg(long, default_value_t = false)]
    multipart: bool,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Preview(args) => cmd_preview(args),
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

fn job_params(args: &JobArgs) -> anyhow::Result<JobParams> {
    let mut params = match &args.config {
        Some(path) => JobParams::from_path(path)?,
        None => JobParams::default(),
    };
    if let Some(scale) = args.scale {
        params.scale = scale;
    }
    if let Some(speed) = args.speed {
        params.speed = speed;
    }
    if args.gray {
        params.is_color = false;
    }
    if args.nitro {
        params.nitro = true;
    }
    if args.seed.is_some() {
        params.seed = args.seed;
    }
    params.validate()?;
    Ok(params)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut params = job_params(&args.job)?;
    if let Some(audio) = args.audio {
        params.audio_mode = audio;
    }

    let registry = ProgressRegistry::new();
    let job_id = args.out.display().to_string();
    let worker = {
        let registry = registry.clone();
        let job_id = job_id.clone();
        let input = args.job.in_path.clone();
        let output = args.out.clone();
        std::thread::spawn(move || {
            noisemask::render_job(
                &input,
                &output,
                &params,
                &registry,
                &job_id,
                &FfmpegTool::new(),
            )
        })
    };

    let mut last = None;
    while !worker.is_finished() {
        let pct = registry.get(&job_id);
        if pct.is_some() && pct != last {
            tracing::info!(job = %job_id, percent = pct, "progress");
            last = pct;
        }
        std::thread::sleep(PROGRESS_POLL);
    }

    let report = worker
        .join()
        .map_err(|_| anyhow::anyhow!("render thread panicked"))??;
    tracing::info!(
        frames = report.stats.frames,
        outcome = ?report.mux,
        "wrote {}",
        args.out.display()
    );
    Ok(())
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    let params = job_params(&args.job)?;
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    let cancel = CancelToken::new();
    let mut session = StreamingSession::open(&args.job.in_path, &params, cancel.clone())?;
    let mut multipart = if args.multipart {
        let path = args.out_dir.join("stream.mjpeg");
        let file = std::fs::File::create(&path)
            .with_context(|| format!("create '{}'", path.display()))?;
        Some(BufWriter::new(file))
    } else {
        None
    };

    while let Some(jpeg) = session.next_frame()? {
        let n = session.frames_produced();
        match multipart.as_mut() {
            Some(w) => noisemask::write_multipart_part(w, &jpeg).context("write multipart part")?,
            None => {
                let path = args.out_dir.join(format!("frame_{:05}.jpg", n - 1));
                std::fs::write(&path, &jpeg)
                    .with_context(|| format!("write '{}'", path.display()))?;
            }
        }
        if args.max_frames.is_some_and(|max| n >= max) {
            cancel.cancel();
        }
    }
    if let Some(mut w) = multipart {
        w.flush().context("flush multipart stream")?;
    }

    tracing::info!(
        frames = session.frames_produced(),
        state = ?session.state(),
        "preview written to {}",
        args.out_dir.display()
    );
    Ok(())
}
