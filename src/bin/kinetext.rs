use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser, Debug)]
#[command(name = "kinetext", version)]
struct Cli {
    /// Log debug diagnostics (cache hits, static-composite decisions) to stderr.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Render a range of frames as a numbered PNG sequence.
    Frames(FramesArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct FramesArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output directory for `frame_NNNNNN.png` files.
    #[arg(long)]
    out_dir: PathBuf,

    /// First frame (inclusive).
    #[arg(long, default_value_t = 0)]
    start: u64,

    /// Last frame (exclusive); defaults to the end of the scene.
    #[arg(long)]
    end: Option<u64>,

    /// Render frames of each chunk in parallel.
    #[arg(long)]
    parallel: bool,

    /// Worker threads for parallel rendering.
    #[arg(long)]
    threads: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Frames(args) => cmd_frames(args),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_scene(path: &Path) -> anyhow::Result<(kinetext::Scene, kinetext::Compositor)> {
    let scene = kinetext::Scene::load(path)
        .with_context(|| format!("load scene '{}'", path.display()))?;
    let assets_root = path.parent().unwrap_or_else(|| Path::new("."));
    let comp = scene.build(assets_root).with_context(|| "build scene layers")?;
    Ok((scene, comp))
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let (scene, comp) = load_scene(&args.in_path)?;
    let t = scene.fps.frame_time_secs(args.frame);
    let frame = comp.frame(t);

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    kinetext::render::write_png(&args.out, &frame)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    let (scene, comp) = load_scene(&args.in_path)?;
    let end = args.end.unwrap_or_else(|| scene.frame_count());
    let threading = kinetext::RenderThreading {
        parallel: args.parallel,
        threads: args.threads,
        ..kinetext::RenderThreading::default()
    };
    let mut sink = kinetext::PngSequenceSink::new(&args.out_dir);
    let stats = kinetext::render_range(&comp, scene.fps, args.start..end, &mut sink, &threading)
        .with_context(|| format!("render frames {}..{end}", args.start))?;

    eprintln!(
        "wrote {} frames ({} from the static cache) to {}",
        stats.frames_total,
        stats.frames_static,
        args.out_dir.display()
    );
    Ok(())
}
