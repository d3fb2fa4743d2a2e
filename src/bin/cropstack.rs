use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use rand::{SeedableRng, rngs::StdRng};

#[derive(Parser, Debug)]
#[command(name = "cropstack", version)]
struct Cli {
    /// Log render passes at debug level.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Render the ready frame plus one frame per click into a PNG sequence.
    Session(SessionArgs),
    /// Print the sampled scene (or a draw-call census) as JSON without rasterizing.
    Inspect(InspectArgs),
}

#[derive(Parser, Debug)]
struct SketchArgs {
    /// Sketch config JSON. Missing fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for reproducible output. Defaults to OS entropy.
    #[arg(long)]
    seed: Option<u64>,

    /// Turn off one stage of the sketch (repeatable).
    #[arg(long, value_enum)]
    disable: Vec<StageChoice>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    sketch: SketchArgs,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct SessionArgs {
    #[command(flatten)]
    sketch: SketchArgs,

    /// Output directory for `frame-NNNN.png` files.
    #[arg(long)]
    out_dir: PathBuf,

    /// Simulated clicks after the ready frame.
    #[arg(long, default_value_t = 3, conflicts_with = "interactive")]
    clicks: u32,

    /// Read clicks from stdin: one per line, `q` to stop.
    #[arg(long)]
    interactive: bool,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    #[command(flatten)]
    sketch: SketchArgs,

    /// Print a census of the draw calls instead of the scene.
    #[arg(long)]
    calls: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StageChoice {
    Rotation,
    Gradient,
    Mask,
    Texture,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Session(args) => cmd_session(args),
        Command::Inspect(args) => cmd_inspect(args),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn make_sketch(args: &SketchArgs) -> anyhow::Result<(cropstack::Sketch, StdRng)> {
    let mut config = match &args.config {
        Some(path) => cropstack::SketchConfig::from_path(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => cropstack::SketchConfig::default(),
    };
    for stage in &args.disable {
        match stage {
            StageChoice::Rotation => config.stages.rotation = false,
            StageChoice::Gradient => config.stages.gradient = false,
            StageChoice::Mask => config.stages.mask = false,
            StageChoice::Texture => config.stages.texture = false,
        }
    }

    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    Ok((cropstack::Sketch::new(config)?, rng))
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let (sketch, mut rng) = make_sketch(&args.sketch)?;
    let mut canvas = cropstack::CpuCanvas::new(sketch.config().canvas())?;

    let mut session = cropstack::Session::new(&sketch);
    let pass = session
        .on_ready(&mut canvas, &mut rng)?
        .context("ready pass did not render")?;
    let frame = pass.frame.context("cpu canvas produced no frame")?;

    cropstack::write_png(&args.out, &frame)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_session(args: SessionArgs) -> anyhow::Result<()> {
    let (sketch, mut rng) = make_sketch(&args.sketch)?;
    let mut canvas = cropstack::CpuCanvas::new(sketch.config().canvas())?;
    let mut sink = cropstack::PngSequenceSink::new(&args.out_dir);
    let mut session = cropstack::Session::new(&sketch);

    let frames = if args.interactive {
        eprintln!("press enter to redraw, `x y` to click at a position, `q` to quit");
        let mut events = cropstack::LineEvents::new(std::io::stdin().lock());
        session.run(&mut events, &mut canvas, &mut rng, &mut sink)?
    } else {
        let mut events = cropstack::ScriptedEvents::ready_then_clicks(args.clicks);
        session.run(&mut events, &mut canvas, &mut rng, &mut sink)?
    };

    eprintln!("wrote {frames} frames to {}", args.out_dir.display());
    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let (sketch, mut rng) = make_sketch(&args.sketch)?;
    let mut ctx = cropstack::RecordingContext::new(sketch.config().canvas());
    sketch.setup(&mut ctx)?;
    let plan = sketch.render_frame(&mut ctx, &mut rng);

    let stdout = std::io::stdout().lock();
    if args.calls {
        serde_json::to_writer_pretty(stdout, &ctx.census()).context("serialize census")?;
    } else {
        serde_json::to_writer_pretty(stdout, &plan).context("serialize scene plan")?;
    }
    println!();
    Ok(())
}
