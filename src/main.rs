//! fumble - a finger counter that is bad at its job on purpose.
//!
//! Frames arrive as JSON lines (one detector result per line) or as a saved
//! recording. Captions go to stdout, logs to stderr.

use anyhow::Context;
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use fumble::builder::SessionBuilder;
use fumble::config::Config;
use fumble::core::{synth, Frame};
use fumble::effects::LiveEnv;
use fumble::gags::GagConfig;
use fumble::recording::Recording;
use fumble::shell::source::collect_frames;
use fumble::shell::{
    Assets, ConsoleRenderer, FrameSource, JsonLinesSource, Mode, ReplaySource, Runner, SourceError,
};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "fumble", version, about = "Stupid finger counter")]
struct Cli {
    /// JSON config file (defaults apply when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Count fingers with confirmation and gags
    Run(RunArgs),
    /// Count once per 'c' key press, no confirmation or gags
    Snapshot(InputArgs),
    /// Save a JSON-lines stream as a recording
    Record {
        #[command(flatten)]
        input: InputArgs,
        /// Output file; `.json` writes JSON, anything else binary
        #[arg(long, short)]
        output: PathBuf,
    },
    /// Print a synthetic JSON-lines stream holding up `fingers` fingers
    Demo {
        #[arg(long, default_value_t = 3)]
        fingers: u8,
        #[arg(long, default_value_t = 60)]
        frames: usize,
        /// Append a frame with the quit key
        #[arg(long)]
        quit: bool,
    },
}

#[derive(Args, Debug)]
struct InputArgs {
    /// JSON-lines frame stream, `-` for stdin
    #[arg(long, short, default_value = "-", conflicts_with = "replay")]
    input: String,

    /// Saved recording to replay instead
    #[arg(long)]
    replay: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RunArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Seed for reproducible gags
    #[arg(long)]
    seed: Option<u64>,

    /// Override confirmation.required_frames
    #[arg(long)]
    required_frames: Option<u32>,

    /// Switch every gag off
    #[arg(long)]
    no_gags: bool,

    /// Simulate a clock advancing this many ms per frame
    #[arg(long)]
    frame_interval_ms: Option<u64>,

    /// Skip the thinking pauses
    #[arg(long)]
    no_stall: bool,

    /// Print the run summary as JSON when done
    #[arg(long)]
    summary: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fumble=info".into()),
        )
        .init();

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?;

    match cli.command {
        Command::Run(args) => runtime.block_on(run(config, args)),
        Command::Snapshot(input) => runtime.block_on(snapshot(config, input)),
        Command::Record { input, output } => record(&config, &input, &output),
        Command::Demo {
            fingers,
            frames,
            quit,
        } => demo(fingers, frames, quit),
    }
}

async fn run(mut config: Config, args: RunArgs) -> anyhow::Result<()> {
    if let Some(frames) = args.required_frames {
        config.confirmation.required_frames = frames;
    }
    if args.no_gags {
        config.gags = GagConfig::disabled();
    }
    let config = config.validated()?;

    info!(
        required_frames = config.confirmation.required_frames,
        gags = config.gags.enabled,
        "fumble v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    let session = SessionBuilder::from_config(&config).build()?;
    let mut env = match args.seed {
        Some(seed) => LiveEnv::seeded(seed),
        None => LiveEnv::new(),
    }
    .with_assets(Assets::discover(&config.assets));
    if let Some(ms) = args.frame_interval_ms {
        env = env.with_stepped_clock(Utc::now(), Duration::from_millis(ms));
    }
    if args.no_stall {
        env = env.without_stalls();
    }

    let source = open_source(&args.input)?;
    let mut runner = Runner::new(source, ConsoleRenderer::stdout(), env, session);
    let summary = runner.run().await?;

    if args.summary {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    Ok(())
}

async fn snapshot(config: Config, input: InputArgs) -> anyhow::Result<()> {
    let session = SessionBuilder::from_config(&config).build()?;
    let source = open_source(&input)?;
    let mut runner = Runner::new(source, ConsoleRenderer::stdout(), LiveEnv::new(), session)
        .mode(Mode::Snapshot);
    info!("press 'c' to capture and count fingers, 'q' to quit");
    runner.run().await?;
    Ok(())
}

fn record(config: &Config, input: &InputArgs, output: &Path) -> anyhow::Result<()> {
    let mut source = open_source(input)?;
    let frames = collect_frames(&mut source)?;
    let recording = Recording::new(config.capture.resolution(), frames);
    recording.save(output)?;
    info!(
        id = %recording.id,
        frames = recording.frames.len(),
        path = %output.display(),
        "recording saved"
    );
    Ok(())
}

fn demo(fingers: u8, frames: usize, quit: bool) -> anyhow::Result<()> {
    let hand_frame = Frame::new(synth::hands_showing(fingers));
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for _ in 0..frames {
        writeln!(out, "{}", serde_json::to_string(&hand_frame)?)?;
    }
    if quit {
        writeln!(out, "{}", serde_json::to_string(&Frame::empty().with_key('q'))?)?;
    }
    Ok(())
}

fn open_source(input: &InputArgs) -> anyhow::Result<Box<dyn FrameSource>> {
    if let Some(path) = &input.replay {
        let recording = Recording::load(path)
            .with_context(|| format!("failed to load recording {}", path.display()))?;
        info!(id = %recording.id, frames = recording.frames.len(), "replaying recording");
        return Ok(Box::new(ReplaySource::from(recording)));
    }

    let reader: Box<dyn BufRead> = if input.input == "-" {
        Box::new(BufReader::new(std::io::stdin()))
    } else {
        let path = PathBuf::from(&input.input);
        let file = std::fs::File::open(&path).map_err(|source| SourceError::Open {
            path: path.clone(),
            source,
        })?;
        Box::new(BufReader::new(file))
    };
    Ok(Box::new(JsonLinesSource::new(reader)))
}
