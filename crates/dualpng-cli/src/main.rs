//! dualpng - build PNGs that look different with and without gAMA support
//!
//! Levels two images into disjoint channel ranges, interleaves them and
//! writes a PNG whose gAMA chunk decides which one the viewer sees.

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use dualpng_ops::{Filter, LevelRange, MaskMatrix};
use dualpng_session::{parse_mask, parse_range, RegistryConfig, DEFAULT_GAMMA};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "dualpng")]
#[command(author, version, about = "Build dual-gamma PNG images")]
#[command(long_about = "
Builds a PNG that shows one image in viewers that honour the gAMA chunk
and another in viewers that ignore it.

Examples:
  dualpng merge light.jpg dark.png -o dual.png
  dualpng merge a.png b.png -w 1024 -g 1000 -m \"[[1,1],[1,0]]\"
  dualpng merge a.png b.png --r1 0-220 --r2 235-255 --b2 1.2
  dualpng inspect dual.png
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,

    /// Session registry config (YAML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge two images into a dual-gamma PNG
    #[command(visible_alias = "m")]
    Merge(MergeArgs),

    /// Show size, format and gAMA value of an image
    #[command(visible_alias = "i")]
    Inspect(InspectArgs),
}

#[derive(Args)]
struct MergeArgs {
    /// Image shown without gamma correction (default: 500x500 white)
    img1: Option<PathBuf>,

    /// Image revealed by gamma correction (default: black, same size as IMG1)
    img2: Option<PathBuf>,

    /// Output file
    #[arg(short, long, default_value = "output.png")]
    output: PathBuf,

    /// Resize width (0 keeps aspect ratio from height)
    #[arg(short, long, default_value = "0")]
    width: u32,

    /// Resize height (0 keeps aspect ratio from width)
    #[arg(short = 'H', long, default_value = "0")]
    height: u32,

    /// Channel range for the first image
    #[arg(long = "r1", default_value = "0-230", value_parser = parse_range)]
    range1: LevelRange,

    /// Channel range for the second image
    #[arg(long = "r2", default_value = "230-255", value_parser = parse_range)]
    range2: LevelRange,

    /// gAMA value (file gamma x 100000)
    #[arg(short, long, default_value_t = DEFAULT_GAMMA)]
    gamma: u32,

    /// Mask matrix as JSON, e.g. "[[1,1],[1,0]]" (default: checkerboard merge)
    #[arg(short, long, value_parser = parse_mask)]
    mask: Option<MaskMatrix>,

    /// Brightness factor for the first image
    #[arg(long = "b1", default_value = "1.0")]
    brightness1: f64,

    /// Brightness factor for the second image
    #[arg(long = "b2", default_value = "1.0")]
    brightness2: f64,

    /// Resampling filter: nearest, bilinear, bicubic, lanczos3
    #[arg(short, long, default_value = "lanczos3")]
    filter: Filter,

    /// Write a plain PNG without the gAMA chunk
    #[arg(long)]
    no_gamma: bool,
}

#[derive(Args)]
struct InspectArgs {
    /// Input image(s)
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    let config = match &cli.config {
        Some(path) => RegistryConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => RegistryConfig::default(),
    };

    match cli.command {
        Commands::Merge(args) => commands::merge::run(args, config, cli.verbose),
        Commands::Inspect(args) => commands::inspect::run(args),
    }
}
