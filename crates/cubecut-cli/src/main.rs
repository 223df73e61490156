//! cubecut CLI - split a voxel cube into 3D-printable puzzle pieces.
//!
//! Partitions an N×N×N cube, optionally prints each piece layer by layer,
//! writes a JSON manifest and one declarative document per piece.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use cubecut_ir::DocumentSink;
use cubecut_partition::{AbsorbRule, Partition, SeedStrategy};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod export;

use config::Config;

#[derive(Parser)]
#[command(name = "cubecut")]
#[command(about = "Split a voxel cube into printable puzzle pieces", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Partition a cube and export its pieces
    Split(SplitArgs),
    /// Verify a partition manifest
    Check {
        /// Manifest written by `split --manifest`
        manifest: PathBuf,
        /// Maximum voxels allowed per piece
        #[arg(long)]
        max_piece: Option<usize>,
    },
}

#[derive(Args, Default)]
struct SplitArgs {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Cube side length in voxels
    #[arg(short = 'n', long)]
    size: Option<usize>,
    /// Number of pieces to seed (default: 2N + 2)
    #[arg(short, long)]
    pieces: Option<usize>,
    /// Minimum seed rod length
    #[arg(long)]
    min_seed: Option<usize>,
    /// Maximum voxels per piece
    #[arg(long)]
    max_piece: Option<usize>,
    /// Seeding strategy
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,
    /// How leftover voxels choose a piece
    #[arg(long, value_enum)]
    absorb: Option<AbsorbArg>,
    /// Random seed (default: random, logged at info level)
    #[arg(long)]
    seed: Option<u64>,
    /// Edge length of one voxel in exported documents (mm)
    #[arg(long)]
    unit_mm: Option<f64>,
    /// Directory for per-piece documents
    #[arg(short, long)]
    out: Option<PathBuf>,
    /// File for the partition manifest
    #[arg(long)]
    manifest: Option<PathBuf>,
    /// Print every piece layer by layer
    #[arg(long)]
    print: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    RandomRuns,
    AlternatingRows,
}

impl From<StrategyArg> for SeedStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::RandomRuns => SeedStrategy::RandomRuns,
            StrategyArg::AlternatingRows => SeedStrategy::AlternatingRows,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum AbsorbArg {
    Smallest,
    RandomFace,
}

impl From<AbsorbArg> for AbsorbRule {
    fn from(arg: AbsorbArg) -> Self {
        match arg {
            AbsorbArg::Smallest => AbsorbRule::Smallest,
            AbsorbArg::RandomFace => AbsorbRule::RandomFace,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Split(args) => {
            let config = resolve_config(&args)?;
            split(&config, args.print)?;
        }
        Commands::Check {
            manifest,
            max_piece,
        } => {
            check_manifest(&manifest, max_piece)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Config file (or defaults) with command-line flags layered on top.
fn resolve_config(args: &SplitArgs) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let settings = &mut config.partition;
    if let Some(size) = args.size {
        settings.size = size;
    }
    if let Some(pieces) = args.pieces {
        settings.piece_count = Some(pieces);
    }
    if let Some(min_seed) = args.min_seed {
        settings.min_seed_size = min_seed;
    }
    if let Some(max_piece) = args.max_piece {
        settings.max_piece_size = Some(max_piece);
    }
    if let Some(strategy) = args.strategy {
        settings.strategy = strategy.into();
    }
    if let Some(absorb) = args.absorb {
        settings.absorb = absorb.into();
    }

    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if let Some(unit_mm) = args.unit_mm {
        if unit_mm.is_nan() || unit_mm <= 0.0 {
            anyhow::bail!("--unit-mm must be positive");
        }
        config.export.unit_mm = unit_mm;
    }
    if args.out.is_some() {
        config.export.out_dir = args.out.clone();
    }
    if args.manifest.is_some() {
        config.export.manifest = args.manifest.clone();
    }

    Ok(config)
}

fn split(config: &Config, print: bool) -> Result<Partition> {
    let seed = config.seed.unwrap_or_else(rand::random);
    info!(seed, "seeding random source");
    let rng = StdRng::seed_from_u64(seed);

    let settings = &config.partition;
    let partition = cubecut_partition::partition(settings, rng).with_context(|| {
        format!(
            "cannot split a cube of side {} into {} pieces",
            settings.size,
            settings.effective_piece_count()
        )
    })?;
    partition.verify(settings.max_piece_size)?;

    if print {
        print!("{}", partition.render_layers());
    }
    for piece in &partition.pieces {
        println!("{}: {} voxels", piece.name, piece.voxels.len());
    }

    if let Some(path) = &config.export.manifest {
        fs::write(path, partition.to_json()?)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Wrote manifest to {}", path.display());
    }

    if let Some(dir) = &config.export.out_dir {
        let mut sink = DocumentSink::new(dir)
            .with_context(|| format!("failed to prepare {}", dir.display()))?;
        let count = export::write_pieces(&partition, config.export.unit_mm, &mut sink)?;
        println!("Exported {} pieces to {}", count, dir.display());
    }

    Ok(partition)
}

fn check_manifest(path: &Path, max_piece: Option<usize>) -> Result<()> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let partition = Partition::from_json(&json)
        .with_context(|| format!("{} is not a partition manifest", path.display()))?;
    partition.verify(max_piece)?;
    println!(
        "{}: {} pieces tile a cube of side {}",
        path.display(),
        partition.pieces.len(),
        partition.size
    );
    Ok(())
}
