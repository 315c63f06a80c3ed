//! turnkeeper - console combat tracker

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use turnkeeper::combat::{parse_die_size, CombatStoreBuilder, SeededRoller, TieBreakerRule};
use turnkeeper::shell::Shell;
use turnkeeper::storage::{FileStorage, MemoryStorage, Storage};
use turnkeeper::Config;

/// Turn-based combat tracker
#[derive(Parser, Debug)]
#[command(
    name = "turnkeeper",
    version,
    about = "Track initiative, hit points and status effects for an encounter"
)]
struct Args {
    /// Config file (defaults to ./turnkeeper.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for the saved encounter
    #[arg(long)]
    storage_dir: Option<PathBuf>,

    /// Keep the encounter in memory only
    #[arg(long, conflicts_with = "storage_dir")]
    memory: bool,

    /// Undo history capacity
    #[arg(long)]
    history_limit: Option<usize>,

    /// Initiative die for a fresh encounter, e.g. d20
    #[arg(long)]
    dice: Option<String>,

    /// Tie-breaker rule for a fresh encounter (modifier or name)
    #[arg(long)]
    tie_breaker: Option<String>,

    /// Seed initiative rolls for a reproducible session
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    // Initialize tracing; stdout belongs to the console
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "turnkeeper=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref()).context("Failed to load config")?;
    if let Some(dir) = args.storage_dir {
        config.storage_dir = dir;
    }
    if let Some(limit) = args.history_limit {
        config.history_limit = limit;
    }
    if let Some(dice) = args.dice.as_deref() {
        config.initiative_dice = parse_die_size(dice)?;
    }
    if let Some(rule) = args.tie_breaker.as_deref() {
        config.tie_breaker = TieBreakerRule::from_str(rule)
            .ok_or_else(|| anyhow::anyhow!("Unknown tie-breaker rule: {}", rule))?;
    }

    if args.memory {
        info!("Running without persistence");
        run(config.store_builder(MemoryStorage::new()), args.seed)
    } else {
        let storage = FileStorage::open(&config.storage_dir).with_context(|| {
            format!("Failed to open storage at {}", config.storage_dir.display())
        })?;
        info!("Saving encounter under {}", config.storage_dir.display());
        run(config.store_builder(storage), args.seed)
    }
}

fn run<S: Storage>(builder: CombatStoreBuilder<S>, seed: Option<u64>) -> Result<()> {
    let builder = match seed {
        Some(seed) => builder.dice(SeededRoller::new(seed)),
        None => builder,
    };

    let mut shell = Shell::new(builder.build());
    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    shell.run(stdin.lock(), io::stdout().lock(), interactive)?;

    Ok(())
}
