use std::io::{self, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use sable_engine::bench;
use sable_engine::datagen::{self, DatagenConfig, OutputFormat};
use sable_engine::search::params::BENCH_DEPTH;
use sable_uci::UciEngine;

#[derive(Parser, Debug)]
#[command(author, version, about = "A UCI chess engine", long_about = None)]
struct Args {
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Speak UCI on stdin and stdout (the default)
    Uci,
    /// Search a fixed suite of positions and print the node count
    Bench {
        #[arg(long, default_value_t = BENCH_DEPTH)]
        depth: usize,
    },
    /// Generate self-play training data
    Datagen {
        /// Worker threads, one game at a time each
        #[arg(long, default_value_t = 1)]
        threads: usize,
        /// Games per worker
        #[arg(long)]
        games: usize,
        /// Output directory for the per-thread files
        #[arg(long)]
        out: PathBuf,
        /// `text` lines or packed `viriformat` games
        #[arg(long, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// RNG seed; random when omitted
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();

    let args = Args::parse();
    info!(?args, "sable starting");

    match args.mode.unwrap_or(Mode::Uci) {
        Mode::Uci => UciEngine::stdout()
            .run(BufReader::new(io::stdin()))
            .context("UCI session failed")?,
        Mode::Bench { depth } => {
            let result = bench::run(depth).context("benchmark position did not parse")?;
            println!("{} nodes {} nps", result.nodes, result.nps());
        }
        Mode::Datagen { threads, games, out, format, seed } => {
            let seed = seed.unwrap_or_else(rand::random);
            let config = DatagenConfig { format, ..DatagenConfig::new(threads, games, out, seed) };
            let summary = datagen::run(&config)
                .with_context(|| format!("data generation into {} failed", config.out_dir.display()))?;
            println!("{} games {} positions", summary.games, summary.positions);
        }
    }
    Ok(())
}
