//! Self-play training data generation.
//!
//! Every worker thread plays complete games against itself and writes them
//! to its own file, either as text lines or as packed Viriformat games.

mod format;

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use sable_core::{Board, Color, Move, PositionHistory, generate_legal_moves};

pub use format::{DecodeError, GameRecord, GameResult, OutputFormat, UnknownFormat, marlin_header, pack_move};

use crate::search::params::INFINITE;
use crate::search::{Limit, Searcher, Silent};

/// Uniformly random moves played before the engine takes over.
pub const RANDOM_OPENING_MOVES: usize = 8;
pub const SOFT_NODES: u64 = 5_000;
pub const HARD_NODES: u64 = 100_000;
/// Games buffered between flushes to disk.
pub const FLUSH_EVERY: usize = 250;

/// Table size of each worker's private searcher.
const WORKER_HASH_MB: usize = 16;

#[derive(Debug, thiserror::Error)]
pub enum DatagenError {
    #[error("cannot create output directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("cannot write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("worker thread {0} panicked")]
    WorkerPanicked(usize),
}

/// How much data to generate and where.
#[derive(Debug, Clone)]
pub struct DatagenConfig {
    pub threads: usize,
    /// Games per thread.
    pub games: usize,
    pub out_dir: PathBuf,
    /// Base seed; worker `i` uses `seed + i`.
    pub seed: u64,
    pub soft_nodes: u64,
    pub hard_nodes: u64,
    pub format: OutputFormat,
}

impl DatagenConfig {
    pub fn new(threads: usize, games: usize, out_dir: impl Into<PathBuf>, seed: u64) -> DatagenConfig {
        DatagenConfig {
            threads,
            games,
            out_dir: out_dir.into(),
            seed,
            soft_nodes: SOFT_NODES,
            hard_nodes: HARD_NODES,
            format: OutputFormat::Text,
        }
    }

    fn limit(&self) -> Limit {
        Limit::nodes(self.hard_nodes).with_soft_nodes(self.soft_nodes)
    }
}

/// Totals over all workers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DatagenSummary {
    pub games: usize,
    pub positions: usize,
}

/// Run every worker to completion and return the totals.
pub fn run(config: &DatagenConfig) -> Result<DatagenSummary, DatagenError> {
    fs::create_dir_all(&config.out_dir).map_err(|source| DatagenError::CreateDir {
        path: config.out_dir.clone(),
        source,
    })?;
    info!(
        threads = config.threads,
        games = config.games,
        format = %config.format,
        out = %config.out_dir.display(),
        "datagen started"
    );

    let handles: Vec<_> = (0..config.threads.max(1))
        .map(|id| {
            let path = config.out_dir.join(format!("thread{id}.{}", config.format.extension()));
            let worker = Worker {
                id,
                games: config.games,
                seed: config.seed.wrapping_add(id as u64),
                limit: config.limit(),
                format: config.format,
            };
            thread::spawn(move || worker.run(&path))
        })
        .collect();

    let mut summary = DatagenSummary::default();
    for (id, handle) in handles.into_iter().enumerate() {
        let worker = handle.join().map_err(|_| DatagenError::WorkerPanicked(id))??;
        summary.games += worker.games;
        summary.positions += worker.positions;
    }

    info!(games = summary.games, positions = summary.positions, "datagen finished");
    Ok(summary)
}

/// One worker's share of the run.
struct Worker {
    id: usize,
    games: usize,
    seed: u64,
    limit: Limit,
    format: OutputFormat,
}

impl Worker {
    fn run(self, path: &Path) -> Result<DatagenSummary, DatagenError> {
        let write_error = |source| DatagenError::Write { path: path.to_path_buf(), source };

        let file = File::options().create(true).append(true).open(path).map_err(write_error)?;
        let mut out = BufWriter::new(file);
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut searcher = Searcher::new(WORKER_HASH_MB, 1);

        let mut summary = DatagenSummary::default();
        let mut buffer = Vec::with_capacity(FLUSH_EVERY);
        let started = Instant::now();

        while summary.games < self.games {
            searcher.reset();
            let Some(record) = play_game(&mut searcher, &mut rng, self.limit) else {
                continue;
            };
            summary.games += 1;
            summary.positions += record.moves.len();
            buffer.push(record);

            if buffer.len() >= FLUSH_EVERY {
                self.flush(&mut out, &mut buffer).map_err(write_error)?;
                let rate = summary.positions as f64 / started.elapsed().as_secs_f64().max(1e-3);
                info!(
                    thread = self.id,
                    games = summary.games,
                    positions = summary.positions,
                    rate = rate as u64,
                    "datagen progress"
                );
            }
        }

        self.flush(&mut out, &mut buffer).map_err(write_error)?;
        debug!(thread = self.id, games = summary.games, "datagen worker done");
        Ok(summary)
    }

    fn flush(&self, out: &mut BufWriter<File>, buffer: &mut Vec<GameRecord>) -> io::Result<()> {
        for record in buffer.drain(..) {
            record.write(self.format, out)?;
        }
        out.flush()
    }
}

/// Whether the game is over at `board`, with `positions` ending at its key.
fn game_over(board: &Board, positions: &PositionHistory) -> bool {
    generate_legal_moves(board).is_empty()
        || board.is_halfmove_draw()
        || board.is_insufficient_material()
        || positions.is_repetition(board.halfmove_clock(), 2)
}

/// Result of a finished game. Only a mated side loses; every other ending
/// is a draw.
fn outcome(board: &Board) -> GameResult {
    let mated = board.in_check() && generate_legal_moves(board).is_empty();
    match (mated, board.side_to_move()) {
        (false, _) => GameResult::Draw,
        (true, Color::White) => GameResult::BlackWin,
        (true, Color::Black) => GameResult::WhiteWin,
    }
}

/// Play one game. `None` when the random opening already ended it.
fn play_game(searcher: &mut Searcher, rng: &mut StdRng, limit: Limit) -> Option<GameRecord> {
    let mut board = Board::starting_position();
    let mut positions = PositionHistory::new();
    positions.push(board.hash());

    for _ in 0..RANDOM_OPENING_MOVES {
        let moves = generate_legal_moves(&board);
        if moves.is_empty() {
            return None;
        }
        board = board.make_move(moves[rng.random_range(0..moves.len())]);
        positions.push(board.hash());
        if game_over(&board, &positions) {
            return None;
        }
    }

    let mut record = GameRecord::new(board);

    while !game_over(&board, &positions) {
        let result = searcher.search(&board, &positions, limit, Silent);
        if result.best_move == Move::NULL {
            warn!(fen = %board, "search returned no move");
            break;
        }
        // INFINITE fits in an i16, so the clamp makes the cast exact.
        let score = result.score.clamp(-INFINITE, INFINITE) as i16;
        let white_score = match board.side_to_move() {
            Color::White => score,
            Color::Black => -score,
        };

        record.moves.push((result.best_move, white_score));
        board = board.make_move(result.best_move);
        positions.push(board.hash());
    }

    record.result = outcome(&board);
    Some(record)
}
