//! Fixed-depth benchmark over a suite of positions.
//!
//! The node total is a signature of the search: any functional change to
//! pruning, ordering or evaluation changes it.

use std::time::{Duration, Instant};

use tracing::debug;

use sable_core::{Board, FenError, PositionHistory};

use crate::search::pool::DEFAULT_HASH_MB;
use crate::search::{Limit, Searcher, Silent};

/// Positions searched by [`run`], a mix of openings, middlegames and endings.
pub const BENCH_FENS: &[&str] = &[
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
    "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
    "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
    "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4",
    "r2q1rk1/ppp2ppp/2n1bn2/2bpp3/4P3/2PP1NP1/PP1N1PBP/R1BQ1RK1 b - - 0 8",
    "2r3k1/pp3ppp/4p3/3pP3/3P4/P3Q3/1P3PPP/2q3K1 w - - 0 25",
    "6k1/5p2/6p1/8/7p/8/6PP/6K1 b - - 0 1",
    "8/8/1p1k4/p1p5/P1P2K2/1P6/8/8 w - - 0 1",
    "4k3/8/8/8/8/8/4P3/4K3 w - - 5 39",
];

/// Totals of one benchmark run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenchResult {
    pub nodes: u64,
    pub time: Duration,
}

impl BenchResult {
    pub fn nps(&self) -> u64 {
        let millis = self.time.as_millis().max(1) as u64;
        self.nodes.saturating_mul(1000) / millis
    }
}

/// Search every [`BENCH_FENS`] position to `depth` on one thread with a
/// fresh table each time.
pub fn run(depth: usize) -> Result<BenchResult, FenError> {
    let mut nodes = 0;
    let mut time = Duration::ZERO;

    for fen in BENCH_FENS {
        let board: Board = fen.parse()?;
        let mut positions = PositionHistory::new();
        positions.push(board.hash());

        let mut searcher = Searcher::new(DEFAULT_HASH_MB, 1);
        let started = Instant::now();
        let result = searcher.search(&board, &positions, Limit::depth(depth), Silent);
        time += started.elapsed();
        nodes += result.nodes;

        debug!(fen, best = %result.best_move, nodes = result.nodes, "bench position");
    }

    Ok(BenchResult { nodes, time })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suite_parses() {
        for fen in BENCH_FENS {
            assert!(fen.parse::<Board>().is_ok(), "{fen}");
        }
    }

    #[test]
    fn shallow_bench_is_reproducible() {
        let first = run(3).unwrap();
        let second = run(3).unwrap();
        assert!(first.nodes > 0);
        assert_eq!(first.nodes, second.nodes);
    }

    #[test]
    fn nps_never_divides_by_zero() {
        let result = BenchResult { nodes: 500, time: Duration::ZERO };
        assert_eq!(result.nps(), 500_000);
    }
}
