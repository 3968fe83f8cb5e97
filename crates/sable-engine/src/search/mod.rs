//! Alpha-beta search, move ordering and the lazy SMP thread pool.

pub mod history;
pub mod limit;
pub mod negamax;
pub mod ordering;
pub mod params;
pub mod pool;
pub mod see;
pub mod stack;
pub mod thread;
pub mod tt;

use std::time::Duration;

use sable_core::Move;

use params::{MATE, MATE_BOUND};

/// Progress after one completed iteration.
#[derive(Debug, Clone)]
pub struct SearchInfo {
    pub depth: usize,
    pub seldepth: usize,
    /// Centipawns from the side to move, or a mate score.
    pub score: i32,
    /// Nodes searched by every thread so far.
    pub nodes: u64,
    pub nps: u64,
    pub time: Duration,
    /// Table occupancy in per mille.
    pub hashfull: usize,
    pub pv: Vec<Move>,
}

/// Result of a finished search, taken from the last fully completed depth.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// `Move::NULL` only when the root position has no legal moves.
    pub best_move: Move,
    /// Second move of the PV, the expected reply.
    pub ponder_move: Option<Move>,
    pub pv: Vec<Move>,
    pub score: i32,
    pub depth: usize,
    /// Sum of `thread_nodes`.
    pub nodes: u64,
    /// Nodes searched by each thread, primary first.
    pub thread_nodes: Vec<u64>,
}

/// Receives what the primary search thread has to say.
///
/// Runs on the primary search thread; helper threads never report.
pub trait Reporter: Send + 'static {
    /// Called once per completed iterative-deepening depth.
    fn iteration(&mut self, info: &SearchInfo);

    /// Called once when the primary thread has settled on its move.
    fn finished(&mut self, _result: &SearchResult) {}
}

/// A reporter that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Reporter for Silent {
    fn iteration(&mut self, _info: &SearchInfo) {}
}

/// Full moves to mate for a mate score, negative when the side to move is
/// being mated; `None` for an ordinary score.
pub fn mate_in(score: i32) -> Option<i32> {
    if score >= MATE_BOUND {
        Some((MATE - score + 1) / 2)
    } else if score <= -MATE_BOUND {
        Some(-(MATE + score + 1) / 2)
    } else {
        None
    }
}

pub use limit::Limit;
pub use pool::Searcher;
