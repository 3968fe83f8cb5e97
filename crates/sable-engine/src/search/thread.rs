//! Per-thread search state and the iterative deepening driver.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use sable_core::{Board, Move, PositionHistory, generate_legal_moves};

use crate::eval::{EvalKind, Evaluator};
use crate::search::history::HistoryTables;
use crate::search::limit::Limit;
use crate::search::negamax;
use crate::search::params::{ASP_WIDENING_FACTOR, INFINITE, INITIAL_ASP_WINDOW, MATE, MIN_ASP_WINDOW_DEPTH};
use crate::search::stack::SearchStack;
use crate::search::tt::TranspositionTable;
use crate::search::{Reporter, SearchInfo, SearchResult};

/// Nodes between clock reads. Well under a millisecond of search.
const CLOCK_CHECK_INTERVAL: u64 = 256;

/// Everything one search thread owns, plus handles to what it shares.
///
/// Kept alive by the [`Searcher`](crate::search::Searcher) between searches
/// so history tables carry over from move to move.
pub struct ThreadInfo {
    pub id: usize,
    pub tt: Arc<TranspositionTable>,
    stop: Arc<AtomicBool>,
    counters: Arc<[AtomicU64]>,
    /// Nodes searched by this thread in the current search.
    pub nodes: u64,
    pub seldepth: usize,
    /// Depth of the iteration in progress.
    pub root_depth: usize,
    /// Plies below this one may not try a null move.
    pub min_nmp_ply: usize,
    pub history: HistoryTables,
    pub evaluator: Evaluator,
    /// Game history followed by the current search line.
    pub positions: PositionHistory,
    pub limit: Limit,
    pub best_move: Move,
    aborted: bool,
}

impl ThreadInfo {
    pub fn new(
        id: usize,
        tt: Arc<TranspositionTable>,
        stop: Arc<AtomicBool>,
        counters: Arc<[AtomicU64]>,
        eval: EvalKind,
    ) -> ThreadInfo {
        ThreadInfo {
            id,
            tt,
            stop,
            counters,
            nodes: 0,
            seldepth: 0,
            root_depth: 0,
            min_nmp_ply: 0,
            history: HistoryTables::new(),
            evaluator: Evaluator::new(eval),
            positions: PositionHistory::new(),
            limit: Limit::infinite(),
            best_move: Move::NULL,
            aborted: false,
        }
    }

    #[inline]
    pub fn is_main(&self) -> bool {
        self.id == 0
    }

    /// Point this thread at a new search.
    pub fn prepare(
        &mut self,
        tt: Arc<TranspositionTable>,
        stop: Arc<AtomicBool>,
        counters: Arc<[AtomicU64]>,
        positions: &PositionHistory,
        limit: Limit,
    ) {
        self.tt = tt;
        self.stop = stop;
        self.counters = counters;
        self.positions = positions.clone();
        self.limit = limit;
        self.nodes = 0;
        self.seldepth = 0;
        self.root_depth = 0;
        self.min_nmp_ply = 0;
        self.best_move = Move::NULL;
        self.aborted = false;
        self.publish_nodes();
    }

    /// Forget everything learned between searches.
    pub fn reset(&mut self) {
        self.history.clear();
        self.best_move = Move::NULL;
    }

    pub fn set_eval(&mut self, eval: EvalKind) {
        self.evaluator.set_kind(eval);
    }

    /// Count one visited node and publish the running total.
    #[inline]
    pub fn count_node(&mut self, ply: usize) {
        self.nodes += 1;
        self.seldepth = self.seldepth.max(ply);
        self.publish_nodes();
    }

    #[inline]
    fn publish_nodes(&self) {
        if let Some(counter) = self.counters.get(self.id) {
            counter.store(self.nodes, Ordering::Relaxed);
        }
    }

    /// Sum of every thread's node counter.
    pub fn total_nodes(&self) -> u64 {
        self.counters.iter().map(|c| c.load(Ordering::Relaxed)).sum()
    }

    /// Whether the search must unwind now.
    ///
    /// Never true while the first iteration runs, so every search returns
    /// a move. Once tripped it stays tripped and raises the shared flag.
    #[inline]
    pub fn should_stop(&mut self) -> bool {
        if self.aborted {
            return true;
        }
        if self.root_depth <= 1 {
            return false;
        }
        if self.stop.load(Ordering::Relaxed) {
            self.aborted = true;
            return true;
        }
        let clock_due = self.nodes % CLOCK_CHECK_INTERVAL == 0;
        if self.limit.out_of_nodes(self.nodes) || (clock_due && self.limit.out_of_time()) {
            self.aborted = true;
            self.stop.store(true, Ordering::Relaxed);
        }
        self.aborted
    }

    #[inline]
    pub fn aborted(&self) -> bool {
        self.aborted
    }

    fn raise_stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

/// Search one root with a window around `previous`, widening on failure.
fn aspiration(td: &mut ThreadInfo, stack: &mut SearchStack, board: &Board, depth: usize, previous: i32) -> i32 {
    let search_depth = depth as i32;
    if depth < MIN_ASP_WINDOW_DEPTH {
        return negamax::search(td, stack, board, search_depth, 0, -INFINITE, INFINITE);
    }

    let mut delta = INITIAL_ASP_WINDOW;
    let mut alpha = (previous - delta).max(-INFINITE);
    let mut beta = (previous + delta).min(INFINITE);
    loop {
        let score = negamax::search(td, stack, board, search_depth, 0, alpha, beta);
        if td.aborted() {
            return score;
        }

        if score <= alpha && alpha > -INFINITE {
            alpha = (score - delta).max(-INFINITE);
        } else if score >= beta && beta < INFINITE {
            beta = (score + delta).min(INFINITE);
        } else {
            return score;
        }
        delta = delta.saturating_mul(ASP_WIDENING_FACTOR);
    }
}

/// Run iterative deepening on `board` until a limit trips or the depth
/// ceiling is reached. Only the primary thread passes a reporter.
pub fn iterative_deepening(td: &mut ThreadInfo, board: &Board, mut reporter: Option<&mut dyn Reporter>) -> SearchResult {
    let root_moves = generate_legal_moves(board);
    let mut result = SearchResult {
        best_move: Move::NULL,
        ponder_move: None,
        pv: Vec::new(),
        score: 0,
        depth: 0,
        nodes: 0,
        thread_nodes: Vec::new(),
    };

    if root_moves.is_empty() {
        result.score = if board.in_check() { -MATE } else { 0 };
        if td.is_main() {
            td.raise_stop();
        }
        return result;
    }

    if td.positions.last() != Some(board.hash()) {
        td.positions.push(board.hash());
    }
    let mut stack = SearchStack::new();
    td.evaluator.refresh(board);
    let mut previous = 0;

    for depth in 1..=td.limit.depth {
        td.root_depth = depth;
        td.seldepth = 0;

        let score = aspiration(td, &mut stack, board, depth, previous);
        if depth > 1 && td.aborted() {
            break;
        }
        previous = score;

        let pv = stack.at(0).pv.as_slice();
        let best = pv.first().copied().filter(|mv| root_moves.contains(*mv)).unwrap_or(root_moves[0]);
        td.best_move = best;
        result.best_move = best;
        result.pv = if pv.first() == Some(&best) { pv.to_vec() } else { vec![best] };
        result.ponder_move = result.pv.get(1).copied();
        result.score = score;
        result.depth = depth;

        if let Some(reporter) = reporter.as_deref_mut() {
            let time = td.limit.elapsed();
            let nodes = td.total_nodes();
            let millis = time.as_millis().max(1) as u64;
            reporter.iteration(&SearchInfo {
                depth,
                seldepth: td.seldepth,
                score,
                nodes,
                nps: nodes.saturating_mul(1000) / millis,
                time,
                hashfull: td.tt.hashfull(),
                pv: result.pv.clone(),
            });
        }

        if td.limit.out_of_time_soft()
            || td.limit.out_of_nodes_soft(td.nodes)
            || td.limit.out_of_time()
            || td.stop.load(Ordering::Relaxed)
        {
            break;
        }
    }

    if td.is_main() {
        td.raise_stop();
    }
    result.nodes = td.nodes;
    result
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn worker(limit: Limit, root_depth: usize) -> ThreadInfo {
        let mut td = ThreadInfo::new(
            0,
            Arc::new(TranspositionTable::new(1)),
            Arc::new(AtomicBool::new(false)),
            Arc::from([AtomicU64::new(0)]),
            EvalKind::Material,
        );
        td.limit = limit;
        td.root_depth = root_depth;
        td
    }

    #[test]
    fn expired_clock_is_read_within_one_interval() {
        let mut td = worker(Limit::movetime(Duration::ZERO), 2);
        td.nodes = 1;
        let mut visited = 0;
        while !td.should_stop() {
            td.count_node(1);
            visited += 1;
        }
        assert!(visited < CLOCK_CHECK_INTERVAL);
        assert!(td.aborted());
        assert!(td.stop.load(Ordering::Relaxed));
    }

    #[test]
    fn node_ceiling_trips_immediately() {
        let mut td = worker(Limit::nodes(10), 2);
        td.nodes = 9;
        assert!(!td.should_stop());
        td.count_node(1);
        assert!(td.should_stop());
        assert_eq!(td.total_nodes(), 10);
    }

    #[test]
    fn first_iteration_ignores_the_stop_flag() {
        let mut td = worker(Limit::movetime(Duration::ZERO), 1);
        td.stop.store(true, Ordering::Relaxed);
        assert!(!td.should_stop());
        td.root_depth = 2;
        assert!(td.should_stop());
    }
}
