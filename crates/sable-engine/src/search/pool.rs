//! Lazy SMP thread pool for parallel search.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::{self, JoinHandle};

use tracing::{debug, info, warn};

use sable_core::{Board, Move, PositionHistory};

use crate::eval::EvalKind;
use crate::search::limit::Limit;
use crate::search::params;
use crate::search::thread::{ThreadInfo, iterative_deepening};
use crate::search::tt::TranspositionTable;
use crate::search::{Reporter, SearchResult};

/// Default table size in megabytes.
pub const DEFAULT_HASH_MB: usize = 16;
/// Upper bound on search threads.
pub const MAX_THREADS: usize = 256;

/// Recursion is deep and every frame carries a move list.
const SEARCH_STACK_BYTES: usize = 16 * 1024 * 1024;

type Worker = JoinHandle<(Box<ThreadInfo>, SearchResult)>;

/// Owns the shared table and stop flag and runs one primary and any number
/// of helper threads per search.
///
/// Every thread runs its own iterative deepening over a private copy of the
/// position; they cooperate only through the table. Per-thread state lives
/// on between searches and is handed to a fresh OS thread each time.
pub struct Searcher {
    tt: Arc<TranspositionTable>,
    stop: Arc<AtomicBool>,
    counters: Arc<[AtomicU64]>,
    idle: Vec<Box<ThreadInfo>>,
    running: Vec<Worker>,
    threads: usize,
    eval: EvalKind,
}

impl Searcher {
    /// Create a searcher with a `hash_mb` table and `threads` workers.
    pub fn new(hash_mb: usize, threads: usize) -> Searcher {
        params::init();
        let threads = threads.clamp(1, MAX_THREADS);
        let mut searcher = Searcher {
            tt: Arc::new(TranspositionTable::new(hash_mb)),
            stop: Arc::new(AtomicBool::new(false)),
            counters: new_counters(threads),
            idle: Vec::with_capacity(threads),
            running: Vec::new(),
            threads,
            eval: EvalKind::default(),
        };
        searcher.fill_workers();
        searcher
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    pub fn eval(&self) -> EvalKind {
        self.eval
    }

    pub fn is_searching(&self) -> bool {
        !self.running.is_empty()
    }

    /// Begin searching `board` in the background.
    ///
    /// `positions` is the game so far; it should end with `board`'s key.
    /// Any search still running is stopped first. Progress and the final
    /// move go to `reporter` from the primary thread.
    pub fn start<R: Reporter>(&mut self, board: &Board, positions: &PositionHistory, mut limit: Limit, reporter: R) {
        self.stop();
        self.stop.store(false, Ordering::Relaxed);
        self.counters = new_counters(self.threads);
        limit.start();

        info!(threads = self.threads, depth = limit.depth, fen = %board, "search started");

        let mut reporter = Some(reporter);
        let mut workers = std::mem::take(&mut self.idle);
        workers.sort_by_key(|td| td.id);

        for mut td in workers {
            td.prepare(
                Arc::clone(&self.tt),
                Arc::clone(&self.stop),
                Arc::clone(&self.counters),
                positions,
                limit,
            );
            let board = *board;
            let id = td.id;
            let primary_reporter = if td.is_main() { reporter.take() } else { None };

            let spawned = thread::Builder::new()
                .name(format!("search-{id}"))
                .stack_size(SEARCH_STACK_BYTES)
                .spawn(move || match primary_reporter {
                    Some(mut reporter) => {
                        let mut result = iterative_deepening(&mut td, &board, Some(&mut reporter));
                        result.nodes = td.total_nodes();
                        reporter.finished(&result);
                        (td, result)
                    }
                    None => {
                        let result = iterative_deepening(&mut td, &board, None);
                        (td, result)
                    }
                });

            match spawned {
                Ok(handle) => self.running.push(handle),
                Err(error) => warn!(thread = id, %error, "failed to spawn search thread"),
            }
        }
    }

    /// Stop the running search and wait for every thread.
    ///
    /// Returns the primary thread's result, or `None` when nothing was
    /// running. Safe to call at any time.
    pub fn stop(&mut self) -> Option<SearchResult> {
        self.stop.store(true, Ordering::Relaxed);
        self.join()
    }

    /// Wait for the running search to end on its own limits.
    pub fn wait(&mut self) -> Option<SearchResult> {
        self.join()
    }

    /// Search to completion on the calling thread's behalf.
    pub fn search<R: Reporter>(
        &mut self,
        board: &Board,
        positions: &PositionHistory,
        limit: Limit,
        reporter: R,
    ) -> SearchResult {
        self.start(board, positions, limit, reporter);
        self.wait().unwrap_or_else(|| SearchResult {
            best_move: Move::NULL,
            ponder_move: None,
            pv: Vec::new(),
            score: 0,
            depth: 0,
            nodes: 0,
            thread_nodes: Vec::new(),
        })
    }

    fn join(&mut self) -> Option<SearchResult> {
        if self.running.is_empty() {
            return None;
        }

        let mut primary = None;
        for handle in self.running.drain(..) {
            match handle.join() {
                Ok((td, result)) => {
                    if td.is_main() {
                        primary = Some(result);
                    }
                    self.idle.push(td);
                }
                Err(_) => warn!("search thread panicked"),
            }
        }
        self.fill_workers();

        let thread_nodes: Vec<u64> = self.counters.iter().map(|c| c.load(Ordering::Relaxed)).collect();
        primary.map(|mut result| {
            result.nodes = thread_nodes.iter().sum();
            result.thread_nodes = thread_nodes;
            debug!(
                best = %result.best_move,
                depth = result.depth,
                score = result.score,
                nodes = result.nodes,
                "search finished"
            );
            result
        })
    }

    /// Clear the table and every thread's history. Stops any search first.
    pub fn reset(&mut self) {
        self.stop();
        for td in &mut self.idle {
            td.reset();
        }
        self.tt.clear();
    }

    /// Replace the table with an empty one of `mb` megabytes. The old
    /// table is freed here, not at the next search.
    pub fn resize(&mut self, mb: usize) {
        self.stop();
        self.tt = Arc::new(TranspositionTable::new(mb));
        for td in &mut self.idle {
            td.tt = Arc::clone(&self.tt);
        }
        info!(mb, entries = self.tt.len(), "table resized");
    }

    pub fn set_threads(&mut self, threads: usize) {
        self.stop();
        self.threads = threads.clamp(1, MAX_THREADS);
        self.idle.retain(|td| td.id < self.threads);
        self.fill_workers();
        info!(threads = self.threads, "thread count changed");
    }

    pub fn set_eval(&mut self, eval: EvalKind) {
        self.stop();
        self.eval = eval;
        for td in &mut self.idle {
            td.set_eval(eval);
        }
    }

    /// Nodes searched so far by all threads of the current or last search.
    pub fn node_count(&self) -> u64 {
        self.counters.iter().map(|c| c.load(Ordering::Relaxed)).sum()
    }

    /// Table occupancy in per mille.
    pub fn hashfull(&self) -> usize {
        self.tt.hashfull()
    }

    /// Recreate any missing per-thread state so there is one per thread.
    fn fill_workers(&mut self) {
        if self.counters.len() < self.threads {
            self.counters = new_counters(self.threads);
        }
        for id in 0..self.threads {
            if !self.idle.iter().any(|td| td.id == id) {
                self.idle.push(Box::new(ThreadInfo::new(
                    id,
                    Arc::clone(&self.tt),
                    Arc::clone(&self.stop),
                    Arc::clone(&self.counters),
                    self.eval,
                )));
            }
        }
    }
}

fn new_counters(threads: usize) -> Arc<[AtomicU64]> {
    (0..threads).map(|_| AtomicU64::new(0)).collect()
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new(DEFAULT_HASH_MB, 1)
    }
}

impl Drop for Searcher {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for Searcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Searcher")
            .field("tt", &self.tt)
            .field("threads", &self.threads)
            .field("eval", &self.eval)
            .field("searching", &self.is_searching())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::params::{MATE, MATE_BOUND};
    use crate::search::{SearchInfo, Silent};
    use sable_core::generate_legal_moves;
    use std::sync::Mutex;
    use std::time::Duration;

    fn history_for(board: &Board) -> PositionHistory {
        let mut history = PositionHistory::new();
        history.push(board.hash());
        history
    }

    fn search(board: &Board, limit: Limit) -> SearchResult {
        let mut searcher = Searcher::new(4, 1);
        searcher.search(board, &history_for(board), limit, Silent)
    }

    #[derive(Clone, Default)]
    struct Collect(Arc<Mutex<Vec<SearchInfo>>>);

    impl Reporter for Collect {
        fn iteration(&mut self, info: &SearchInfo) {
            if let Ok(mut infos) = self.0.lock() {
                infos.push(info.clone());
            }
        }
    }

    #[test]
    fn depth_one_returns_a_legal_move() {
        let board = Board::starting_position();
        let result = search(&board, Limit::depth(1));
        assert!(generate_legal_moves(&board).contains(result.best_move));
        assert_eq!(result.depth, 1);
    }

    #[test]
    fn expired_clock_still_completes_depth_one() {
        let board: Board = "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3"
            .parse()
            .unwrap();
        let result = search(&board, Limit::movetime(Duration::ZERO));
        assert!(generate_legal_moves(&board).contains(result.best_move));
        assert!(result.depth >= 1);
    }

    #[test]
    fn stalemate_scores_zero_without_a_move() {
        let board: Board = "k7/2K5/1Q6/8/8/8/8/8 b - - 0 1".parse().unwrap();
        let result = search(&board, Limit::depth(3));
        assert_eq!(result.score, 0);
        assert!(result.best_move.is_null());
    }

    #[test]
    fn checkmated_root_scores_mate() {
        let board: Board = "7k/6Q1/5K2/8/8/8/8/8 b - - 0 1".parse().unwrap();
        let result = search(&board, Limit::depth(3));
        assert_eq!(result.score, -MATE);
        assert!(result.best_move.is_null());
    }

    #[test]
    fn finds_back_rank_mate() {
        let board: Board = "6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1".parse().unwrap();
        let result = search(&board, Limit::depth(4));
        assert_eq!(result.best_move.to_uci(), "a1a8");
        assert_eq!(result.score, MATE - 1);
    }

    #[test]
    fn reports_every_completed_depth() {
        let board = Board::starting_position();
        let collect = Collect::default();
        let mut searcher = Searcher::new(4, 1);
        searcher.search(&board, &history_for(&board), Limit::depth(4), collect.clone());
        let infos = collect.0.lock().unwrap();
        let depths: Vec<usize> = infos.iter().map(|i| i.depth).collect();
        assert_eq!(depths, vec![1, 2, 3, 4]);
        assert!(infos.iter().all(|i| !i.pv.is_empty()));
        assert!(infos.windows(2).all(|w| w[0].nodes <= w[1].nodes));
    }

    #[test]
    fn hard_node_limit_is_respected() {
        let board = Board::starting_position();
        let result = search(&board, Limit::nodes(5_000));
        assert!(result.depth >= 1);
        assert!(generate_legal_moves(&board).contains(result.best_move));
    }

    #[test]
    fn stop_is_idempotent() {
        let mut searcher = Searcher::new(1, 2);
        assert!(searcher.stop().is_none());
        let board = Board::starting_position();
        searcher.start(&board, &history_for(&board), Limit::infinite(), Silent);
        std::thread::sleep(Duration::from_millis(20));
        let result = searcher.stop().expect("a search was running");
        assert!(generate_legal_moves(&board).contains(result.best_move));
        assert!(searcher.stop().is_none());
        assert!(!searcher.is_searching());
    }

    #[test]
    fn reset_and_resize_between_searches() {
        let board = Board::starting_position();
        let mut searcher = Searcher::new(1, 1);
        searcher.search(&board, &history_for(&board), Limit::depth(3), Silent);
        assert!(searcher.hashfull() > 0);
        searcher.reset();
        assert_eq!(searcher.hashfull(), 0);
        searcher.resize(2);
        let result = searcher.search(&board, &history_for(&board), Limit::depth(3), Silent);
        assert!(result.score.abs() < MATE_BOUND);
    }

    #[test]
    fn resize_releases_the_old_table() {
        let mut searcher = Searcher::new(1, 3);
        let old = Arc::downgrade(&searcher.tt);
        searcher.resize(2);
        assert!(old.upgrade().is_none());
        assert_eq!(Arc::strong_count(&searcher.tt), 1 + 3);
        assert!(searcher.idle.iter().all(|td| Arc::ptr_eq(&td.tt, &searcher.tt)));
    }

    #[test]
    fn losing_side_heads_for_a_repetition() {
        // Black is a queen up. The knights have danced Nf6-g8, Ng1-f3,
        // Ng8-f6, so Nf3-g1 repeats a position from the game.
        let mut board: Board = "7k/8/5n2/2q5/8/8/8/K5N1 b - - 0 1".parse().unwrap();
        let mut history = history_for(&board);
        for uci in ["f6g8", "g1f3", "g8f6"] {
            let mv = Move::from_uci(uci, &board).unwrap();
            board = board.make_move(mv);
            history.push(board.hash());
        }

        let result = Searcher::new(1, 1).search(&board, &history, Limit::depth(2), Silent);
        assert_eq!(result.best_move.to_uci(), "f3g1");
        assert_eq!(result.score, 0);
    }
}
