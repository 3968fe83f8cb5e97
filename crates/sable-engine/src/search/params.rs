//! Search tunables and score constants.

use std::sync::OnceLock;

/// Deepest ply the recursion may reach; also bounds the per-thread stack.
pub const MAX_PLY: usize = 125;

/// Score of delivering mate at the root. Mate found `n` plies deep scores `MATE - n`.
pub const MATE: i32 = 31_000;

/// Bound that no real score can reach.
pub const INFINITE: i32 = MATE + 1;

/// Sentinel for "no static evaluation" (side to move was in check).
pub const NO_SCORE: i32 = MATE + 2;

/// Any score at or beyond this magnitude encodes a forced mate.
pub const MATE_BOUND: i32 = MATE - MAX_PLY as i32;

/// Default depth ceiling when a search request does not name one.
pub const DEFAULT_DEPTH: usize = MAX_PLY - 5;

// Reverse futility pruning
pub const RFP_MARGIN: i32 = 80;
pub const RFP_MAX_DEPTH: i32 = 6;

// Null move pruning
pub const NMP_BASE_REDUCTION: i32 = 3;
pub const NMP_REDUCTION_SCALE: i32 = 4;
pub const NMP_EVAL_SCALE: i32 = 200;
pub const NMP_MIN_DEPTH: i32 = 2;
/// Fail-highs at or above this depth are verified before cutting.
pub const NMP_VERIFICATION_DEPTH: i32 = 14;

// Late move reductions
pub const LMR_MIN_DEPTH: i32 = 2;
const LMR_BASE: f64 = 0.77;
const LMR_DIVISOR: f64 = 2.36;

// Late move pruning
pub const LMP_MIN_MOVES_BASE: i32 = 2;
pub const LMP_MAX_DEPTH: i32 = 8;

// Internal iterative reduction
pub const IIR_MIN_DEPTH: i32 = 6;

// History
pub const BUTTERFLY_MULTIPLIER: i32 = 20;
pub const MAX_HISTORY: i32 = 16_384;
pub const DEFAULT_HISTORY: i32 = 0;

// Aspiration windows
pub const MIN_ASP_WINDOW_DEPTH: usize = 6;
pub const INITIAL_ASP_WINDOW: i32 = 40;
pub const ASP_WIDENING_FACTOR: i32 = 3;

/// Depth used by `bench` when none is given.
pub const BENCH_DEPTH: usize = 12;

const LMR_SIZE: usize = 64;

static LMR_TABLE: OnceLock<[[i32; LMR_SIZE]; LMR_SIZE]> = OnceLock::new();

fn lmr_table() -> &'static [[i32; LMR_SIZE]; LMR_SIZE] {
    LMR_TABLE.get_or_init(|| {
        let mut table = [[0; LMR_SIZE]; LMR_SIZE];
        for (depth, row) in table.iter_mut().enumerate().skip(1) {
            for (moves, r) in row.iter_mut().enumerate().skip(1) {
                *r = (LMR_BASE + (depth as f64).ln() * (moves as f64).ln() / LMR_DIVISOR) as i32;
            }
        }
        table
    })
}

/// Quiet-move reduction in plies for the given remaining depth and move number.
#[inline]
pub fn lmr_reduction(depth: i32, move_count: usize) -> i32 {
    let depth = depth.clamp(0, LMR_SIZE as i32 - 1) as usize;
    lmr_table()[depth][move_count.min(LMR_SIZE - 1)]
}

/// Force the reduction table to be built now rather than on first use.
pub fn init() {
    let _ = lmr_table();
}
