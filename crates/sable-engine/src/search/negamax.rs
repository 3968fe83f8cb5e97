//! Negamax alpha-beta search with quiescence.

use sable_core::{Board, Move, MoveList, PieceKind, generate_captures, generate_legal_moves};

use crate::search::history::PieceTo;
use crate::search::ordering::{MovePicker, OrderContext};
use crate::search::params::{
    BUTTERFLY_MULTIPLIER, IIR_MIN_DEPTH, INFINITE, LMP_MAX_DEPTH, LMP_MIN_MOVES_BASE, LMR_MIN_DEPTH,
    MATE, MATE_BOUND, MAX_PLY, NMP_BASE_REDUCTION, NMP_EVAL_SCALE, NMP_MIN_DEPTH, NMP_REDUCTION_SCALE,
    NMP_VERIFICATION_DEPTH, NO_SCORE, RFP_MARGIN, RFP_MAX_DEPTH, lmr_reduction,
};
use crate::search::see::see;
use crate::search::stack::SearchStack;
use crate::search::thread::ThreadInfo;
use crate::search::tt::{Bound, TtEntry, score_from_tt, score_to_tt};

/// A node is on the principal variation when its window is wider than null.
#[inline]
fn is_pv_window(alpha: i32, beta: i32) -> bool {
    beta - alpha > 1
}

#[inline]
fn moved_piece(board: &Board, mv: Move) -> PieceTo {
    PieceTo {
        color: board.side_to_move(),
        piece: board.piece_on(mv.source()).unwrap_or(PieceKind::Pawn),
        to: mv.dest(),
    }
}

/// Play `mv` on the thread's bookkeeping: repetition keys and evaluator.
#[inline]
fn enter(td: &mut ThreadInfo, board: &Board, mv: Move) -> Board {
    let child = board.make_move(mv);
    td.positions.push(child.hash());
    td.evaluator.push(board, mv);
    child
}

#[inline]
fn leave(td: &mut ThreadInfo) {
    td.evaluator.pop();
    td.positions.pop();
}

/// Negamax alpha-beta search.
///
/// Returns the score of `board` for the side to move. On PV nodes the best
/// line is left in `stack.at(ply).pv`. A score returned after the thread
/// aborted is meaningless and must be discarded by the caller.
pub fn search(
    td: &mut ThreadInfo,
    stack: &mut SearchStack,
    board: &Board,
    mut depth: i32,
    ply: usize,
    mut alpha: i32,
    beta: i32,
) -> i32 {
    let is_pv = is_pv_window(alpha, beta);
    let root = ply == 0;
    if is_pv {
        stack.at_mut(ply).pv.clear();
    }

    if depth <= 0 {
        return qsearch(td, stack, board, ply, alpha, beta);
    }

    td.count_node(ply);
    if td.should_stop() {
        return 0;
    }

    // Draws by repetition, fifty-move rule or bare material
    if !root
        && (td.positions.is_repetition(board.halfmove_clock(), 1)
            || board.is_halfmove_draw()
            || board.is_insufficient_material())
    {
        return 0;
    }

    if ply >= MAX_PLY {
        return td.evaluator.evaluate(board);
    }

    // Probe transposition table
    let hash = board.hash();
    let entry = td.tt.probe(hash);
    let tt_hit = entry.key == hash && entry.bound != Bound::None;
    let tt_move = if tt_hit { entry.mv } else { Move::NULL };
    if !is_pv && tt_hit && entry.depth as i32 >= depth {
        let tt_score = score_from_tt(entry.score, ply);
        if entry.cuts(tt_score, alpha, beta) {
            return tt_score;
        }
    }

    let in_check = board.in_check();
    let us = board.side_to_move();
    let eval = if in_check { NO_SCORE } else { td.evaluator.evaluate(board) };
    stack.at_mut(ply).static_eval = eval;
    stack.at_mut(ply + 1).killer = Move::NULL;
    let improving = !in_check && stack.eval_two_back(ply).is_some_and(|earlier| eval > earlier);

    if !is_pv && !in_check {
        // Reverse futility pruning
        if depth <= RFP_MAX_DEPTH && eval - RFP_MARGIN * (depth - i32::from(improving)) >= beta {
            return eval;
        }

        // Null move pruning, never twice in a row
        if depth >= NMP_MIN_DEPTH
            && eval >= beta
            && ply >= td.min_nmp_ply
            && board.has_non_pawn_material(us)
            && stack.parent(ply).played.is_some()
        {
            let reduction =
                NMP_BASE_REDUCTION + depth / NMP_REDUCTION_SCALE + ((eval - beta) / NMP_EVAL_SCALE).min(3);

            stack.at_mut(ply).played = None;
            let child = board.make_null_move();
            td.positions.push(child.hash());
            td.evaluator.push_null(board);
            let score = -search(td, stack, &child, depth - reduction, ply + 1, -beta, -beta + 1);
            leave(td);

            if td.aborted() {
                return 0;
            }

            if score >= beta {
                let score = if score >= MATE_BOUND { beta } else { score };
                if td.min_nmp_ply == 0 && depth < NMP_VERIFICATION_DEPTH {
                    return score;
                }

                // Zugzwang check: search the real position shallower with
                // null moves disabled for the next few plies.
                let saved = td.min_nmp_ply;
                td.min_nmp_ply = ply + (3 * (depth - reduction) / 4).max(0) as usize;
                let verified = search(td, stack, board, depth - reduction, ply, beta - 1, beta);
                td.min_nmp_ply = saved;

                if td.aborted() {
                    return 0;
                }
                if verified >= beta {
                    return score;
                }
            }
        }

        // Internal iterative reduction
        if tt_move.is_null() && depth >= IIR_MIN_DEPTH {
            depth -= 1;
        }
    }

    let moves = generate_legal_moves(board);
    if moves.is_empty() {
        return if in_check { -MATE + ply as i32 } else { 0 };
    }

    let mut picker = MovePicker::new(
        board,
        &moves,
        &OrderContext {
            tt_move,
            killer: stack.at(ply).killer,
            history: &td.history,
            prev: stack.parent(ply).played,
        },
    );

    let lmp_threshold = (LMP_MIN_MOVES_BASE + depth * depth) / (2 - i32::from(improving));
    let mut best_score = -INFINITE;
    let mut best_move = Move::NULL;
    let mut bound = Bound::UpperBound;
    let mut move_count = 0usize;
    let mut quiets = MoveList::new();
    let mut captures = MoveList::new();

    while let Some(mv) = picker.next() {
        if td.should_stop() {
            return best_score;
        }

        let is_quiet = !board.is_capture(mv) && !mv.is_promotion();

        // Late move pruning
        if !is_pv && !in_check && is_quiet && depth <= LMP_MAX_DEPTH && quiets.len() as i32 >= lmp_threshold {
            picker.skip_quiets();
            continue;
        }

        stack.at_mut(ply).played = Some(moved_piece(board, mv));
        let child = enter(td, board, mv);
        move_count += 1;
        let new_depth = depth - 1;

        let mut score;
        if move_count == 1 {
            score = -search(td, stack, &child, new_depth, ply + 1, -beta, -alpha);
        } else {
            // Late move reductions for quiet moves that do not check
            let reduction = if depth >= LMR_MIN_DEPTH && is_quiet && !child.in_check() {
                (lmr_reduction(depth, move_count) + i32::from(!is_pv)).clamp(0, new_depth - 1)
            } else {
                0
            };

            score = -search(td, stack, &child, new_depth - reduction, ply + 1, -alpha - 1, -alpha);
            if reduction > 0 && score > alpha {
                score = -search(td, stack, &child, new_depth, ply + 1, -alpha - 1, -alpha);
            }
            if is_pv && score > alpha {
                score = -search(td, stack, &child, new_depth, ply + 1, -beta, -alpha);
            }
        }
        leave(td);

        if td.aborted() {
            return best_score;
        }

        if score > best_score {
            best_score = score;
            if score > alpha {
                alpha = score;
                best_move = mv;
                bound = Bound::Exact;
                if is_pv {
                    stack.update_pv(ply, mv);
                }
                if score >= beta {
                    bound = Bound::LowerBound;
                    update_histories(td, stack, board, ply, depth, mv, &quiets, &captures);
                    break;
                }
            }
        }

        if is_quiet {
            quiets.push(mv);
        } else if board.is_capture(mv) {
            captures.push(mv);
        }
    }

    // Keep the old move as an ordering hint when nothing raised alpha
    let stored_move = if best_move.is_null() { tt_move } else { best_move };
    td.tt.store(TtEntry {
        key: hash,
        mv: stored_move,
        score: score_to_tt(best_score, ply),
        bound,
        depth: depth.clamp(0, u8::MAX as i32) as u8,
    });

    best_score
}

/// Reward the move that failed high and punish the moves tried before it.
#[allow(clippy::too_many_arguments)]
fn update_histories(
    td: &mut ThreadInfo,
    stack: &mut SearchStack,
    board: &Board,
    ply: usize,
    depth: i32,
    best: Move,
    quiets: &MoveList,
    captures: &MoveList,
) {
    let us = board.side_to_move();
    let bonus = BUTTERFLY_MULTIPLIER * depth * depth;
    let prev = stack.parent(ply).played;

    if let Some(victim) = board.captured_piece(best) {
        let attacker = moved_piece(board, best).piece;
        td.history.update_capture(us, attacker, victim, best.dest(), bonus);
    } else if !best.is_promotion() {
        stack.at_mut(ply).killer = best;
        td.history.update_quiet(us, best, bonus);
        if let Some(prev) = prev {
            td.history.update_continuation(prev, moved_piece(board, best), bonus);
        }

        for &mv in quiets {
            td.history.update_quiet(us, mv, -bonus);
            if let Some(prev) = prev {
                td.history.update_continuation(prev, moved_piece(board, mv), -bonus);
            }
        }
    }

    for &mv in captures {
        if let Some(victim) = board.captured_piece(mv) {
            let attacker = moved_piece(board, mv).piece;
            td.history.update_capture(us, attacker, victim, mv.dest(), -bonus);
        }
    }
}

/// Quiescence search: captures and promotions only, or every evasion when
/// in check, on top of a stand-pat floor.
pub fn qsearch(td: &mut ThreadInfo, stack: &mut SearchStack, board: &Board, ply: usize, mut alpha: i32, beta: i32) -> i32 {
    let is_pv = is_pv_window(alpha, beta);

    td.count_node(ply);
    if td.should_stop() {
        return 0;
    }

    let in_check = board.in_check();
    if ply >= MAX_PLY {
        return if in_check { 0 } else { td.evaluator.evaluate(board) };
    }

    // Probe transposition table
    let hash = board.hash();
    let entry = td.tt.probe(hash);
    let tt_hit = entry.key == hash && entry.bound != Bound::None;
    let tt_move = if tt_hit { entry.mv } else { Move::NULL };
    if !is_pv && tt_hit {
        let tt_score = score_from_tt(entry.score, ply);
        if entry.cuts(tt_score, alpha, beta) {
            return tt_score;
        }
    }

    let (mut best_score, moves) = if in_check {
        let evasions = generate_legal_moves(board);
        if evasions.is_empty() {
            return -MATE + ply as i32;
        }
        (-INFINITE, evasions)
    } else {
        // Stand pat: the side to move may decline every capture
        let stand_pat = td.evaluator.evaluate(board);
        if stand_pat >= beta {
            return stand_pat;
        }
        alpha = alpha.max(stand_pat);
        (stand_pat, generate_captures(board))
    };

    let picker = MovePicker::new(
        board,
        &moves,
        &OrderContext {
            tt_move,
            killer: Move::NULL,
            history: &td.history,
            prev: stack.parent(ply).played,
        },
    );

    let mut best_move = Move::NULL;
    let mut bound = Bound::UpperBound;

    for mv in picker {
        // Skip captures that lose material
        if !in_check && !see(board, mv, 0) {
            continue;
        }

        stack.at_mut(ply).played = Some(moved_piece(board, mv));
        let child = enter(td, board, mv);
        let score = -qsearch(td, stack, &child, ply + 1, -beta, -alpha);
        leave(td);

        if td.aborted() {
            return best_score;
        }

        if score > best_score {
            best_score = score;
            if score > alpha {
                alpha = score;
                best_move = mv;
                bound = Bound::Exact;
                if score >= beta {
                    bound = Bound::LowerBound;
                    break;
                }
            }
        }
    }

    let stored_move = if best_move.is_null() { tt_move } else { best_move };
    td.tt.store(TtEntry {
        key: hash,
        mv: stored_move,
        score: score_to_tt(best_score, ply),
        bound,
        depth: 0,
    });

    best_score
}
