//! Evaluation updated move by move from a stack of accumulators.

use sable_core::{Board, Color, Move, PieceKind, Square, castle_rook_squares};

use crate::eval::phase::PHASE_WEIGHT;
use crate::eval::score::Score;
use crate::eval::{EvalKind, accumulate, finish};
use crate::search::params::MAX_PLY;

#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    /// White-relative piece sum.
    score: Score,
    phase: i32,
}

impl Accumulator {
    #[inline]
    fn add(&mut self, kind: EvalKind, piece: PieceKind, color: Color, sq: Square) {
        self.score += kind.piece_score(piece, color, sq);
        self.phase += PHASE_WEIGHT[piece.index()];
    }

    #[inline]
    fn remove(&mut self, kind: EvalKind, piece: PieceKind, color: Color, sq: Square) {
        self.score -= kind.piece_score(piece, color, sq);
        self.phase -= PHASE_WEIGHT[piece.index()];
    }
}

/// Incrementally updated evaluation along the current search line.
///
/// The search mirrors every `make_move` with [`Evaluator::push`] and every
/// return with [`Evaluator::pop`]. The top of the stack always matches a
/// from-scratch evaluation of the current position.
#[derive(Debug, Clone)]
pub struct Evaluator {
    kind: EvalKind,
    stack: Vec<Accumulator>,
}

impl Evaluator {
    pub fn new(kind: EvalKind) -> Evaluator {
        Evaluator {
            kind,
            stack: Vec::with_capacity(MAX_PLY + 8),
        }
    }

    pub fn kind(&self) -> EvalKind {
        self.kind
    }

    /// Switch evaluation and drop the stack; call [`Evaluator::refresh`] next.
    pub fn set_kind(&mut self, kind: EvalKind) {
        self.kind = kind;
        self.stack.clear();
    }

    /// Rebuild from scratch for `board`, discarding the stack.
    pub fn refresh(&mut self, board: &Board) {
        let (score, phase) = accumulate(board, self.kind);
        self.stack.clear();
        self.stack.push(Accumulator { score, phase });
    }

    /// Push the accumulator for `before.make_move(mv)`.
    pub fn push(&mut self, before: &Board, mv: Move) {
        let mut acc = self.top(before);
        let kind = self.kind;
        let us = before.side_to_move();
        let them = !us;
        let (src, dst) = (mv.source(), mv.dest());

        if let Some(piece) = before.piece_on(src) {
            acc.remove(kind, piece, us, src);

            if mv.is_en_passant() {
                acc.remove(kind, PieceKind::Pawn, them, Square::at(dst.file(), src.rank()));
            } else if let Some(victim) = before.captured_piece(mv) {
                acc.remove(kind, victim, them, dst);
            }

            let placed = if mv.is_promotion() { mv.promotion_piece().to_piece_kind() } else { piece };
            acc.add(kind, placed, us, dst);

            if let Some((rook_src, rook_dst)) = castle_rook_squares(dst).filter(|_| mv.is_castle()) {
                acc.remove(kind, PieceKind::Rook, us, rook_src);
                acc.add(kind, PieceKind::Rook, us, rook_dst);
            }
        }

        self.stack.push(acc);
    }

    /// Push an unchanged accumulator for a null move.
    pub fn push_null(&mut self, board: &Board) {
        let acc = self.top(board);
        self.stack.push(acc);
    }

    pub fn pop(&mut self) {
        self.stack.pop();
    }

    /// Centipawns for the side to move in `board`, the current position.
    pub fn evaluate(&self, board: &Board) -> i32 {
        let acc = self.top(board);
        finish(acc.score, acc.phase, board.side_to_move())
    }

    #[inline]
    fn top(&self, board: &Board) -> Accumulator {
        match self.stack.last() {
            Some(&acc) => acc,
            None => {
                let (score, phase) = accumulate(board, self.kind);
                Accumulator { score, phase }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::evaluate;
    use sable_core::generate_legal_moves;

    fn check_tree(evaluator: &mut Evaluator, board: &Board, depth: usize) {
        assert_eq!(evaluator.evaluate(board), evaluate(board, evaluator.kind()), "{board}");
        if depth == 0 {
            return;
        }
        for &mv in generate_legal_moves(board).as_slice() {
            let child = board.make_move(mv);
            evaluator.push(board, mv);
            check_tree(evaluator, &child, depth - 1);
            evaluator.pop();
            assert_eq!(evaluator.evaluate(board), evaluate(board, evaluator.kind()));
        }
    }

    fn check_positions(kind: EvalKind) {
        let fens = [
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "1r2k3/P7/8/8/8/8/6p1/4K2R w K - 0 1",
            "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1",
            "r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1",
        ];
        for fen in fens {
            let board: Board = fen.parse().unwrap();
            let mut evaluator = Evaluator::new(kind);
            evaluator.refresh(&board);
            check_tree(&mut evaluator, &board, 2);
        }
    }

    #[test]
    fn incremental_matches_scratch_classical() {
        check_positions(EvalKind::Classical);
    }

    #[test]
    fn incremental_matches_scratch_material() {
        check_positions(EvalKind::Material);
    }

    #[test]
    fn null_move_keeps_the_sum_and_flips_the_sign() {
        let board: Board = "4k3/8/8/8/8/8/8/3QK3 w - - 0 1".parse().unwrap();
        let mut evaluator = Evaluator::new(EvalKind::Material);
        evaluator.refresh(&board);
        let passed = board.make_null_move();
        evaluator.push_null(&board);
        assert_eq!(evaluator.evaluate(&passed), -evaluator.evaluate(&board));
        evaluator.pop();
        assert_eq!(evaluator.evaluate(&board), 900);
    }

    #[test]
    fn empty_stack_falls_back_to_scratch() {
        let board: Board = "4k3/8/8/8/8/8/8/R3K3 w - - 0 1".parse().unwrap();
        let evaluator = Evaluator::new(EvalKind::Material);
        assert_eq!(evaluator.evaluate(&board), 500);
    }
}
