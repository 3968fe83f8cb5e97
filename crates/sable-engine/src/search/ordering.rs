//! Move ordering: table move, MVV-LVA, killer, then history.

use sable_core::{Board, Move, MoveList, PieceKind, PromotionPiece};

use crate::search::history::{HistoryTables, PieceTo};

/// Score given to the table move; always searched first.
pub const TT_MOVE_SCORE: i32 = 100_000_000;
/// Floor of the capture and promotion band.
const NOISY_SCORE: i32 = 10_000_000;
/// Distance between neighbouring MVV-LVA steps; wider than any capture history value.
const MVV_LVA_STEP: i32 = 100_000;
/// Killer moves rank below every capture and above every other quiet.
pub const KILLER_SCORE: i32 = 1_000_000;

/// MVV-LVA indexed by `[victim][attacker]`.
#[rustfmt::skip]
const MVV_LVA: [[i32; PieceKind::COUNT]; PieceKind::COUNT] = [
    [15, 14, 13, 12, 11, 10], // victim pawn
    [25, 24, 23, 22, 21, 20], // victim knight
    [35, 34, 33, 32, 31, 30], // victim bishop
    [45, 44, 43, 42, 41, 40], // victim rook
    [55, 54, 53, 52, 51, 50], // victim queen
    [0,  0,  0,  0,  0,  0],  // victim king
];

#[inline]
pub fn mvv_lva(victim: PieceKind, attacker: PieceKind) -> i32 {
    MVV_LVA[victim.index()][attacker.index()]
}

/// Extra MVV-LVA steps granted for promoting.
const fn promotion_bonus(piece: PromotionPiece) -> i32 {
    match piece {
        PromotionPiece::Queen => 50,
        PromotionPiece::Knight => 0,
        PromotionPiece::Rook | PromotionPiece::Bishop => -10,
    }
}

/// Everything besides the position that move scoring reads.
pub struct OrderContext<'a> {
    pub tt_move: Move,
    pub killer: Move,
    pub history: &'a HistoryTables,
    /// The move that led to this node, if it was a real move.
    pub prev: Option<PieceTo>,
}

/// Ordering score for `mv`; higher is searched earlier.
pub fn score_move(board: &Board, mv: Move, ctx: &OrderContext<'_>) -> i32 {
    if mv == ctx.tt_move {
        return TT_MOVE_SCORE;
    }

    let us = board.side_to_move();
    let attacker = board.piece_on(mv.source()).unwrap_or(PieceKind::Pawn);
    let victim = board.captured_piece(mv);

    if victim.is_some() || mv.is_promotion() {
        let mut steps = victim.map_or(0, |v| mvv_lva(v, attacker));
        if mv.is_promotion() {
            steps += promotion_bonus(mv.promotion_piece());
        }
        let history = victim.map_or(0, |v| ctx.history.capture(us, attacker, v, mv.dest()));
        return NOISY_SCORE + steps * MVV_LVA_STEP + history;
    }

    if mv == ctx.killer {
        return KILLER_SCORE;
    }

    let current = PieceTo { color: us, piece: attacker, to: mv.dest() };
    ctx.history.quiet(us, mv) + ctx.prev.map_or(0, |prev| ctx.history.continuation(prev, current))
}

/// Lazily sorted move list.
///
/// Each call to [`MovePicker::next`] swaps the best remaining move into
/// place, so a node that cuts off early never pays for a full sort.
pub struct MovePicker {
    moves: [Move; 256],
    scores: [i32; 256],
    quiet: [bool; 256],
    len: usize,
    cursor: usize,
    skip_quiets: bool,
}

impl MovePicker {
    pub fn new(board: &Board, list: &MoveList, ctx: &OrderContext<'_>) -> MovePicker {
        let mut picker = MovePicker {
            moves: [Move::NULL; 256],
            scores: [0; 256],
            quiet: [false; 256],
            len: list.len(),
            cursor: 0,
            skip_quiets: false,
        };
        for (i, &mv) in list.as_slice().iter().enumerate() {
            picker.moves[i] = mv;
            picker.scores[i] = score_move(board, mv, ctx);
            picker.quiet[i] = !board.is_capture(mv) && !mv.is_promotion();
        }
        picker
    }

    /// Stop yielding quiet moves from now on.
    pub fn skip_quiets(&mut self) {
        self.skip_quiets = true;
    }

    /// Number of moves the picker was built with.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Iterator for MovePicker {
    type Item = Move;

    fn next(&mut self) -> Option<Move> {
        loop {
            if self.cursor >= self.len {
                return None;
            }

            let best = (self.cursor..self.len).max_by_key(|&i| self.scores[i])?;
            self.moves.swap(self.cursor, best);
            self.scores.swap(self.cursor, best);
            self.quiet.swap(self.cursor, best);

            let i = self.cursor;
            self.cursor += 1;
            if self.skip_quiets && self.quiet[i] {
                continue;
            }
            return Some(self.moves[i]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sable_core::{Color, Square, generate_legal_moves};

    fn picked(board: &Board, ctx: &OrderContext<'_>) -> Vec<Move> {
        MovePicker::new(board, &generate_legal_moves(board), ctx).collect()
    }

    #[test]
    fn table_move_first_then_captures_by_mvv_lva() {
        // Nxd7 wins a queen, Bxa8 a rook, Nxf7 a pawn.
        let board: Board = "r3k3/3q1p2/8/4N3/8/8/6B1/4K3 w - - 0 1".parse().unwrap();
        let history = HistoryTables::new();
        let quiet = Move::new(Square::E1, Square::F2);
        let ctx = OrderContext { tt_move: quiet, killer: Move::NULL, history: &history, prev: None };
        let order = picked(&board, &ctx);

        assert_eq!(order[0], quiet);
        assert_eq!(order[1], Move::new(Square::E5, Square::D7));
        assert_eq!(order[2], Move::new(Square::G2, Square::A8));
        assert_eq!(order[3], Move::new(Square::E5, Square::F7));
        assert!(order[4..].iter().all(|&m| !board.is_capture(m)));
    }

    #[test]
    fn killer_follows_captures_and_leads_quiets() {
        let board: Board = "4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1".parse().unwrap();
        let history = HistoryTables::new();
        let killer = Move::new(Square::E1, Square::D2);
        let ctx = OrderContext { tt_move: Move::NULL, killer, history: &history, prev: None };
        let order = picked(&board, &ctx);
        assert_eq!(order[0], Move::new(Square::E4, Square::D5));
        assert_eq!(order[1], killer);
    }

    #[test]
    fn history_orders_quiets() {
        let board = Board::starting_position();
        let mut history = HistoryTables::new();
        let favourite = Move::new(Square::B1, Square::C3);
        history.update_quiet(Color::White, favourite, 2000);
        let disliked = Move::new(Square::E2, Square::E4);
        history.update_quiet(Color::White, disliked, -2000);
        let ctx = OrderContext { tt_move: Move::NULL, killer: Move::NULL, history: &history, prev: None };
        let order = picked(&board, &ctx);
        assert_eq!(order[0], favourite);
        assert_eq!(*order.last().unwrap(), disliked);
    }

    #[test]
    fn skip_quiets_yields_only_noisy_moves() {
        let board: Board = "4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1".parse().unwrap();
        let history = HistoryTables::new();
        let ctx = OrderContext { tt_move: Move::NULL, killer: Move::NULL, history: &history, prev: None };
        let mut picker = MovePicker::new(&board, &generate_legal_moves(&board), &ctx);
        picker.skip_quiets();
        let rest: Vec<Move> = picker.collect();
        assert_eq!(rest, vec![Move::new(Square::E4, Square::D5)]);
    }

    #[test]
    fn picker_yields_every_move_once() {
        let board: Board = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1"
            .parse()
            .unwrap();
        let history = HistoryTables::new();
        let ctx = OrderContext { tt_move: Move::NULL, killer: Move::NULL, history: &history, prev: None };
        let moves = generate_legal_moves(&board);
        let mut order = picked(&board, &ctx);
        assert_eq!(order.len(), moves.len());
        order.sort_by_key(|m| m.raw());
        order.dedup();
        assert_eq!(order.len(), moves.len());
    }
}
