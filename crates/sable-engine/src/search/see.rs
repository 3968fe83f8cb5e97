//! Static Exchange Evaluation (SEE).
//!
//! Plays out the capture sequence on a move's destination square, each side
//! always recapturing with its least valuable attacker, and compares the
//! material result against a threshold. Sliders uncovered behind a
//! capturing piece join in, and pieces pinned to their own king stay out
//! while the pinning slider is still on the board.

use sable_core::{Bitboard, Board, Color, Move, PieceKind, Square, bishop_attacks, rook_attacks};

/// Piece values used by the exchange, indexed by [`PieceKind::index`].
pub const SEE_VALUE: [i32; PieceKind::COUNT] = [100, 320, 330, 500, 900, 20_000];

#[inline]
fn value(kind: PieceKind) -> i32 {
    SEE_VALUE[kind.index()]
}

/// Return `true` if the exchange started by `mv` nets at least `threshold`
/// for the side to move.
pub fn see(board: &Board, mv: Move, threshold: i32) -> bool {
    if mv.is_castle() {
        return threshold <= 0;
    }

    let from = mv.source();
    let to = mv.dest();
    let us = board.side_to_move();

    let mut swap = board.captured_piece(mv).map_or(0, value) - threshold;
    let mut on_square = board.piece_on(from).unwrap_or(PieceKind::Pawn);
    if mv.is_promotion() {
        let promoted = mv.promotion_piece().to_piece_kind();
        swap += value(promoted) - value(PieceKind::Pawn);
        on_square = promoted;
    }
    if swap < 0 {
        return false;
    }

    swap = value(on_square) - swap;
    if swap <= 0 {
        return true;
    }

    let mut occupied = board.occupied().without(from).with(to);
    if mv.is_en_passant() {
        occupied = occupied.without(Square::at(to.file(), from.rank()));
    }

    let diagonal = board.pieces(PieceKind::Bishop) | board.pieces(PieceKind::Queen);
    let orthogonal = board.pieces(PieceKind::Rook) | board.pieces(PieceKind::Queen);
    let pins = [board.slider_blockers(Color::White), board.slider_blockers(Color::Black)];

    let mut attackers = board.attackers_to(to, occupied);
    let mut stm = us;
    let mut result = true;

    loop {
        stm = !stm;
        attackers &= occupied;

        let mut stm_attackers = attackers & board.side(stm);
        let (blockers, pinners) = pins[stm.index()];
        if (pinners & occupied).is_nonempty() {
            stm_attackers &= !blockers;
        }
        if stm_attackers.is_empty() {
            break;
        }

        result = !result;

        let Some((kind, sq)) = least_valuable(board, stm_attackers) else {
            break;
        };

        if kind == PieceKind::King {
            // The king may only take last: if the other side still attacks, the capture is illegal.
            return if (attackers & board.side(!stm)).is_nonempty() { !result } else { result };
        }

        swap = value(kind) - swap;
        if swap < result as i32 {
            break;
        }

        occupied = occupied.without(sq);
        if matches!(kind, PieceKind::Pawn | PieceKind::Bishop | PieceKind::Queen) {
            attackers |= bishop_attacks(to, occupied) & diagonal;
        }
        if matches!(kind, PieceKind::Rook | PieceKind::Queen) {
            attackers |= rook_attacks(to, occupied) & orthogonal;
        }
    }

    result
}

fn least_valuable(board: &Board, attackers: Bitboard) -> Option<(PieceKind, Square)> {
    PieceKind::ALL
        .into_iter()
        .find_map(|kind| (attackers & board.pieces(kind)).lsb().map(|sq| (kind, sq)))
}
