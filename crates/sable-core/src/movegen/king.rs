//! King move and castling generation.

use crate::attacks::{between, king_attacks};
use crate::board::Board;
use crate::castle_rights::CastleRights;
use crate::chess_move::Move;
use crate::piece::Color;
use crate::square::Square;

use super::{GenContext, GenMode, MoveList};

/// Castling right, king destination, and the square the king passes over.
const CASTLES: [(Color, CastleRights, Square, Square, Square); 4] = [
    (Color::White, CastleRights::WHITE_KING, Square::H1, Square::G1, Square::F1),
    (Color::White, CastleRights::WHITE_QUEEN, Square::A1, Square::C1, Square::D1),
    (Color::Black, CastleRights::BLACK_KING, Square::H8, Square::G8, Square::F8),
    (Color::Black, CastleRights::BLACK_QUEEN, Square::A8, Square::C8, Square::D8),
];

/// Generate legal king moves, plus castling in full generation mode.
pub(super) fn gen_king(board: &Board, ctx: &GenContext, list: &mut MoveList) {
    let us = board.side_to_move();
    let them = !us;
    let king_sq = ctx.king_sq;
    // Sliders must see through the king so it cannot hide behind itself.
    let occupied_no_king = board.occupied() ^ king_sq.bitboard();

    for dst in king_attacks(king_sq) & ctx.targets {
        if (board.attackers_to(dst, occupied_no_king) & board.side(them)).is_empty() {
            list.push(Move::new(king_sq, dst));
        }
    }

    if ctx.mode == GenMode::Captures || ctx.checkers.is_nonempty() {
        return;
    }

    let occupied = board.occupied();
    for (color, right, rook_sq, king_dst, transit) in CASTLES {
        if color != us || !board.castling().contains(right) {
            continue;
        }
        if (between(king_sq, rook_sq) & occupied).is_nonempty() {
            continue;
        }
        if board.is_square_attacked(transit, them) || board.is_square_attacked(king_dst, them) {
            continue;
        }
        list.push(Move::new_castle(king_sq, king_dst));
    }
}
