//! Sliding piece (bishop, rook, queen) move generation.

use crate::attacks::{bishop_attacks, line, rook_attacks};
use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::chess_move::Move;
use crate::piece::PieceKind;

use super::{GenContext, MoveList};

/// Generate legal slider moves (bishops, rooks, queens).
pub(super) fn gen_sliders(board: &Board, ctx: &GenContext, list: &mut MoveList) {
    let us = board.side_to_move();
    let occupied = board.occupied();
    let queens = board.pieces(PieceKind::Queen);
    let diagonal = (board.pieces(PieceKind::Bishop) | queens) & board.side(us);
    let orthogonal = (board.pieces(PieceKind::Rook) | queens) & board.side(us);

    for src in diagonal | orthogonal {
        let mut reach = Bitboard::EMPTY;
        if diagonal.contains(src) {
            reach |= bishop_attacks(src, occupied);
        }
        if orthogonal.contains(src) {
            reach |= rook_attacks(src, occupied);
        }

        let mut targets = reach & ctx.targets & ctx.check_mask;
        if ctx.pinned.contains(src) {
            targets &= line(ctx.king_sq, src);
        }
        for dst in targets {
            list.push(Move::new(src, dst));
        }
    }
}
