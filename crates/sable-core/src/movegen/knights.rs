//! Knight move generation.

use crate::attacks::knight_attacks;
use crate::board::Board;
use crate::chess_move::Move;
use crate::piece::PieceKind;

use super::{GenContext, MoveList};

/// Generate legal knight moves.
pub(super) fn gen_knights(board: &Board, ctx: &GenContext, list: &mut MoveList) {
    let us = board.side_to_move();
    // A pinned knight can never stay on its pin ray.
    let knights = board.colored_pieces(us, PieceKind::Knight) & !ctx.pinned;

    for src in knights {
        for dst in knight_attacks(src) & ctx.targets & ctx.check_mask {
            list.push(Move::new(src, dst));
        }
    }
}
