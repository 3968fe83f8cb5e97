//! Pawn move generation.

use crate::attacks::{pawn_attacks, rook_attacks};
use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::chess_move::{Move, PromotionPiece};
use crate::piece::{Color, PieceKind};
use crate::square::Square;

use super::{GenContext, GenMode, MoveList};

fn push_promotions(src: Square, dst: Square, list: &mut MoveList) {
    for promo in PromotionPiece::ALL {
        list.push(Move::new_promotion(src, dst, promo));
    }
}

/// Generate legal pawn moves.
///
/// In capture mode this emits captures, en passant and every promotion,
/// including quiet push promotions.
pub(super) fn gen_pawns(board: &Board, ctx: &GenContext, list: &mut MoveList) {
    let us = board.side_to_move();
    let them = !us;
    let empty = !board.occupied();
    let pawns = board.colored_pieces(us, PieceKind::Pawn);

    let (step, promo_rank, double_rank): (i8, Bitboard, Bitboard) = match us {
        Color::White => (8, Bitboard::rank(7), Bitboard::rank(3)),
        Color::Black => (-8, Bitboard::rank(0), Bitboard::rank(4)),
    };
    let origin = |dst: Square, steps: i8| Square::from_index_unchecked((dst.index() as i8 - step * steps) as u8);

    // Pushes.
    let single = pawns.forward(us) & empty;
    let mut single_targets = single & ctx.check_mask;
    if ctx.mode == GenMode::Captures {
        single_targets &= promo_rank;
    }
    for dst in single_targets {
        let src = origin(dst, 1);
        if !ctx.pin_allows(src, dst) {
            continue;
        }
        if promo_rank.contains(dst) {
            push_promotions(src, dst, list);
        } else {
            list.push(Move::new(src, dst));
        }
    }

    if ctx.mode == GenMode::All {
        for dst in single.forward(us) & empty & double_rank & ctx.check_mask {
            let src = origin(dst, 2);
            if ctx.pin_allows(src, dst) {
                list.push(Move::new(src, dst));
            }
        }
    }

    // Captures.
    let enemy = board.side(them);
    for src in pawns {
        for dst in pawn_attacks(us, src) & enemy & ctx.check_mask {
            if !ctx.pin_allows(src, dst) {
                continue;
            }
            if promo_rank.contains(dst) {
                push_promotions(src, dst, list);
            } else {
                list.push(Move::new(src, dst));
            }
        }
    }

    // En passant.
    let Some(ep_sq) = board.en_passant() else {
        return;
    };
    let victim_sq = origin(ep_sq, 1);
    if ctx.checkers.is_nonempty() && !ctx.check_mask.contains(ep_sq) && !ctx.checkers.contains(victim_sq) {
        return;
    }
    let enemy_orthogonal =
        (board.pieces(PieceKind::Rook) | board.pieces(PieceKind::Queen)) & enemy;
    for src in pawn_attacks(them, ep_sq) & pawns {
        if !ctx.pin_allows(src, ep_sq) {
            continue;
        }
        // Both pawns leave the rank at once, which can uncover a rank attack on the king.
        let after = (board.occupied() ^ src.bitboard() ^ victim_sq.bitboard()) | ep_sq.bitboard();
        if (rook_attacks(ctx.king_sq, after) & enemy_orthogonal).is_nonempty() {
            continue;
        }
        list.push(Move::new_en_passant(src, ep_sq));
    }
}
