//! Attack sets for every piece, plus the ray geometry pins and x-rays need.

mod geometry;
mod magic;

use crate::bitboard::Bitboard;
use crate::piece::Color;
use crate::square::Square;

#[inline]
pub fn knight_attacks(sq: Square) -> Bitboard {
    geometry::KNIGHT[sq.index()]
}

#[inline]
pub fn king_attacks(sq: Square) -> Bitboard {
    geometry::KING[sq.index()]
}

/// The two diagonal squares a `color` pawn on `sq` captures on.
#[inline]
pub fn pawn_attacks(color: Color, sq: Square) -> Bitboard {
    geometry::PAWN[color.index()][sq.index()]
}

#[inline]
pub fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    Bitboard::new(magic::rooks().get(sq.index(), occupied.inner()))
}

#[inline]
pub fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    Bitboard::new(magic::bishops().get(sq.index(), occupied.inner()))
}

/// Squares strictly between two aligned squares; empty when they do not
/// share a rank, file or diagonal.
#[inline]
pub fn between(a: Square, b: Square) -> Bitboard {
    geometry::between(a.index(), b.index())
}

/// The whole edge-to-edge line through two aligned squares; empty when
/// they are not aligned.
#[inline]
pub fn line(a: Square, b: Square) -> Bitboard {
    geometry::line(a.index(), b.index())
}
