//! Move execution via copy-make.

use crate::board::Board;
use crate::castle_rights::CastleRights;
use crate::chess_move::{Move, MoveKind};
use crate::piece::PieceKind;
use crate::square::Square;

/// Castling rights lost when a move starts or ends on each square.
const CASTLE_RIGHTS_REVOKE: [CastleRights; 64] = {
    let mut table = [CastleRights::NONE; 64];
    table[Square::E1.index()] = CastleRights::WHITE_BOTH;
    table[Square::A1.index()] = CastleRights::WHITE_QUEEN;
    table[Square::H1.index()] = CastleRights::WHITE_KING;
    table[Square::E8.index()] = CastleRights::BLACK_BOTH;
    table[Square::A8.index()] = CastleRights::BLACK_QUEEN;
    table[Square::H8.index()] = CastleRights::BLACK_KING;
    table
};

/// Rook source and destination for a castling king destination.
pub fn castle_rook_squares(king_dest: Square) -> Option<(Square, Square)> {
    match king_dest {
        Square::G1 => Some((Square::H1, Square::F1)),
        Square::C1 => Some((Square::A1, Square::D1)),
        Square::G8 => Some((Square::H8, Square::F8)),
        Square::C8 => Some((Square::A8, Square::D8)),
        _ => None,
    }
}

impl Board {
    /// Apply a move and return the resulting board. `self` is not modified.
    ///
    /// The move must be pseudo-legal for this position; a move whose source
    /// square is empty returns the board unchanged.
    pub fn make_move(&self, mv: Move) -> Board {
        let mut b = *self;
        let us = b.side_to_move();
        let them = !us;
        let src = mv.source();
        let dst = mv.dest();

        let Some(moving) = b.piece_on(src) else {
            return b;
        };
        let captured = self.captured_piece(mv);

        b.set_en_passant(None);

        match mv.kind() {
            MoveKind::Normal => {
                if let Some(victim) = captured {
                    b.xor_piece(dst, victim, them);
                }
                b.shift_piece(src, dst, moving, us);

                if moving == PieceKind::Pawn && src.index().abs_diff(dst.index()) == 16 {
                    let ep = (src.index() + dst.index()) / 2;
                    b.set_en_passant(Square::from_index(ep as u8));
                }
            }
            MoveKind::Promotion => {
                if let Some(victim) = captured {
                    b.xor_piece(dst, victim, them);
                }
                b.xor_piece(src, PieceKind::Pawn, us);
                b.xor_piece(dst, mv.promotion_piece().to_piece_kind(), us);
            }
            MoveKind::EnPassant => {
                b.shift_piece(src, dst, PieceKind::Pawn, us);
                // The captured pawn shares the source rank and the destination file.
                let victim_sq = Square::at(dst.file(), src.rank());
                b.xor_piece(victim_sq, PieceKind::Pawn, them);
            }
            MoveKind::Castling => {
                b.shift_piece(src, dst, PieceKind::King, us);
                if let Some((rook_src, rook_dst)) = castle_rook_squares(dst) {
                    b.shift_piece(rook_src, rook_dst, PieceKind::Rook, us);
                }
            }
        }

        let rights = b
            .castling()
            .remove(CASTLE_RIGHTS_REVOKE[src.index()])
            .remove(CASTLE_RIGHTS_REVOKE[dst.index()]);
        if rights != b.castling() {
            b.set_castling(rights);
        }

        b.pass_turn(moving == PieceKind::Pawn || captured.is_some());
        b
    }

    /// Pass the turn without moving a piece.
    ///
    /// Clears the en passant square and increments the halfmove clock. Only
    /// meaningful when the side to move is not in check.
    pub fn make_null_move(&self) -> Board {
        let mut b = *self;
        b.set_en_passant(None);
        b.pass_turn(false);
        b
    }
}
