//! Pin detection.

use crate::attacks::{between, bishop_attacks, rook_attacks};
use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::piece::{Color, PieceKind};

impl Board {
    /// Pieces shielding `color`'s king from enemy sliders, and the sliders doing the pinning.
    ///
    /// Returns `(blockers, pinners)`. A blocker is a piece of either color that
    /// stands alone between the king and an enemy slider. `pinners` holds only
    /// the enemy sliders whose lone blocker belongs to `color`, i.e. those that
    /// hold an absolute pin.
    pub fn slider_blockers(&self, color: Color) -> (Bitboard, Bitboard) {
        let king_sq = self.king_square(color);
        let enemy = self.side(!color);
        let queens = self.pieces(PieceKind::Queen);

        let snipers = ((rook_attacks(king_sq, Bitboard::EMPTY)
            & (self.pieces(PieceKind::Rook) | queens))
            | (bishop_attacks(king_sq, Bitboard::EMPTY) & (self.pieces(PieceKind::Bishop) | queens)))
            & enemy;
        let occupied = self.occupied() ^ snipers;

        let mut blockers = Bitboard::EMPTY;
        let mut pinners = Bitboard::EMPTY;
        for sniper in snipers {
            let shield = between(king_sq, sniper) & occupied;
            if shield.count() == 1 {
                blockers |= shield;
                if (shield & self.side(color)).is_nonempty() {
                    pinners |= sniper.bitboard();
                }
            }
        }

        (blockers, pinners)
    }
}
