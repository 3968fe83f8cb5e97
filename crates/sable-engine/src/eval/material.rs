//! Piece values.

use sable_core::{Board, Color, PieceKind};

use crate::eval::score::{S, Score};

/// Tapered piece values used by the classical evaluation.
pub const MATERIAL_VALUE: [Score; PieceKind::COUNT] = [
    S(100, 120), // Pawn
    S(320, 310), // Knight
    S(330, 320), // Bishop
    S(500, 520), // Rook
    S(900, 950), // Queen
    S(0, 0),     // King
];

/// Flat piece values used by the material-only evaluation.
pub const PIECE_VALUE: [i32; PieceKind::COUNT] = [100, 300, 300, 500, 900, 0];

/// Tapered material balance from White's side.
pub fn material(board: &Board) -> Score {
    PieceKind::ALL.iter().fold(Score::ZERO, |score, &kind| {
        let white = board.colored_pieces(Color::White, kind).count() as i16;
        let black = board.colored_pieces(Color::Black, kind).count() as i16;
        score + MATERIAL_VALUE[kind.index()] * (white - black)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_position_is_balanced() {
        assert_eq!(material(&Board::starting_position()), Score::ZERO);
    }

    #[test]
    fn missing_queen_shows_in_both_halves() {
        let board: Board = "rnb1kbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1".parse().unwrap();
        assert_eq!(material(&board), S(900, 950));

        let board: Board = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNB1KBNR w KQkq - 0 1".parse().unwrap();
        assert_eq!(material(&board), -S(900, 950));
    }

    #[test]
    fn kings_are_worth_nothing() {
        assert_eq!(MATERIAL_VALUE[PieceKind::King.index()], Score::ZERO);
        assert_eq!(PIECE_VALUE[PieceKind::King.index()], 0);
    }
}
