//! Game phase from remaining non-pawn material.

use sable_core::{Board, PieceKind};

/// Phase of the starting position: four minors, four rooks and two queens.
pub const MAX_PHASE: i32 = 24;

/// Phase contributed by one piece of each kind.
pub const PHASE_WEIGHT: [i32; PieceKind::COUNT] = [0, 1, 1, 2, 4, 0];

/// Phase in `0..=MAX_PHASE`; promotions cannot push it past the maximum.
pub fn game_phase(board: &Board) -> i32 {
    let phase: i32 = PieceKind::ALL
        .iter()
        .map(|&kind| board.pieces(kind).count() as i32 * PHASE_WEIGHT[kind.index()])
        .sum();
    phase.min(MAX_PHASE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_position_is_max_phase() {
        assert_eq!(game_phase(&Board::starting_position()), MAX_PHASE);
    }

    #[test]
    fn bare_kings_is_zero_phase() {
        let board: Board = "8/8/4k3/8/8/4K3/8/8 w - - 0 1".parse().unwrap();
        assert_eq!(game_phase(&board), 0);
    }

    #[test]
    fn missing_queen_drops_four() {
        let board: Board = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNB1KBNR w KQkq - 0 1".parse().unwrap();
        assert_eq!(game_phase(&board), 20);
    }

    #[test]
    fn extra_queens_are_clamped() {
        let board: Board = "qqqqkqqq/8/8/8/8/8/8/QQQQKQQQ w - - 0 1".parse().unwrap();
        assert_eq!(game_phase(&board), MAX_PHASE);
    }
}
