//! Position history for repetition detection.

/// Zobrist keys of every position reached so far, oldest first.
///
/// The game history and the current search path share one stack: the search
/// pushes each child key before recursing and pops it afterwards.
#[derive(Clone, Debug, Default)]
pub struct PositionHistory {
    keys: Vec<u64>,
}

impl PositionHistory {
    pub fn new() -> PositionHistory {
        PositionHistory { keys: Vec::with_capacity(512) }
    }

    #[inline]
    pub fn push(&mut self, key: u64) {
        self.keys.push(key);
    }

    #[inline]
    pub fn pop(&mut self) {
        self.keys.pop();
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// The most recently pushed key.
    #[inline]
    pub fn last(&self) -> Option<u64> {
        self.keys.last().copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Return `true` if the current position (the last pushed key) occurred
    /// at least `times` times before.
    ///
    /// Only the last `halfmove_clock` plies can repeat, since a capture or
    /// pawn move makes every earlier position unreachable. Positions with the
    /// other side to move are skipped.
    pub fn is_repetition(&self, halfmove_clock: u16, times: usize) -> bool {
        let Some((&current, earlier)) = self.keys.split_last() else {
            return false;
        };
        let window = (halfmove_clock as usize).min(earlier.len());

        earlier
            .iter()
            .rev()
            .take(window)
            .skip(1)
            .step_by(2)
            .filter(|&&key| key == current)
            .nth(times.saturating_sub(1))
            .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::PositionHistory;
    use crate::board::Board;
    use crate::chess_move::Move;
    use crate::square::Square;

    fn knight_shuffle() -> (PositionHistory, Board) {
        let mut history = PositionHistory::new();
        let mut board = Board::starting_position();
        history.push(board.hash());
        let moves = [
            Move::new(Square::G1, Square::F3),
            Move::new(Square::G8, Square::F6),
            Move::new(Square::F3, Square::G1),
            Move::new(Square::F6, Square::G8),
        ];
        for mv in moves {
            board = board.make_move(mv);
            history.push(board.hash());
        }
        (history, board)
    }

    #[test]
    fn detects_a_single_repetition() {
        let (history, board) = knight_shuffle();
        assert_eq!(board.hash(), Board::starting_position().hash());
        assert!(history.is_repetition(board.halfmove_clock(), 1));
        assert!(!history.is_repetition(board.halfmove_clock(), 2));
    }

    #[test]
    fn irreversible_move_cuts_the_window() {
        let (history, board) = knight_shuffle();
        // A zero halfmove clock means nothing before the last capture or pawn move can repeat.
        assert!(!history.is_repetition(0, 1));
        assert!(history.is_repetition(board.halfmove_clock(), 1));
    }

    #[test]
    fn empty_history_never_repeats() {
        assert!(!PositionHistory::new().is_repetition(100, 1));
    }
}
