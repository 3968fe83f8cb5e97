//! Per-thread history tables for quiet and capture move ordering.
//!
//! All tables share the gravity update: a bonus is applied as
//! `entry += bonus - entry * |bonus| / MAX_HISTORY`, which pulls the entry
//! towards the bonus and keeps it inside `[-MAX_HISTORY, MAX_HISTORY]`.

use sable_core::{Color, Move, PieceKind, Square};

use crate::search::params::{DEFAULT_HISTORY, MAX_HISTORY};

const SQUARES: usize = 64;
const PIECES: usize = PieceKind::COUNT;
const COLORS: usize = Color::COUNT;

const BUTTERFLY_LEN: usize = COLORS * SQUARES * SQUARES;
const SEGMENT_LEN: usize = COLORS * PIECES * SQUARES;
const CONTINUATION_LEN: usize = SEGMENT_LEN * SEGMENT_LEN;
const CAPTURE_LEN: usize = COLORS * PIECES * PIECES * SQUARES;

/// Apply a gravity-scaled bonus to one history entry.
#[inline]
pub fn gravity(entry: &mut i32, bonus: i32) {
    let bonus = bonus.clamp(-MAX_HISTORY, MAX_HISTORY);
    *entry += bonus - *entry * bonus.abs() / MAX_HISTORY;
}

/// A move described by who played it, with what, and where it landed.
///
/// Identifies one continuation-history segment: the table of follow-up
/// scores for every reply to this move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceTo {
    pub color: Color,
    pub piece: PieceKind,
    pub to: Square,
}

impl PieceTo {
    #[inline]
    fn index(self) -> usize {
        (self.color.index() * PIECES + self.piece.index()) * SQUARES + self.to.index()
    }
}

/// Butterfly, continuation and capture history for one search thread.
pub struct HistoryTables {
    /// `[color][from][to]`
    butterfly: Box<[i32]>,
    /// `[prev color][prev piece][prev to][color][piece][to]`
    continuation: Box<[i16]>,
    /// `[color][attacker][victim][to]`
    capture: Box<[i32]>,
}

impl HistoryTables {
    pub fn new() -> HistoryTables {
        HistoryTables {
            butterfly: vec![0; BUTTERFLY_LEN].into_boxed_slice(),
            continuation: vec![DEFAULT_HISTORY as i16; CONTINUATION_LEN].into_boxed_slice(),
            capture: vec![DEFAULT_HISTORY; CAPTURE_LEN].into_boxed_slice(),
        }
    }

    /// Forget everything learned so far.
    pub fn clear(&mut self) {
        self.butterfly.fill(0);
        self.continuation.fill(DEFAULT_HISTORY as i16);
        self.capture.fill(DEFAULT_HISTORY);
    }

    #[inline]
    fn butterfly_index(color: Color, mv: Move) -> usize {
        (color.index() * SQUARES + mv.source().index()) * SQUARES + mv.dest().index()
    }

    #[inline]
    fn continuation_index(prev: PieceTo, current: PieceTo) -> usize {
        prev.index() * SEGMENT_LEN + current.index()
    }

    #[inline]
    fn capture_index(color: Color, attacker: PieceKind, victim: PieceKind, to: Square) -> usize {
        ((color.index() * PIECES + attacker.index()) * PIECES + victim.index()) * SQUARES + to.index()
    }

    #[inline]
    pub fn quiet(&self, color: Color, mv: Move) -> i32 {
        self.butterfly[Self::butterfly_index(color, mv)]
    }

    pub fn update_quiet(&mut self, color: Color, mv: Move, bonus: i32) {
        gravity(&mut self.butterfly[Self::butterfly_index(color, mv)], bonus);
    }

    #[inline]
    pub fn continuation(&self, prev: PieceTo, current: PieceTo) -> i32 {
        self.continuation[Self::continuation_index(prev, current)] as i32
    }

    pub fn update_continuation(&mut self, prev: PieceTo, current: PieceTo, bonus: i32) {
        let slot = &mut self.continuation[Self::continuation_index(prev, current)];
        let mut entry = *slot as i32;
        gravity(&mut entry, bonus);
        *slot = entry.clamp(-MAX_HISTORY, MAX_HISTORY) as i16;
    }

    #[inline]
    pub fn capture(&self, color: Color, attacker: PieceKind, victim: PieceKind, to: Square) -> i32 {
        self.capture[Self::capture_index(color, attacker, victim, to)]
    }

    pub fn update_capture(
        &mut self,
        color: Color,
        attacker: PieceKind,
        victim: PieceKind,
        to: Square,
        bonus: i32,
    ) {
        gravity(&mut self.capture[Self::capture_index(color, attacker, victim, to)], bonus);
    }
}

impl Default for HistoryTables {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_bonus_leaves_entries_unchanged() {
        for start in [-MAX_HISTORY, -4000, 0, 123, MAX_HISTORY] {
            let mut entry = start;
            for _ in 0..10 {
                gravity(&mut entry, 0);
            }
            assert_eq!(entry, start);
        }
    }

    #[test]
    fn repeated_bonuses_saturate() {
        let mut up = 0;
        let mut down = 0;
        for _ in 0..1000 {
            gravity(&mut up, 1200);
            gravity(&mut down, -1200);
            assert!(up <= MAX_HISTORY);
            assert!(down >= -MAX_HISTORY);
        }
        assert!(up > MAX_HISTORY * 9 / 10);
        assert!(down < -MAX_HISTORY * 9 / 10);
    }

    #[test]
    fn oversized_bonus_is_clamped() {
        let mut entry = 0;
        gravity(&mut entry, 10 * MAX_HISTORY);
        assert_eq!(entry, MAX_HISTORY);
    }

    #[test]
    fn tables_are_independent_by_color_and_square() {
        let mut tables = HistoryTables::new();
        let mv = Move::new(Square::G1, Square::F3);
        tables.update_quiet(Color::White, mv, 400);
        assert_eq!(tables.quiet(Color::White, mv), 400);
        assert_eq!(tables.quiet(Color::Black, mv), 0);
        assert_eq!(tables.quiet(Color::White, Move::new(Square::B1, Square::C3)), 0);
    }

    #[test]
    fn continuation_segments() {
        let mut tables = HistoryTables::new();
        let prev = PieceTo { color: Color::White, piece: PieceKind::Pawn, to: Square::E4 };
        let reply = PieceTo { color: Color::Black, piece: PieceKind::Pawn, to: Square::E5 };
        let other = PieceTo { color: Color::White, piece: PieceKind::Knight, to: Square::F3 };
        tables.update_continuation(prev, reply, 300);
        assert_eq!(tables.continuation(prev, reply), 300);
        assert_eq!(tables.continuation(other, reply), 0);
        for _ in 0..100 {
            tables.update_continuation(prev, reply, -MAX_HISTORY);
        }
        assert_eq!(tables.continuation(prev, reply), -MAX_HISTORY);
    }

    #[test]
    fn clear_resets_all_tables() {
        let mut tables = HistoryTables::new();
        let mv = Move::new(Square::E2, Square::E4);
        tables.update_quiet(Color::White, mv, 500);
        tables.update_capture(Color::White, PieceKind::Knight, PieceKind::Rook, Square::D5, 500);
        tables.clear();
        assert_eq!(tables.quiet(Color::White, mv), 0);
        assert_eq!(tables.capture(Color::White, PieceKind::Knight, PieceKind::Rook, Square::D5), 0);
    }
}
