//! Legal move generation.
//!
//! Generation is fully legal: pins and checks are resolved up front so that
//! every emitted move can be played without a follow-up legality test.

mod king;
mod knights;
mod pawns;
mod pins;
mod sliders;

use crate::attacks::between;
use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::chess_move::Move;
use crate::square::Square;

use self::king::gen_king;
use self::knights::gen_knights;
use self::pawns::gen_pawns;
use self::sliders::gen_sliders;

/// Stack-allocated buffer for generated moves. Capacity 256 covers the theoretical max of 218.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; 256],
    len: u16,
}

impl MoveList {
    pub fn new() -> MoveList {
        MoveList {
            moves: [Move::NULL; 256],
            len: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, mv: Move) {
        debug_assert!((self.len as usize) < 256);
        self.moves[self.len as usize] = mv;
        self.len += 1;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len as usize]
    }

    /// Return `true` if the list holds `mv`.
    #[inline]
    pub fn contains(&self, mv: Move) -> bool {
        self.as_slice().contains(&mv)
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;
    #[inline]
    fn index(&self, index: usize) -> &Move {
        &self.as_slice()[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;
    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

/// Which moves a generation pass emits.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum GenMode {
    All,
    /// Captures, en passant and promotions.
    Captures,
}

/// Per-position constraints shared by every piece generator.
pub(crate) struct GenContext {
    pub mode: GenMode,
    pub king_sq: Square,
    pub checkers: Bitboard,
    /// Our pieces pinned to our king.
    pub pinned: Bitboard,
    /// Squares a non-king move must land on to resolve a check (full board otherwise).
    pub check_mask: Bitboard,
    /// Landing squares allowed for pieces by the generation mode.
    pub targets: Bitboard,
}

impl GenContext {
    /// Return `true` if a piece on `src` may land on `dst` without exposing its king.
    #[inline]
    pub fn pin_allows(&self, src: Square, dst: Square) -> bool {
        !self.pinned.contains(src) || crate::attacks::line(self.king_sq, src).contains(dst)
    }
}

fn generate(board: &Board, mode: GenMode) -> MoveList {
    let mut list = MoveList::new();
    let us = board.side_to_move();
    let king_sq = board.king_square(us);
    let checkers = board.checkers();
    let (blockers, _) = board.slider_blockers(us);

    let targets = match mode {
        GenMode::All => !board.side(us),
        GenMode::Captures => board.side(!us),
    };
    let mut ctx = GenContext {
        mode,
        king_sq,
        checkers,
        pinned: blockers & board.side(us),
        check_mask: Bitboard::FULL,
        targets,
    };

    match checkers.count() {
        0 => {}
        1 => {
            // Non-king pieces must capture the checker or block its ray.
            let checker_sq = checkers.lsb().unwrap_or(king_sq);
            ctx.check_mask = between(king_sq, checker_sq) | checkers;
        }
        _ => {
            // Double check: only the king may move.
            gen_king(board, &ctx, &mut list);
            return list;
        }
    }

    gen_pawns(board, &ctx, &mut list);
    gen_knights(board, &ctx, &mut list);
    gen_sliders(board, &ctx, &mut list);
    gen_king(board, &ctx, &mut list);
    list
}

/// Generate all legal moves for the current position.
pub fn generate_legal_moves(board: &Board) -> MoveList {
    generate(board, GenMode::All)
}

/// Generate the legal captures, en passant captures and promotions.
pub fn generate_captures(board: &Board) -> MoveList {
    generate(board, GenMode::Captures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::piece::PieceKind;
    use crate::square::Square;

    #[test]
    fn starting_position_20_moves() {
        let board = Board::starting_position();
        assert_eq!(generate_legal_moves(&board).len(), 20);
        assert!(generate_captures(&board).is_empty());
    }

    #[test]
    fn pinned_knight_zero_moves() {
        let board: Board = "4r2k/8/8/8/8/8/4N3/4K3 w - - 0 1".parse().unwrap();
        let moves = generate_legal_moves(&board);
        assert!(moves.as_slice().iter().all(|m| m.source() != Square::E2));
    }

    #[test]
    fn double_check_king_only() {
        let board: Board = "4r1k1/8/8/8/8/5n2/8/4K3 w - - 0 1".parse().unwrap();
        for mv in &generate_legal_moves(&board) {
            assert_eq!(board.piece_on(mv.source()), Some(PieceKind::King));
        }
    }

    #[test]
    fn castling_not_through_check() {
        let board: Board = "4k3/8/b7/8/8/8/8/R3K2R w KQ - 0 1".parse().unwrap();
        let moves = generate_legal_moves(&board);
        assert!(!moves.as_slice().iter().any(|m| m.is_castle() && m.dest() == Square::G1));
        assert!(moves.as_slice().iter().any(|m| m.is_castle() && m.dest() == Square::C1));
    }

    #[test]
    fn en_passant_discovered_check_illegal() {
        let board: Board = "4k3/8/8/KPp4r/8/8/8/8 w - c6 0 1".parse().unwrap();
        let moves = generate_legal_moves(&board);
        assert!(!moves.as_slice().iter().any(|m| m.is_en_passant()));
    }

    #[test]
    fn promotion_generates_4_moves() {
        let board: Board = "4k3/P7/8/8/8/8/8/4K3 w - - 0 1".parse().unwrap();
        let promos = generate_legal_moves(&board)
            .as_slice()
            .iter()
            .filter(|m| m.is_promotion())
            .count();
        assert_eq!(promos, 4);
    }

    #[test]
    fn captures_are_a_subset_of_legal_moves() {
        let board: Board = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1"
            .parse()
            .unwrap();
        let all = generate_legal_moves(&board);
        let captures = generate_captures(&board);
        let expected = all
            .as_slice()
            .iter()
            .filter(|&&m| board.is_capture(m) || m.is_promotion())
            .count();
        assert_eq!(captures.len(), expected);
        for mv in &captures {
            assert!(all.contains(*mv), "{mv} is not legal");
        }
    }

    #[test]
    fn captures_in_check_only_resolve_it() {
        // The only capture that answers the check is taking the checking knight.
        let board: Board = "4k3/8/8/8/7p/3n4/8/4KB1Q w - - 0 1".parse().unwrap();
        let captures = generate_captures(&board);
        assert_eq!(captures.len(), 1);
        assert_eq!(captures[0], Move::new(Square::F1, Square::D3));
    }
}
