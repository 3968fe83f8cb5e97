//! The chess board: piece placement, side to move, castling, en passant, and move counters.

use std::fmt;

use crate::attacks::{bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks};
use crate::bitboard::Bitboard;
use crate::castle_rights::CastleRights;
use crate::chess_move::{Move, MoveKind};
use crate::error::BoardError;
use crate::piece::{Color, PieceKind};
use crate::square::Square;
use crate::zobrist;

/// Back-rank piece order from the a-file to the h-file.
const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// a1, c1, ..., h8: every square whose file and rank indices have equal parity.
const DARK_SQUARES: Bitboard = Bitboard::new(0xAA55_AA55_AA55_AA55);

/// Complete chess position state.
///
/// `Board` is `Copy`: moves are applied with copy-make ([`Board::make_move`]),
/// so undoing a move is simply dropping the child board.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Board {
    /// Bitboard for each piece kind, indexed by [`PieceKind::index()`].
    pieces: [Bitboard; PieceKind::COUNT],
    /// Bitboard for each side, indexed by [`Color::index()`].
    sides: [Bitboard; Color::COUNT],
    /// Union of both sides.
    occupied: Bitboard,
    side_to_move: Color,
    castling: CastleRights,
    en_passant: Option<Square>,
    /// Plies since the last capture or pawn move.
    halfmove_clock: u16,
    fullmove_number: u16,
    /// Zobrist key, kept in sync by every mutation.
    hash: u64,
}

impl Board {
    fn empty() -> Board {
        Board {
            pieces: [Bitboard::EMPTY; PieceKind::COUNT],
            sides: [Bitboard::EMPTY; Color::COUNT],
            occupied: Bitboard::EMPTY,
            side_to_move: Color::White,
            castling: CastleRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            hash: 0,
        }
    }

    /// Return the standard starting position.
    pub fn starting_position() -> Board {
        let mut board = Board::empty();
        for (file, kind) in BACK_RANK.into_iter().enumerate() {
            let sq = Square::at(file as u8, 0);
            board.xor_piece(sq, kind, Color::White);
            board.xor_piece(sq.flip(), kind, Color::Black);
            board.xor_piece(Square::at(file as u8, 1), PieceKind::Pawn, Color::White);
            board.xor_piece(Square::at(file as u8, 6), PieceKind::Pawn, Color::Black);
        }
        board.castling = CastleRights::ALL;
        board.hash = zobrist::hash_from_scratch(&board);
        board
    }

    /// Assemble a board from parsed FEN fields. The hash is computed here.
    pub(crate) fn from_parts(
        placement: &[(Square, PieceKind, Color)],
        side_to_move: Color,
        castling: CastleRights,
        en_passant: Option<Square>,
        halfmove_clock: u16,
        fullmove_number: u16,
    ) -> Board {
        let mut board = Board::empty();
        for &(sq, kind, color) in placement {
            board.xor_piece(sq, kind, color);
        }
        board.side_to_move = side_to_move;
        board.castling = castling;
        board.en_passant = en_passant;
        board.halfmove_clock = halfmove_clock;
        board.fullmove_number = fullmove_number;
        board.hash = zobrist::hash_from_scratch(&board);
        board
    }

    /// Return the piece kind on the given square, if any.
    pub fn piece_on(&self, sq: Square) -> Option<PieceKind> {
        if !self.occupied.contains(sq) {
            return None;
        }
        PieceKind::ALL
            .into_iter()
            .find(|&kind| self.pieces[kind.index()].contains(sq))
    }

    /// Return the color of the piece on the given square, if any.
    pub fn color_on(&self, sq: Square) -> Option<Color> {
        Color::ALL
            .into_iter()
            .find(|&color| self.sides[color.index()].contains(sq))
    }

    /// Return the bitboard for the given piece kind (both colors).
    #[inline]
    pub fn pieces(&self, kind: PieceKind) -> Bitboard {
        self.pieces[kind.index()]
    }

    /// Return the bitboard of `color`'s pieces of the given kind.
    #[inline]
    pub fn colored_pieces(&self, color: Color, kind: PieceKind) -> Bitboard {
        self.pieces[kind.index()] & self.sides[color.index()]
    }

    /// Return the bitboard for the given side.
    #[inline]
    pub fn side(&self, color: Color) -> Bitboard {
        self.sides[color.index()]
    }

    /// Return the occupied squares bitboard.
    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.occupied
    }

    /// Return the square of the king for the given side.
    ///
    /// # Panics
    ///
    /// Panics if the board has no king for the given color. Every board
    /// built through FEN parsing or [`Board::starting_position`] has one.
    pub fn king_square(&self, color: Color) -> Square {
        self.colored_pieces(color, PieceKind::King)
            .lsb()
            .expect("board must have a king for each side")
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn castling(&self) -> CastleRights {
        self.castling
    }

    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u16 {
        self.fullmove_number
    }

    /// Return the Zobrist hash of the position.
    #[inline]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// All pieces of either color attacking `sq`, with sliders seeing through
    /// the given `occupied` set.
    pub fn attackers_to(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        let diagonal = self.pieces(PieceKind::Bishop) | self.pieces(PieceKind::Queen);
        let orthogonal = self.pieces(PieceKind::Rook) | self.pieces(PieceKind::Queen);

        (pawn_attacks(Color::Black, sq) & self.colored_pieces(Color::White, PieceKind::Pawn))
            | (pawn_attacks(Color::White, sq) & self.colored_pieces(Color::Black, PieceKind::Pawn))
            | (knight_attacks(sq) & self.pieces(PieceKind::Knight))
            | (king_attacks(sq) & self.pieces(PieceKind::King))
            | (bishop_attacks(sq, occupied) & diagonal)
            | (rook_attacks(sq, occupied) & orthogonal)
    }

    /// Return `true` if `sq` is attacked by any piece of `by_color`.
    pub fn is_square_attacked(&self, sq: Square, by_color: Color) -> bool {
        (self.attackers_to(sq, self.occupied) & self.side(by_color)).is_nonempty()
    }

    /// Enemy pieces giving check to the side to move.
    pub fn checkers(&self) -> Bitboard {
        let us = self.side_to_move;
        self.attackers_to(self.king_square(us), self.occupied) & self.side(!us)
    }

    /// Return `true` if the side to move is in check.
    #[inline]
    pub fn in_check(&self) -> bool {
        self.checkers().is_nonempty()
    }

    /// Return `true` if `color` owns at least one knight, bishop, rook or queen.
    pub fn has_non_pawn_material(&self, color: Color) -> bool {
        let pawns_and_king = self.pieces(PieceKind::Pawn) | self.pieces(PieceKind::King);
        (self.side(color) & !pawns_and_king).is_nonempty()
    }

    /// Return `true` if `mv` removes an enemy piece from the board.
    #[inline]
    pub fn is_capture(&self, mv: Move) -> bool {
        mv.is_en_passant() || (!mv.is_castle() && self.occupied.contains(mv.dest()))
    }

    /// Return the kind of piece `mv` captures, if any.
    pub fn captured_piece(&self, mv: Move) -> Option<PieceKind> {
        match mv.kind() {
            MoveKind::EnPassant => Some(PieceKind::Pawn),
            MoveKind::Castling => None,
            MoveKind::Normal | MoveKind::Promotion => self.piece_on(mv.dest()),
        }
    }

    /// Return `true` once a hundred plies passed without a capture or pawn move.
    #[inline]
    pub fn is_halfmove_draw(&self) -> bool {
        self.halfmove_clock >= 100
    }

    /// Return `true` if neither side can possibly deliver mate.
    ///
    /// Covers bare kings, a single minor piece, and bishops that all stand on
    /// squares of one color.
    pub fn is_insufficient_material(&self) -> bool {
        let heavy = self.pieces(PieceKind::Pawn)
            | self.pieces(PieceKind::Rook)
            | self.pieces(PieceKind::Queen);
        if heavy.is_nonempty() {
            return false;
        }

        let knights = self.pieces(PieceKind::Knight);
        let bishops = self.pieces(PieceKind::Bishop);
        let minors = (knights | bishops).count();
        if minors <= 1 {
            return true;
        }

        knights.is_empty()
            && ((bishops & DARK_SQUARES).is_empty() || (bishops & !DARK_SQUARES).is_empty())
    }

    /// Toggle a piece into/out of the board arrays, keeping the hash in sync.
    #[inline]
    pub(crate) fn xor_piece(&mut self, sq: Square, kind: PieceKind, color: Color) {
        let mask = sq.bitboard();
        self.pieces[kind.index()] ^= mask;
        self.sides[color.index()] ^= mask;
        self.occupied ^= mask;
        self.hash ^= zobrist::piece_key(kind, color, sq);
    }

    /// Move a piece between two squares, keeping the hash in sync.
    #[inline]
    pub(crate) fn shift_piece(&mut self, from: Square, to: Square, kind: PieceKind, color: Color) {
        self.xor_piece(from, kind, color);
        self.xor_piece(to, kind, color);
    }

    /// Replace the en passant square, keeping the hash in sync.
    pub(crate) fn set_en_passant(&mut self, sq: Option<Square>) {
        if let Some(old) = self.en_passant {
            self.hash ^= zobrist::en_passant_key(old.file());
        }
        if let Some(new) = sq {
            self.hash ^= zobrist::en_passant_key(new.file());
        }
        self.en_passant = sq;
    }

    /// Replace the castling rights, keeping the hash in sync.
    pub(crate) fn set_castling(&mut self, rights: CastleRights) {
        self.hash ^= zobrist::castling_key(self.castling) ^ zobrist::castling_key(rights);
        self.castling = rights;
    }

    /// Hand the move to the opponent and advance the move counters.
    pub(crate) fn pass_turn(&mut self, reset_halfmove: bool) {
        self.halfmove_clock = if reset_halfmove { 0 } else { self.halfmove_clock.saturating_add(1) };
        if self.side_to_move == Color::Black {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }
        self.side_to_move = !self.side_to_move;
        self.hash ^= zobrist::side_key();
    }

    /// Validate the structural integrity of the board.
    pub fn validate(&self) -> Result<(), BoardError> {
        for color in Color::ALL {
            let count = self.colored_pieces(color, PieceKind::King).count();
            if count != 1 {
                return Err(BoardError::InvalidKingCount { color, count });
            }
        }

        if (self.pieces(PieceKind::Pawn) & (Bitboard::rank(0) | Bitboard::rank(7))).is_nonempty() {
            return Err(BoardError::PawnsOnBackRank);
        }

        // The side that just moved must not have left its king attacked.
        let waiting = !self.side_to_move;
        if self.is_square_attacked(self.king_square(waiting), self.side_to_move) {
            return Err(BoardError::OpponentInCheck);
        }

        Ok(())
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::starting_position()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board(\"{}\")", self)
    }
}

#[cfg(test)]
mod tests {
    use super::{Board, DARK_SQUARES};
    use crate::chess_move::Move;
    use crate::piece::{Color, PieceKind};
    use crate::square::Square;

    #[test]
    fn starting_position_validates() {
        Board::starting_position().validate().unwrap();
    }

    #[test]
    fn starting_position_piece_on() {
        let board = Board::starting_position();
        assert_eq!(board.piece_on(Square::E1), Some(PieceKind::King));
        assert_eq!(board.piece_on(Square::D8), Some(PieceKind::Queen));
        assert_eq!(board.piece_on(Square::B1), Some(PieceKind::Knight));
        assert_eq!(board.piece_on(Square::E7), Some(PieceKind::Pawn));
        assert_eq!(board.piece_on(Square::E4), None);
        assert_eq!(board.color_on(Square::E8), Some(Color::Black));
        assert_eq!(board.occupied().count(), 32);
    }

    #[test]
    fn king_square() {
        let board = Board::starting_position();
        assert_eq!(board.king_square(Color::White), Square::E1);
        assert_eq!(board.king_square(Color::Black), Square::E8);
    }

    #[test]
    fn checkers_found() {
        let board: Board = "4k3/8/8/8/8/8/3n4/4K3 w - - 0 1".parse().unwrap();
        assert!(board.in_check());
        assert_eq!(board.checkers().lsb(), Some(Square::D2));
        assert!(!Board::starting_position().in_check());
    }

    #[test]
    fn attackers_to_sees_both_colors() {
        let board: Board = "4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1".parse().unwrap();
        let attackers = board.attackers_to(Square::D5, board.occupied());
        assert!(attackers.contains(Square::E4));
        let attackers = board.attackers_to(Square::E4, board.occupied());
        assert!(attackers.contains(Square::D5));
    }

    #[test]
    fn non_pawn_material() {
        let board: Board = "4k3/pppp4/8/8/8/8/8/4K1N1 w - - 0 1".parse().unwrap();
        assert!(board.has_non_pawn_material(Color::White));
        assert!(!board.has_non_pawn_material(Color::Black));
    }

    #[test]
    fn capture_detection() {
        let board: Board = "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1".parse().unwrap();
        let ep = Move::new_en_passant(Square::E5, Square::D6);
        assert!(board.is_capture(ep));
        assert_eq!(board.captured_piece(ep), Some(PieceKind::Pawn));
        assert!(!board.is_capture(Move::new(Square::E5, Square::E6)));
    }

    #[test]
    fn insufficient_material() {
        let bare: Board = "4k3/8/8/8/8/8/8/4K3 w - - 0 1".parse().unwrap();
        assert!(bare.is_insufficient_material());
        let knight: Board = "4k3/8/8/8/8/8/8/4KN2 w - - 0 1".parse().unwrap();
        assert!(knight.is_insufficient_material());
        let same_color_bishops: Board = "4kb2/8/8/8/8/8/8/2B1K3 w - - 0 1".parse().unwrap();
        assert!(same_color_bishops.is_insufficient_material());
        let rook: Board = "4k3/8/8/8/8/8/8/4KR2 w - - 0 1".parse().unwrap();
        assert!(!rook.is_insufficient_material());
        let opposite_bishops: Board = "4k1b1/8/8/8/8/8/8/2B1K3 w - - 0 1".parse().unwrap();
        assert!(!opposite_bishops.is_insufficient_material());
    }

    #[test]
    fn dark_squares() {
        assert_eq!(DARK_SQUARES.count(), 32);
        for sq in [Square::A1, Square::C1, Square::B2, Square::E5, Square::H8] {
            assert!(DARK_SQUARES.contains(sq), "{sq}");
        }
        for sq in [Square::B1, Square::H1, Square::A8, Square::E4] {
            assert!(!DARK_SQUARES.contains(sq), "{sq}");
        }
    }

    #[test]
    fn halfmove_draw() {
        let board: Board = "4k3/8/8/8/8/8/8/4KR2 w - - 100 80".parse().unwrap();
        assert!(board.is_halfmove_draw());
        let board: Board = "4k3/8/8/8/8/8/8/4KR2 w - - 99 80".parse().unwrap();
        assert!(!board.is_halfmove_draw());
    }
}
