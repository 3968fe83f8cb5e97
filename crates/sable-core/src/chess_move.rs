//! Chess move representation, bit-packed into a u16.

use std::fmt;

use crate::board::Board;
use crate::error::MoveParseError;
use crate::movegen::generate_legal_moves;
use crate::piece::PieceKind;
use crate::square::Square;

const SQUARE_MASK: u16 = 0x003F;
const DST_SHIFT: u16 = 6;
const PROMO_SHIFT: u16 = 12;
const KIND_SHIFT: u16 = 14;

/// The category of a chess move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MoveKind {
    Normal = 0,
    Promotion = 1,
    EnPassant = 2,
    Castling = 3,
}

/// The piece a pawn promotes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PromotionPiece {
    Knight = 0,
    Bishop = 1,
    Rook = 2,
    Queen = 3,
}

impl PromotionPiece {
    pub const ALL: [PromotionPiece; 4] = [
        PromotionPiece::Knight,
        PromotionPiece::Bishop,
        PromotionPiece::Rook,
        PromotionPiece::Queen,
    ];

    pub const fn to_piece_kind(self) -> PieceKind {
        match self {
            PromotionPiece::Knight => PieceKind::Knight,
            PromotionPiece::Bishop => PieceKind::Bishop,
            PromotionPiece::Rook => PieceKind::Rook,
            PromotionPiece::Queen => PieceKind::Queen,
        }
    }

    pub const fn uci_char(self) -> char {
        match self {
            PromotionPiece::Knight => 'n',
            PromotionPiece::Bishop => 'b',
            PromotionPiece::Rook => 'r',
            PromotionPiece::Queen => 'q',
        }
    }
}

/// A chess move encoded in 16 bits.
///
/// ```text
/// bits  0-5:  source square      (0-63)
/// bits  6-11: destination square (0-63)
/// bits 12-13: promotion piece    (Knight=0, Bishop=1, Rook=2, Queen=3)
/// bits 14-15: move kind          (Normal=0, Promotion=1, EnPassant=2, Castling=3)
/// ```
///
/// Castling is encoded with the king's own source and destination squares.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Move(u16);

impl Move {
    /// Null move sentinel (A1→A1, Normal). Never a legal move.
    pub const NULL: Move = Move(0);

    const fn pack(source: Square, dest: Square, promo: u16, kind: MoveKind) -> Move {
        Move(
            source.index() as u16
                | (dest.index() as u16) << DST_SHIFT
                | promo << PROMO_SHIFT
                | (kind as u16) << KIND_SHIFT,
        )
    }

    /// Create a normal (quiet or capture) move.
    pub const fn new(source: Square, dest: Square) -> Move {
        Move::pack(source, dest, 0, MoveKind::Normal)
    }

    pub const fn new_promotion(source: Square, dest: Square, promo: PromotionPiece) -> Move {
        Move::pack(source, dest, promo as u16, MoveKind::Promotion)
    }

    pub const fn new_en_passant(source: Square, dest: Square) -> Move {
        Move::pack(source, dest, 0, MoveKind::EnPassant)
    }

    pub const fn new_castle(king_src: Square, king_dst: Square) -> Move {
        Move::pack(king_src, king_dst, 0, MoveKind::Castling)
    }

    /// Reconstruct a move from its packed form (see [`Move::raw`]).
    #[inline]
    pub const fn from_raw(bits: u16) -> Move {
        Move(bits)
    }

    /// The packed 16-bit encoding.
    #[inline]
    pub const fn raw(self) -> u16 {
        self.0
    }

    #[inline]
    pub const fn source(self) -> Square {
        Square::from_index_unchecked((self.0 & SQUARE_MASK) as u8)
    }

    #[inline]
    pub const fn dest(self) -> Square {
        Square::from_index_unchecked(((self.0 >> DST_SHIFT) & SQUARE_MASK) as u8)
    }

    pub const fn kind(self) -> MoveKind {
        match self.0 >> KIND_SHIFT {
            0 => MoveKind::Normal,
            1 => MoveKind::Promotion,
            2 => MoveKind::EnPassant,
            _ => MoveKind::Castling,
        }
    }

    /// Only meaningful when `kind() == MoveKind::Promotion`.
    pub const fn promotion_piece(self) -> PromotionPiece {
        match (self.0 >> PROMO_SHIFT) & 0b11 {
            0 => PromotionPiece::Knight,
            1 => PromotionPiece::Bishop,
            2 => PromotionPiece::Rook,
            _ => PromotionPiece::Queen,
        }
    }

    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        self.0 >> KIND_SHIFT == MoveKind::Promotion as u16
    }

    #[inline]
    pub const fn is_en_passant(self) -> bool {
        self.0 >> KIND_SHIFT == MoveKind::EnPassant as u16
    }

    #[inline]
    pub const fn is_castle(self) -> bool {
        self.0 >> KIND_SHIFT == MoveKind::Castling as u16
    }

    /// Return the UCI string representation.
    pub fn to_uci(self) -> String {
        self.to_string()
    }

    /// Resolve UCI text such as `e2e4` or `e7e8q` to the matching legal move.
    pub fn from_uci(text: &str, board: &Board) -> Result<Move, MoveParseError> {
        if !text.is_ascii() || !(4..=5).contains(&text.len()) {
            return Err(MoveParseError::Malformed(text.to_string()));
        }
        let source = Square::parse(&text[0..2])
            .ok_or_else(|| MoveParseError::Malformed(text.to_string()))?;
        let dest = Square::parse(&text[2..4])
            .ok_or_else(|| MoveParseError::Malformed(text.to_string()))?;
        let promo = text[4..].chars().next();

        generate_legal_moves(board)
            .as_slice()
            .iter()
            .copied()
            .find(|mv| {
                mv.source() == source
                    && mv.dest() == dest
                    && promo == mv.is_promotion().then(|| mv.promotion_piece().uci_char())
            })
            .ok_or_else(|| MoveParseError::Illegal(text.to_string()))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "0000")
        } else if self.is_promotion() {
            write!(f, "{}{}{}", self.source(), self.dest(), self.promotion_piece().uci_char())
        } else {
            write!(f, "{}{}", self.source(), self.dest())
        }
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({} {:?})", self, self.kind())
    }
}
