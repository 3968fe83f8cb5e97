//! Sides and piece kinds.

use std::fmt;
use std::ops::Not;

/// The side a piece belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub const COUNT: usize = 2;
    pub const ALL: [Color; Color::COUNT] = [Color::White, Color::Black];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Parse the FEN active-color field.
    pub fn from_fen(text: &str) -> Option<Color> {
        match text {
            "w" => Some(Color::White),
            "b" => Some(Color::Black),
            _ => None,
        }
    }
}

impl Not for Color {
    type Output = Color;

    #[inline]
    fn not(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Color::White => "w",
            Color::Black => "b",
        })
    }
}

/// A piece without its color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub const COUNT: usize = 6;
    pub const ALL: [PieceKind; PieceKind::COUNT] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Black's FEN letters, in index order.
    const LETTERS: &'static [u8; PieceKind::COUNT] = b"pnbrqk";

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Parse a FEN piece letter. Uppercase letters are White.
    pub fn from_fen(letter: char) -> Option<(PieceKind, Color)> {
        let byte = u8::try_from(letter).ok()?;
        let index = Self::LETTERS.iter().position(|&l| l == byte.to_ascii_lowercase())?;
        let color = if byte.is_ascii_uppercase() { Color::White } else { Color::Black };
        Some((Self::ALL[index], color))
    }

    /// The FEN letter for this piece on `color`'s side.
    pub const fn fen_char(self, color: Color) -> char {
        let letter = Self::LETTERS[self.index()] as char;
        match color {
            Color::White => letter.to_ascii_uppercase(),
            Color::Black => letter,
        }
    }
}
