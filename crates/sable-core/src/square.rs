//! Board squares, numbered a1 = 0, b1 = 1, ..., h8 = 63.

use std::fmt;

use crate::bitboard::Bitboard;

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Square(u8);

/// Declares one named constant per square, counting up from a1.
macro_rules! named_squares {
    ($($name:ident)*) => {
        named_squares!(@ 0u8; $($name)*);
    };
    (@ $index:expr; $head:ident $($tail:ident)*) => {
        pub const $head: Square = Square($index);
        named_squares!(@ $index + 1; $($tail)*);
    };
    (@ $index:expr;) => {};
}

impl Square {
    pub const COUNT: usize = 64;

    named_squares! {
        A1 B1 C1 D1 E1 F1 G1 H1
        A2 B2 C2 D2 E2 F2 G2 H2
        A3 B3 C3 D3 E3 F3 G3 H3
        A4 B4 C4 D4 E4 F4 G4 H4
        A5 B5 C5 D5 E5 F5 G5 H5
        A6 B6 C6 D6 E6 F6 G6 H6
        A7 B7 C7 D7 E7 F7 G7 H7
        A8 B8 C8 D8 E8 F8 G8 H8
    }

    /// The square on `file` (0 = a) and `rank` (0 = first rank).
    #[inline]
    pub const fn at(file: u8, rank: u8) -> Square {
        debug_assert!(file < 8 && rank < 8);
        Square(rank * 8 + file)
    }

    #[inline]
    pub const fn from_index(index: u8) -> Option<Square> {
        if index < 64 { Some(Square(index)) } else { None }
    }

    #[inline]
    pub(crate) const fn from_index_unchecked(index: u8) -> Square {
        debug_assert!(index < 64);
        Square(index)
    }

    /// Parse a coordinate such as `e4`.
    pub fn parse(text: &str) -> Option<Square> {
        match *text.as_bytes() {
            [file @ b'a'..=b'h', rank @ b'1'..=b'8'] => Some(Square::at(file - b'a', rank - b'1')),
            _ => None,
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn file(self) -> u8 {
        self.0 & 7
    }

    #[inline]
    pub const fn rank(self) -> u8 {
        self.0 >> 3
    }

    /// Mirror across the horizontal midline, so a1 becomes a8.
    #[inline]
    pub const fn flip(self) -> Square {
        Square(self.0 ^ 56)
    }

    #[inline]
    pub const fn bitboard(self) -> Bitboard {
        Bitboard::new(1 << self.0)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file()) as char, self.rank() + 1)
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::Square;

    #[test]
    fn named_constants_count_from_a1() {
        assert_eq!(Square::A1.index(), 0);
        assert_eq!(Square::H1.index(), 7);
        assert_eq!(Square::E4.index(), 28);
        assert_eq!(Square::H8.index(), 63);
    }

    #[test]
    fn coordinates() {
        assert_eq!(Square::at(4, 3), Square::E4);
        assert_eq!((Square::C7.file(), Square::C7.rank()), (2, 6));
        assert_eq!(Square::B2.flip(), Square::B7);
    }

    #[test]
    fn parse_and_display() {
        for index in 0..64 {
            let sq = Square::from_index(index).unwrap();
            assert_eq!(Square::parse(&sq.to_string()), Some(sq));
        }
        assert_eq!(Square::E4.to_string(), "e4");
        for bad in ["", "e", "i1", "a9", "a1b", "E4"] {
            assert_eq!(Square::parse(bad), None, "{bad}");
        }
        assert_eq!(Square::from_index(64), None);
    }
}
