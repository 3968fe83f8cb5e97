//! Square sets packed into a `u64`, one bit per square index.

use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};

use crate::piece::Color;
use crate::square::Square;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bitboard(u64);

impl Bitboard {
    pub const EMPTY: Bitboard = Bitboard(0);
    pub const FULL: Bitboard = Bitboard(!0);

    #[inline]
    pub const fn new(bits: u64) -> Bitboard {
        Bitboard(bits)
    }

    #[inline]
    pub const fn inner(self) -> u64 {
        self.0
    }

    /// Every square of `rank` (0 = first rank).
    #[inline]
    pub const fn rank(rank: u8) -> Bitboard {
        Bitboard(0xFF << (8 * rank))
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_nonempty(self) -> bool {
        self.0 != 0
    }

    #[inline]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    #[inline]
    pub const fn contains(self, sq: Square) -> bool {
        self.0 & sq.bitboard().0 != 0
    }

    #[inline]
    pub const fn with(self, sq: Square) -> Bitboard {
        Bitboard(self.0 | sq.bitboard().0)
    }

    #[inline]
    pub const fn without(self, sq: Square) -> Bitboard {
        Bitboard(self.0 & !sq.bitboard().0)
    }

    /// The lowest-indexed square in the set.
    #[inline]
    pub const fn lsb(self) -> Option<Square> {
        match self.0 {
            0 => None,
            bits => Some(Square::from_index_unchecked(bits.trailing_zeros() as u8)),
        }
    }

    /// Move every square one rank toward the far side of `color`.
    #[inline]
    pub const fn forward(self, color: Color) -> Bitboard {
        match color {
            Color::White => Bitboard(self.0 << 8),
            Color::Black => Bitboard(self.0 >> 8),
        }
    }
}

macro_rules! bit_ops {
    ($($op:ident $method:ident $assign:ident $assign_method:ident => $sym:tt;)*) => {$(
        impl $op for Bitboard {
            type Output = Bitboard;

            #[inline]
            fn $method(self, rhs: Bitboard) -> Bitboard {
                Bitboard(self.0 $sym rhs.0)
            }
        }

        impl $assign for Bitboard {
            #[inline]
            fn $assign_method(&mut self, rhs: Bitboard) {
                self.0 = self.0 $sym rhs.0;
            }
        }
    )*};
}

bit_ops! {
    BitAnd bitand BitAndAssign bitand_assign => &;
    BitOr bitor BitOrAssign bitor_assign => |;
    BitXor bitxor BitXorAssign bitxor_assign => ^;
}

impl Not for Bitboard {
    type Output = Bitboard;

    #[inline]
    fn not(self) -> Bitboard {
        Bitboard(!self.0)
    }
}

/// Drains the set from the lowest index up.
impl Iterator for Bitboard {
    type Item = Square;

    #[inline]
    fn next(&mut self) -> Option<Square> {
        let sq = self.lsb()?;
        self.0 &= self.0 - 1;
        Some(sq)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.count() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Bitboard {}

impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bitboard({:#018x})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::Bitboard;
    use crate::piece::Color;
    use crate::square::Square;

    #[test]
    fn membership() {
        let bb = Bitboard::EMPTY.with(Square::E4).with(Square::A8);
        assert!(bb.contains(Square::E4));
        assert!(!bb.contains(Square::D4));
        assert_eq!(bb.count(), 2);
        assert!(bb.without(Square::E4).without(Square::A8).is_empty());
        assert!((!Bitboard::EMPTY).contains(Square::H1));
    }

    #[test]
    fn iterates_in_index_order() {
        let bb = Bitboard::EMPTY.with(Square::H8).with(Square::A1).with(Square::E4);
        assert_eq!(bb.len(), 3);
        assert_eq!(bb.lsb(), Some(Square::A1));
        assert_eq!(bb.collect::<Vec<_>>(), vec![Square::A1, Square::E4, Square::H8]);
    }

    #[test]
    fn ranks_and_forward() {
        assert_eq!(Bitboard::rank(0).count(), 8);
        assert!(Bitboard::rank(7).contains(Square::C8));
        assert_eq!(Bitboard::rank(1).forward(Color::White), Bitboard::rank(2));
        assert_eq!(Bitboard::rank(6).forward(Color::Black), Bitboard::rank(5));
        assert!(Bitboard::rank(7).forward(Color::White).is_empty());
    }

    #[test]
    fn operators() {
        let mut bb = Bitboard::rank(0) | Bitboard::rank(1);
        bb &= !Bitboard::rank(1);
        assert_eq!(bb, Bitboard::rank(0));
        bb ^= Square::A1.bitboard();
        assert_eq!(bb.count(), 7);
        assert_eq!(bb & Square::A1.bitboard(), Bitboard::EMPTY);
    }
}
