//! Castling rights.

use std::fmt;
use std::str::FromStr;

use crate::error::FenError;

/// The four castling rights as bits: white king side, white queen side,
/// black king side, black queen side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CastleRights(u8);

impl CastleRights {
    pub const NONE: CastleRights = CastleRights(0);
    pub const WHITE_KING: CastleRights = CastleRights(1);
    pub const WHITE_QUEEN: CastleRights = CastleRights(2);
    pub const BLACK_KING: CastleRights = CastleRights(4);
    pub const BLACK_QUEEN: CastleRights = CastleRights(8);
    pub const WHITE_BOTH: CastleRights = CastleRights(1 | 2);
    pub const BLACK_BOTH: CastleRights = CastleRights(4 | 8);
    pub const ALL: CastleRights = CastleRights(15);

    /// FEN letters in the order FEN writes them.
    const LETTERS: [(char, CastleRights); 4] = [
        ('K', CastleRights::WHITE_KING),
        ('Q', CastleRights::WHITE_QUEEN),
        ('k', CastleRights::BLACK_KING),
        ('q', CastleRights::BLACK_QUEEN),
    ];

    /// Dense index in `0..16`, for hashing.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn contains(self, rights: CastleRights) -> bool {
        self.0 & rights.0 == rights.0
    }

    #[inline]
    pub const fn remove(self, rights: CastleRights) -> CastleRights {
        CastleRights(self.0 & !rights.0)
    }
}

impl FromStr for CastleRights {
    type Err = FenError;

    fn from_str(text: &str) -> Result<CastleRights, FenError> {
        if text == "-" {
            return Ok(CastleRights::NONE);
        }
        text.chars().try_fold(CastleRights::NONE, |rights, character| {
            let (_, flag) = Self::LETTERS
                .into_iter()
                .find(|&(letter, _)| letter == character)
                .ok_or(FenError::InvalidCastlingChar { character })?;
            Ok(CastleRights(rights.0 | flag.0))
        })
    }
}

impl fmt::Display for CastleRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("-");
        }
        for (letter, flag) in Self::LETTERS {
            if self.contains(flag) {
                write!(f, "{letter}")?;
            }
        }
        Ok(())
    }
}
