//! FEN string parsing and serialization for [`Board`].

use std::fmt;
use std::str::FromStr;

use crate::board::Board;
use crate::castle_rights::CastleRights;
use crate::error::FenError;
use crate::piece::{Color, PieceKind};
use crate::square::Square;

/// The FEN string for the standard starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

fn parse_counter(field: &'static str, text: Option<&str>, default: u16) -> Result<u16, FenError> {
    match text {
        None => Ok(default),
        Some(text) => text.parse().map_err(|_| FenError::InvalidMoveCounter {
            field,
            found: text.to_string(),
        }),
    }
}

impl FromStr for Board {
    type Err = FenError;

    /// Parse a FEN string. The two move counters may be omitted (EPD style),
    /// in which case they default to `0 1`.
    fn from_str(fen: &str) -> Result<Board, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 4 && fields.len() != 6 {
            return Err(FenError::WrongFieldCount { found: fields.len() });
        }

        let ranks: Vec<&str> = fields[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::WrongRankCount { found: ranks.len() });
        }

        let mut placement = Vec::with_capacity(32);
        for (rank_index, rank_str) in ranks.iter().enumerate() {
            // FEN lists rank 8 first.
            let rank_base = (7 - rank_index) * 8;
            let mut file = 0usize;

            for c in rank_str.chars() {
                if let Some(skip) = c.to_digit(10) {
                    if !(1..=8).contains(&skip) {
                        return Err(FenError::InvalidPieceChar { character: c });
                    }
                    file += skip as usize;
                    continue;
                }

                let (kind, color) = PieceKind::from_fen(c).ok_or(FenError::InvalidPieceChar { character: c })?;
                let sq = (file < 8)
                    .then(|| Square::from_index((rank_base + file) as u8))
                    .flatten()
                    .ok_or(FenError::BadRankLength { rank_index, length: file + 1 })?;
                placement.push((sq, kind, color));
                file += 1;
            }

            if file != 8 {
                return Err(FenError::BadRankLength { rank_index, length: file });
            }
        }

        let side_to_move = Color::from_fen(fields[1])
            .ok_or_else(|| FenError::InvalidColor { found: fields[1].to_string() })?;
        let castling: CastleRights = fields[2].parse()?;

        let en_passant = match fields[3] {
            "-" => None,
            text => Some(Square::parse(text).ok_or_else(|| FenError::InvalidEnPassant {
                found: text.to_string(),
            })?),
        };

        let halfmove_clock = parse_counter("halfmove clock", fields.get(4).copied(), 0)?;
        let fullmove_number = parse_counter("fullmove number", fields.get(5).copied(), 1)?;

        let board = Board::from_parts(
            &placement,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
        );
        board.validate()?;
        Ok(board)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8u8).rev() {
            let mut empty = 0;
            for file in 0..8u8 {
                let sq = Square::at(file, rank);
                match (self.piece_on(sq), self.color_on(sq)) {
                    (Some(kind), Some(color)) => {
                        if empty > 0 {
                            write!(f, "{empty}")?;
                            empty = 0;
                        }
                        write!(f, "{}", kind.fen_char(color))?;
                    }
                    _ => empty += 1,
                }
            }
            if empty > 0 {
                write!(f, "{empty}")?;
            }
            if rank > 0 {
                write!(f, "/")?;
            }
        }

        write!(f, " {} {}", self.side_to_move(), self.castling())?;
        match self.en_passant() {
            Some(sq) => write!(f, " {sq}")?,
            None => write!(f, " -")?,
        }
        write!(f, " {} {}", self.halfmove_clock(), self.fullmove_number())
    }
}
