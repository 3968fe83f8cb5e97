//! Error types for FEN parsing, board validation and move parsing.

use crate::piece::Color;

/// Errors that occur when parsing a FEN string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FenError {
    #[error("expected 4 or 6 FEN fields, found {found}")]
    WrongFieldCount { found: usize },
    #[error("expected 8 ranks, found {found}")]
    WrongRankCount { found: usize },
    /// A rank describes more or fewer than 8 squares.
    #[error("rank {rank_index} describes {length} squares")]
    BadRankLength { rank_index: usize, length: usize },
    #[error("invalid piece character '{character}'")]
    InvalidPieceChar { character: char },
    #[error("invalid active color '{found}'")]
    InvalidColor { found: String },
    #[error("invalid castling character '{character}'")]
    InvalidCastlingChar { character: char },
    #[error("invalid en passant square '{found}'")]
    InvalidEnPassant { found: String },
    #[error("invalid {field} '{found}'")]
    InvalidMoveCounter { field: &'static str, found: String },
    #[error("invalid board: {0}")]
    InvalidBoard(#[from] BoardError),
}

/// Errors from structural validation of a [`Board`](crate::board::Board).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("expected 1 king for {color}, found {count}")]
    InvalidKingCount { color: Color, count: u32 },
    #[error("pawns found on back rank")]
    PawnsOnBackRank,
    /// The side that is not to move is in check.
    #[error("side not to move is in check")]
    OpponentInCheck,
}

/// Errors from turning UCI move text into a [`Move`](crate::chess_move::Move).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveParseError {
    #[error("malformed move '{0}'")]
    Malformed(String),
    #[error("illegal move '{0}'")]
    Illegal(String),
}
