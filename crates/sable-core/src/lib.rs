//! Core chess types: board representation, move generation, and game rules.

mod attacks;
mod bitboard;
mod board;
mod castle_rights;
mod chess_move;
mod error;
mod fen;
mod make_move;
mod movegen;
mod perft;
mod piece;
mod repetition;
mod square;
mod zobrist;

pub use attacks::{between, bishop_attacks, king_attacks, knight_attacks, line, pawn_attacks, rook_attacks};
pub use bitboard::Bitboard;
pub use board::Board;
pub use castle_rights::CastleRights;
pub use chess_move::{Move, MoveKind, PromotionPiece};
pub use error::{BoardError, FenError, MoveParseError};
pub use fen::STARTING_FEN;
pub use make_move::castle_rook_squares;
pub use movegen::{MoveList, generate_captures, generate_legal_moves};
pub use perft::{divide, perft};
pub use piece::{Color, PieceKind};
pub use repetition::PositionHistory;
pub use square::Square;
