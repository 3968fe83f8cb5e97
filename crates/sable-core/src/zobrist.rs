//! Zobrist hashing keys.
//!
//! All keys live in one flat table generated at compile time:
//! 768 piece-square keys, one side-to-move key, 16 castling keys and
//! 8 en passant file keys.

use crate::board::Board;
use crate::castle_rights::CastleRights;
use crate::piece::{Color, PieceKind};
use crate::square::Square;

const PIECE_KEYS: usize = 12 * 64;
const SIDE_OFFSET: usize = PIECE_KEYS;
const CASTLING_OFFSET: usize = SIDE_OFFSET + 1;
const EN_PASSANT_OFFSET: usize = CASTLING_OFFSET + 16;
const KEY_COUNT: usize = EN_PASSANT_OFFSET + 8;

static KEYS: [u64; KEY_COUNT] = {
    let mut keys = [0u64; KEY_COUNT];
    let mut state: u64 = 0x5AB1_E0DD_C0FF_EE11;
    let mut i = 0;
    while i < KEY_COUNT {
        let (key, next) = splitmix64(state);
        keys[i] = key;
        state = next;
        i += 1;
    }
    keys
};

/// SplitMix64 step. Returns `(value, next_state)`.
const fn splitmix64(state: u64) -> (u64, u64) {
    let next = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = next;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    (z ^ (z >> 31), next)
}

#[inline]
pub(crate) fn piece_key(kind: PieceKind, color: Color, sq: Square) -> u64 {
    KEYS[(color.index() * PieceKind::COUNT + kind.index()) * 64 + sq.index()]
}

#[inline]
pub(crate) fn side_key() -> u64 {
    KEYS[SIDE_OFFSET]
}

#[inline]
pub(crate) fn castling_key(rights: CastleRights) -> u64 {
    KEYS[CASTLING_OFFSET + rights.index()]
}

#[inline]
pub(crate) fn en_passant_key(file: u8) -> u64 {
    KEYS[EN_PASSANT_OFFSET + file as usize]
}

/// Compute a Zobrist hash from scratch for the given board.
pub(crate) fn hash_from_scratch(board: &Board) -> u64 {
    let mut hash = 0u64;

    for color in Color::ALL {
        for kind in PieceKind::ALL {
            for sq in board.colored_pieces(color, kind) {
                hash ^= piece_key(kind, color, sq);
            }
        }
    }

    if board.side_to_move() == Color::Black {
        hash ^= side_key();
    }
    hash ^= castling_key(board.castling());
    if let Some(ep) = board.en_passant() {
        hash ^= en_passant_key(ep.file());
    }

    hash
}
