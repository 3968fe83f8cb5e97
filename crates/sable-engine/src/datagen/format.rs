//! On-disk layouts for finished self-play games.
//!
//! `Text` writes one line per searched position. `Viriformat` writes each
//! game as its packed start board followed by the moves played from it:
//!
//! ```text
//! header  32 bytes  occupancy u64, 16 bytes of piece nibbles, stm|ep u8,
//!                   halfmove u8, fullmove u16, eval i16, result u8, extra u8
//! move     4 bytes  packed move u16, white-relative score i16 (repeated)
//! end      4 bytes  zero
//! ```
//!
//! Integers are little-endian. Piece nibbles follow the occupied squares
//! from a1 upward, two per byte with the earlier square in the low half.

use std::fmt;
use std::io::{self, Read, Write};
use std::str::FromStr;

use sable_core::{
    Bitboard, Board, CastleRights, Color, FenError, Move, MoveKind, PieceKind, Square, castle_rook_squares,
    generate_legal_moves,
};

pub const HEADER_LEN: usize = 32;
/// Nibble of a rook that still carries a castling right.
const UNMOVED_ROOK: u8 = 6;
const BLACK_BIT: u8 = 8;
const BLACK_TO_MOVE: u8 = 0x80;
const NO_EN_PASSANT: u8 = 64;

/// Corner rooks with the right each one stands for, in FEN letter order.
const CASTLE_CORNERS: [(Square, CastleRights, char); 4] = [
    (Square::H1, CastleRights::WHITE_KING, 'K'),
    (Square::A1, CastleRights::WHITE_QUEEN, 'Q'),
    (Square::H8, CastleRights::BLACK_KING, 'k'),
    (Square::A8, CastleRights::BLACK_QUEEN, 'q'),
];

/// How finished games are written to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Viriformat,
}

impl OutputFormat {
    pub const fn extension(self) -> &'static str {
        match self {
            OutputFormat::Text => "txt",
            OutputFormat::Viriformat => "vf",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown output format `{0}`, expected `text` or `viriformat`")]
pub struct UnknownFormat(String);

impl FromStr for OutputFormat {
    type Err = UnknownFormat;

    fn from_str(name: &str) -> Result<OutputFormat, UnknownFormat> {
        match name {
            "text" | "txt" => Ok(OutputFormat::Text),
            "viriformat" | "vf" => Ok(OutputFormat::Viriformat),
            other => Err(UnknownFormat(other.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Text => "text",
            OutputFormat::Viriformat => "viriformat",
        })
    }
}

/// Final result of a game, from white's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum GameResult {
    BlackWin = 0,
    Draw = 1,
    WhiteWin = 2,
}

impl GameResult {
    fn from_byte(byte: u8) -> Option<GameResult> {
        match byte {
            0 => Some(GameResult::BlackWin),
            1 => Some(GameResult::Draw),
            2 => Some(GameResult::WhiteWin),
            _ => None,
        }
    }

    /// The white score the text format writes: `1.0`, `0.5` or `0.0`.
    pub const fn as_text(self) -> &'static str {
        match self {
            GameResult::BlackWin => "0.0",
            GameResult::Draw => "0.5",
            GameResult::WhiteWin => "1.0",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("invalid piece nibble {0:#x}")]
    Piece(u8),
    #[error("invalid en passant byte {0}")]
    EnPassant(u8),
    #[error("invalid result byte {0}")]
    Result(u8),
    #[error("header is not a valid position: {0}")]
    Position(#[from] FenError),
    #[error("packed move {packed:#06x} is not legal in {fen}")]
    IllegalMove { packed: u16, fen: String },
}

/// A finished self-play game: where searched play began, each move with
/// the white-relative score behind it, and how it ended.
#[derive(Debug, Clone, PartialEq)]
pub struct GameRecord {
    pub start: Board,
    pub moves: Vec<(Move, i16)>,
    pub result: GameResult,
}

impl GameRecord {
    pub fn new(start: Board) -> GameRecord {
        GameRecord { start, moves: Vec::new(), result: GameResult::Draw }
    }

    pub fn write(&self, format: OutputFormat, out: &mut impl Write) -> io::Result<()> {
        match format {
            OutputFormat::Text => self.write_text(out),
            OutputFormat::Viriformat => self.write_viriformat(out),
        }
    }

    /// `<fen> | <score> | <result>` for the position after every move.
    fn write_text(&self, out: &mut impl Write) -> io::Result<()> {
        let mut board = self.start;
        for &(mv, score) in &self.moves {
            board = board.make_move(mv);
            writeln!(out, "{board} | {score} | {}", self.result.as_text())?;
        }
        Ok(())
    }

    fn write_viriformat(&self, out: &mut impl Write) -> io::Result<()> {
        out.write_all(&marlin_header(&self.start, self.result))?;
        for &(mv, score) in &self.moves {
            out.write_all(&pack_move(mv).to_le_bytes())?;
            out.write_all(&score.to_le_bytes())?;
        }
        out.write_all(&[0; 4])
    }

    /// Read the next game of a Viriformat stream, or `None` at its end.
    pub fn read_viriformat(input: &mut impl Read) -> Result<Option<GameRecord>, DecodeError> {
        let mut header = [0u8; HEADER_LEN];
        match input.read_exact(&mut header) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(err) => return Err(err.into()),
        }
        let start: Board = header_fen(&header)?.parse()?;
        let result = GameResult::from_byte(header[30]).ok_or(DecodeError::Result(header[30]))?;

        let mut record = GameRecord { start, moves: Vec::new(), result };
        let mut board = start;
        loop {
            let mut entry = [0u8; 4];
            input.read_exact(&mut entry)?;
            if entry == [0; 4] {
                return Ok(Some(record));
            }
            let packed = u16::from_le_bytes([entry[0], entry[1]]);
            let score = i16::from_le_bytes([entry[2], entry[3]]);
            let mv = unpack_move(&board, packed)
                .ok_or_else(|| DecodeError::IllegalMove { packed, fen: board.to_string() })?;
            record.moves.push((mv, score));
            board = board.make_move(mv);
        }
    }
}

/// `from | to << 6 | flags`. Castling points at the rook's square, and a
/// promotion carries its piece (knight 0 to queen 3) in bits 12-13.
pub fn pack_move(mv: Move) -> u16 {
    let from = mv.source().index() as u16;
    let to = |sq: Square| (sq.index() as u16) << 6;
    match mv.kind() {
        MoveKind::Normal => from | to(mv.dest()),
        MoveKind::EnPassant => from | to(mv.dest()) | 0b01 << 14,
        MoveKind::Castling => {
            let rook = castle_rook_squares(mv.dest()).map_or(mv.dest(), |(rook, _)| rook);
            from | to(rook) | 0b10 << 14
        }
        MoveKind::Promotion => from | to(mv.dest()) | 0b11 << 14 | (mv.promotion_piece() as u16) << 12,
    }
}

fn unpack_move(board: &Board, packed: u16) -> Option<Move> {
    generate_legal_moves(board).as_slice().iter().copied().find(|&mv| pack_move(mv) == packed)
}

pub fn marlin_header(board: &Board, result: GameResult) -> [u8; HEADER_LEN] {
    let mut header = [0u8; HEADER_LEN];
    let occupied = board.occupied();
    header[..8].copy_from_slice(&occupied.inner().to_le_bytes());
    // A legal position never holds more than 32 pieces.
    for (i, sq) in occupied.take(32).enumerate() {
        header[8 + i / 2] |= piece_nibble(board, sq) << (4 * (i % 2));
    }

    let stm = match board.side_to_move() {
        Color::White => 0,
        Color::Black => BLACK_TO_MOVE,
    };
    let ep = board.en_passant().map_or(NO_EN_PASSANT, |sq| sq.index() as u8);
    header[24] = stm | ep;
    header[25] = board.halfmove_clock().min(u16::from(u8::MAX)) as u8;
    header[26..28].copy_from_slice(&board.fullmove_number().to_le_bytes());
    // Bytes 28-29 hold a static eval and 31 is spare; both stay zero.
    header[30] = result as u8;
    header
}

fn piece_nibble(board: &Board, sq: Square) -> u8 {
    let Some(kind) = board.piece_on(sq) else {
        return 0;
    };
    let unmoved_rook = kind == PieceKind::Rook
        && CASTLE_CORNERS.iter().any(|&(corner, right, _)| corner == sq && board.castling().contains(right));
    let nibble = if unmoved_rook { UNMOVED_ROOK } else { kind.index() as u8 };
    match board.color_on(sq) {
        Some(Color::Black) => nibble | BLACK_BIT,
        _ => nibble,
    }
}

/// Rebuild the FEN a header was packed from.
fn header_fen(header: &[u8; HEADER_LEN]) -> Result<String, DecodeError> {
    let mut occupancy = [0u8; 8];
    occupancy.copy_from_slice(&header[..8]);
    let occupied = Bitboard::new(u64::from_le_bytes(occupancy));

    let mut letters = [None; 64];
    let mut rooks = Bitboard::EMPTY;
    for (i, sq) in occupied.take(32).enumerate() {
        let nibble = (header[8 + i / 2] >> (4 * (i % 2))) & 0xF;
        let color = if nibble & BLACK_BIT != 0 { Color::Black } else { Color::White };
        let kind = match nibble & !BLACK_BIT {
            UNMOVED_ROOK => {
                rooks = rooks.with(sq);
                PieceKind::Rook
            }
            n => *PieceKind::ALL.get(usize::from(n)).ok_or(DecodeError::Piece(nibble))?,
        };
        letters[sq.index()] = Some(kind.fen_char(color));
    }

    let mut fen = String::with_capacity(90);
    for rank in (0..8).rev() {
        let mut empty = 0u8;
        for file in 0..8 {
            match letters[rank * 8 + file] {
                Some(letter) => {
                    if empty > 0 {
                        fen.push(char::from(b'0' + empty));
                        empty = 0;
                    }
                    fen.push(letter);
                }
                None => empty += 1,
            }
        }
        if empty > 0 {
            fen.push(char::from(b'0' + empty));
        }
        if rank > 0 {
            fen.push('/');
        }
    }

    let stm = if header[24] & BLACK_TO_MOVE != 0 { Color::Black } else { Color::White };
    let castling: String =
        CASTLE_CORNERS.iter().filter(|&&(corner, ..)| rooks.contains(corner)).map(|&(.., letter)| letter).collect();
    let ep = match header[24] & !BLACK_TO_MOVE {
        NO_EN_PASSANT => "-".to_string(),
        index => Square::from_index(index).ok_or(DecodeError::EnPassant(index))?.to_string(),
    };
    let fullmove = u16::from_le_bytes([header[26], header[27]]);
    let castling = if castling.is_empty() { "-" } else { castling.as_str() };
    Ok(format!("{fen} {stm} {castling} {ep} {} {fullmove}", header[25]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(fen: &str) -> Board {
        fen.parse().unwrap()
    }

    fn play(start: Board, moves: &[(&str, i16)]) -> GameRecord {
        let mut record = GameRecord::new(start);
        let mut current = start;
        for &(uci, score) in moves {
            let mv = Move::from_uci(uci, &current).unwrap();
            record.moves.push((mv, score));
            current = current.make_move(mv);
        }
        record
    }

    #[test]
    fn format_names() {
        assert_eq!("text".parse(), Ok(OutputFormat::Text));
        assert_eq!("vf".parse(), Ok(OutputFormat::Viriformat));
        assert!("binpack".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Viriformat.to_string(), "viriformat");
        assert_eq!(OutputFormat::Viriformat.extension(), "vf");
    }

    #[test]
    fn start_position_header() {
        let header = marlin_header(&Board::starting_position(), GameResult::WhiteWin);
        assert_eq!(u64::from_le_bytes(header[..8].try_into().unwrap()), 0xFFFF_0000_0000_FFFF);
        // a1 castling rook and b1 knight share the first byte.
        assert_eq!(header[8], 0x16);
        assert_eq!(header[10], 0x25);
        assert_eq!(header[12], 0x00);
        assert_eq!(header[16], 0x88);
        assert_eq!(header[20], 0x9E);
        assert_eq!(header[23], 0xE9);
        assert_eq!(header[24], NO_EN_PASSANT);
        assert_eq!(header[25], 0);
        assert_eq!(u16::from_le_bytes([header[26], header[27]]), 1);
        assert_eq!(header[30], 2);
    }

    #[test]
    fn header_keeps_side_en_passant_and_counters() {
        let b = board("rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w Kq d6 0 3");
        let header = marlin_header(&b, GameResult::Draw);
        assert_eq!(header[24], Square::D6.index() as u8);
        assert_eq!(header_fen(&header).unwrap(), b.to_string());

        let b = board("4k3/8/8/8/8/8/8/R3K2R b Q - 17 40");
        let header = marlin_header(&b, GameResult::Draw);
        assert_eq!(header[24], BLACK_TO_MOVE | NO_EN_PASSANT);
        assert_eq!(header[25], 17);
        // Only the a1 rook still carries a right.
        assert_eq!(header[8] & 0xF, UNMOVED_ROOK);
        assert_eq!(header[9] & 0xF, PieceKind::Rook.index() as u8);
        assert_eq!(header_fen(&header).unwrap(), b.to_string());
    }

    #[test]
    fn packed_move_flags() {
        let b = board("r3k2r/1P6/8/3pP3/8/8/8/R3K2R w KQkq d6 0 1");
        let packed = |uci: &str| pack_move(Move::from_uci(uci, &b).unwrap());
        assert_eq!(packed("e1g1"), 4 | 7 << 6 | 0b10 << 14);
        assert_eq!(packed("e1c1"), 4 | 0b10 << 14);
        assert_eq!(packed("e5d6"), 36 | 43 << 6 | 0b01 << 14);
        assert_eq!(packed("b7a8q"), 49 | 56 << 6 | 0b11 << 14 | 3 << 12);
        assert_eq!(packed("b7b8n"), 49 | 57 << 6 | 0b11 << 14);
        assert_eq!(packed("a1a7"), 48 << 6);
    }

    #[test]
    fn viriformat_games_read_back() {
        let first = play(
            board("r3k2r/1P6/8/8/3p4/8/4P3/R3K2R w KQkq - 0 20"),
            &[("e2e4", 31), ("d4e3", -12), ("e1c1", 5), ("e8g8", 0), ("b7b8q", 900), ("a8b8", -400)],
        );
        let mut second = play(Board::starting_position(), &[("g1f3", 20), ("g8f6", 15)]);
        second.result = GameResult::BlackWin;

        let mut bytes = Vec::new();
        first.write(OutputFormat::Viriformat, &mut bytes).unwrap();
        second.write(OutputFormat::Viriformat, &mut bytes).unwrap();
        assert_eq!(bytes.len(), 2 * HEADER_LEN + 4 * (6 + 1) + 4 * (2 + 1));
        assert_eq!(bytes[HEADER_LEN..HEADER_LEN + 4], [0x0C, 0x07, 31, 0]);

        let mut input = bytes.as_slice();
        assert_eq!(GameRecord::read_viriformat(&mut input).unwrap(), Some(first));
        assert_eq!(GameRecord::read_viriformat(&mut input).unwrap(), Some(second));
        assert!(GameRecord::read_viriformat(&mut input).unwrap().is_none());
    }

    #[test]
    fn illegal_moves_are_rejected() {
        let mut bytes = marlin_header(&Board::starting_position(), GameResult::Draw).to_vec();
        // e2e5 is not a pawn move.
        bytes.extend_from_slice(&(12u16 | 36 << 6).to_le_bytes());
        bytes.extend_from_slice(&[0; 6]);
        let err = GameRecord::read_viriformat(&mut bytes.as_slice()).unwrap_err();
        assert!(matches!(err, DecodeError::IllegalMove { .. }));
    }

    #[test]
    fn text_lines_follow_each_move() {
        let mut record = play(Board::starting_position(), &[("e2e4", -35), ("e7e5", 12)]);
        record.result = GameResult::WhiteWin;
        let mut out = Vec::new();
        record.write(OutputFormat::Text, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1 | -35 | 1.0\n\
             rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2 | 12 | 1.0\n"
        );
    }
}
