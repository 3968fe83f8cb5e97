//! UCI command parsing.

use std::time::Duration;

use sable_core::{Board, Move, PositionHistory};
use sable_engine::search::pool::MAX_THREADS;
use sable_engine::{EvalKind, TimeControl};

use crate::error::UciError;

/// Largest accepted `Hash` value in megabytes.
pub const MAX_HASH_MB: usize = 65536;

/// A position with the keys of every position that led to it.
#[derive(Debug, Clone)]
pub struct PositionInfo {
    pub board: Board,
    /// Ends with `board`'s own key.
    pub history: PositionHistory,
}

/// A `setoption` the engine understands, already range-checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UciOption {
    /// Transposition table size in megabytes.
    Hash(usize),
    Threads(usize),
    Eval(EvalKind),
}

/// A parsed UCI command.
#[derive(Debug)]
pub enum Command {
    /// `uci` -- identify the engine.
    Uci,
    /// `isready` -- synchronization ping.
    IsReady,
    /// `ucinewgame` -- reset engine state.
    UciNewGame,
    /// `position` -- set up a board position with optional moves applied.
    Position(PositionInfo),
    /// `go` -- start searching with given parameters.
    Go(TimeControl),
    SetOption(UciOption),
    /// `stop` -- halt the current search.
    Stop,
    /// `quit` -- exit the engine.
    Quit,
    /// `bench [depth]` -- run the fixed-depth benchmark.
    Bench(Option<usize>),
    /// `perft <depth>` -- count leaf nodes per root move.
    Perft(usize),
    /// `eval` -- static evaluation of the current position.
    Eval,
    /// `d` or `print` -- draw the current position.
    Print,
    /// Unrecognized command (silently ignored per UCI convention).
    Unknown(String),
}

/// Parse a single line of UCI input into a [`Command`].
pub fn parse_command(line: &str) -> Result<Command, UciError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.is_empty() {
        return Ok(Command::Unknown(String::new()));
    }

    match tokens[0] {
        "uci" => Ok(Command::Uci),
        "isready" => Ok(Command::IsReady),
        "ucinewgame" => Ok(Command::UciNewGame),
        "stop" => Ok(Command::Stop),
        "quit" => Ok(Command::Quit),
        "position" => parse_position(&tokens[1..]).map(Command::Position),
        "go" => parse_go(&tokens[1..]).map(Command::Go),
        "setoption" => parse_setoption(&tokens[1..]).map(Command::SetOption),
        "bench" => parse_bench(&tokens[1..]),
        "perft" => parse_perft(&tokens[1..]),
        "eval" => Ok(Command::Eval),
        "d" | "print" => Ok(Command::Print),
        _ => Ok(Command::Unknown(tokens[0].to_string())),
    }
}

/// Parse the `position` command arguments.
///
/// Supports:
/// - `position startpos [moves e2e4 d7d5 ...]`
/// - `position fen <fen-string> [moves e2e4 d7d5 ...]`
///
/// The FEN may omit its two move counters.
fn parse_position(tokens: &[&str]) -> Result<PositionInfo, UciError> {
    let moves_at = tokens.iter().position(|&t| t == "moves").unwrap_or(tokens.len());
    let (setup, moves) = tokens.split_at(moves_at);

    let mut board = match setup.split_first() {
        Some((&"startpos", [])) => Board::starting_position(),
        Some((&"fen", fields)) => {
            let fen = fields.join(" ");
            fen.parse().map_err(|source| UciError::InvalidFen { fen, source })?
        }
        _ => return Err(UciError::MalformedPosition),
    };

    let mut history = PositionHistory::new();
    history.push(board.hash());
    for text in moves.iter().skip(1) {
        let mv = Move::from_uci(text, &board)?;
        board = board.make_move(mv);
        history.push(board.hash());
    }

    Ok(PositionInfo { board, history })
}

/// Parse the `go` command arguments.
///
/// Supports: wtime, btime, winc, binc, movestogo, depth, movetime,
/// nodes, infinite. Unknown tokens are silently skipped.
fn parse_go(tokens: &[&str]) -> Result<TimeControl, UciError> {
    let mut tc = TimeControl::default();

    let mut i = 0;
    while i < tokens.len() {
        let value = tokens.get(i + 1);
        match tokens[i] {
            "wtime" => tc.wtime = Some(parse_millis(value, "wtime")?),
            "btime" => tc.btime = Some(parse_millis(value, "btime")?),
            "winc" => tc.winc = Some(parse_millis(value, "winc")?),
            "binc" => tc.binc = Some(parse_millis(value, "binc")?),
            "movestogo" => tc.movestogo = Some(parse_int(value, "movestogo")?),
            "depth" => tc.depth = Some(parse_int(value, "depth")?),
            "movetime" => tc.movetime = Some(parse_millis(value, "movetime")?),
            "nodes" => tc.nodes = Some(parse_int(value, "nodes")?),
            "infinite" => {
                tc.infinite = true;
                i += 1;
                continue;
            }
            _ => {
                i += 1;
                continue;
            }
        }
        i += 2;
    }

    Ok(tc)
}

/// Parse a millisecond value from a token. GUIs may send negative clock
/// values when a player is past the flag; those count as zero.
fn parse_millis(token: Option<&&str>, param: &str) -> Result<Duration, UciError> {
    let ms: i64 = parse_int(token, param)?;
    Ok(Duration::from_millis(ms.max(0) as u64))
}

/// Parse an integer value from a token.
fn parse_int<T: std::str::FromStr>(token: Option<&&str>, param: &str) -> Result<T, UciError> {
    let value = token.ok_or_else(|| UciError::MissingGoValue { param: param.to_string() })?;
    value.parse().map_err(|_| UciError::InvalidGoValue {
        param: param.to_string(),
        value: value.to_string(),
    })
}

/// Parse `setoption name <name> [value <value>]`.
///
/// Option names are matched case-insensitively and may contain spaces.
fn parse_setoption(tokens: &[&str]) -> Result<UciOption, UciError> {
    let Some((&"name", rest)) = tokens.split_first() else {
        return Err(UciError::MalformedSetOption);
    };
    let value_at = rest.iter().position(|&t| t == "value").unwrap_or(rest.len());
    let name = rest[..value_at].join(" ");
    let value = rest.get(value_at + 1..).unwrap_or_default().join(" ");
    if name.is_empty() {
        return Err(UciError::MalformedSetOption);
    }

    let invalid = || UciError::InvalidOptionValue { name: name.clone(), value: value.clone() };
    match name.to_ascii_lowercase().as_str() {
        "hash" => match value.parse::<usize>() {
            Ok(mb) if (1..=MAX_HASH_MB).contains(&mb) => Ok(UciOption::Hash(mb)),
            _ => Err(invalid()),
        },
        "threads" => match value.parse::<usize>() {
            Ok(n) if (1..=MAX_THREADS).contains(&n) => Ok(UciOption::Threads(n)),
            _ => Err(invalid()),
        },
        "eval" => value.parse::<EvalKind>().map(UciOption::Eval).map_err(|_| invalid()),
        _ => Err(UciError::UnknownOption { name }),
    }
}

fn parse_bench(tokens: &[&str]) -> Result<Command, UciError> {
    match tokens.first() {
        None => Ok(Command::Bench(None)),
        Some(value) => value
            .parse()
            .map(|depth| Command::Bench(Some(depth)))
            .map_err(|_| UciError::InvalidDepth { value: value.to_string() }),
    }
}

fn parse_perft(tokens: &[&str]) -> Result<Command, UciError> {
    let value = tokens.first().copied().unwrap_or_default();
    value
        .parse()
        .map(Command::Perft)
        .map_err(|_| UciError::InvalidDepth { value: value.to_string() })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn go(line: &str) -> TimeControl {
        match parse_command(line).unwrap() {
            Command::Go(tc) => tc,
            other => panic!("expected Go, got {other:?}"),
        }
    }

    fn position(line: &str) -> PositionInfo {
        match parse_command(line).unwrap() {
            Command::Position(info) => info,
            other => panic!("expected Position, got {other:?}"),
        }
    }

    fn option(line: &str) -> UciOption {
        match parse_command(line).unwrap() {
            Command::SetOption(opt) => opt,
            other => panic!("expected SetOption, got {other:?}"),
        }
    }

    #[test]
    fn parse_simple_commands() {
        assert!(matches!(parse_command("uci").unwrap(), Command::Uci));
        assert!(matches!(parse_command("isready").unwrap(), Command::IsReady));
        assert!(matches!(parse_command("ucinewgame").unwrap(), Command::UciNewGame));
        assert!(matches!(parse_command("stop").unwrap(), Command::Stop));
        assert!(matches!(parse_command("quit").unwrap(), Command::Quit));
    }

    #[test]
    fn parse_position_startpos() {
        let info = position("position startpos");
        assert_eq!(info.board, Board::starting_position());
        assert_eq!(info.history.len(), 1);
        assert_eq!(info.history.last(), Some(info.board.hash()));
    }

    #[test]
    fn parse_position_startpos_with_moves() {
        let info = position("position startpos moves e2e4 e7e5 g1f3");
        assert_eq!(info.history.len(), 4);
        assert_eq!(info.history.last(), Some(info.board.hash()));
        let expected: Board = "rnbqkbnr/pppp1ppp/8/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2".parse().unwrap();
        assert_eq!(info.board, expected);
    }

    #[test]
    fn parse_position_fen() {
        let info = position("position fen rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1");
        assert_eq!(info.board.side_to_move(), sable_core::Color::Black);
    }

    #[test]
    fn parse_position_short_fen_with_moves() {
        let info = position("position fen 4k3/8/8/8/8/8/4P3/4K3 w - - moves e2e4");
        assert_eq!(info.history.len(), 2);
        assert_eq!(info.board.to_string(), "4k3/8/8/8/4P3/8/8/4K3 b - e3 0 1");
    }

    #[test]
    fn parse_position_rejects_illegal_moves() {
        assert!(matches!(
            parse_command("position startpos moves e2e5"),
            Err(UciError::InvalidMove { .. })
        ));
        assert!(matches!(
            parse_command("position startpos moves zz"),
            Err(UciError::InvalidMove { .. })
        ));
    }

    #[test]
    fn parse_position_missing_keyword() {
        assert!(matches!(parse_command("position"), Err(UciError::MalformedPosition)));
        assert!(matches!(parse_command("position moves e2e4"), Err(UciError::MalformedPosition)));
    }

    #[test]
    fn parse_position_invalid_fen() {
        assert!(matches!(parse_command("position fen invalid"), Err(UciError::InvalidFen { .. })));
    }

    #[test]
    fn parse_go_depth() {
        assert_eq!(go("go depth 6").depth, Some(6));
    }

    #[test]
    fn parse_go_bare_defaults() {
        assert_eq!(go("go"), TimeControl::default());
    }

    #[test]
    fn parse_go_clock() {
        let tc = go("go wtime 300000 btime 300000 winc 2000 binc 2000 movestogo 20");
        assert_eq!(tc.wtime, Some(Duration::from_millis(300000)));
        assert_eq!(tc.btime, Some(Duration::from_millis(300000)));
        assert_eq!(tc.winc, Some(Duration::from_millis(2000)));
        assert_eq!(tc.binc, Some(Duration::from_millis(2000)));
        assert_eq!(tc.movestogo, Some(20));
    }

    #[test]
    fn parse_go_negative_clock_is_zero() {
        assert_eq!(go("go wtime -150 btime 1000").wtime, Some(Duration::ZERO));
    }

    #[test]
    fn parse_go_movetime_nodes_infinite() {
        assert_eq!(go("go movetime 5000").movetime, Some(Duration::from_millis(5000)));
        assert_eq!(go("go nodes 1000000").nodes, Some(1_000_000));
        assert!(go("go infinite").infinite);
    }

    #[test]
    fn parse_go_skips_unknown_tokens() {
        let tc = go("go ponder searchmoves depth 3");
        assert_eq!(tc.depth, Some(3));
    }

    #[test]
    fn parse_go_bad_values() {
        assert!(matches!(parse_command("go wtime"), Err(UciError::MissingGoValue { .. })));
        assert!(matches!(parse_command("go depth abc"), Err(UciError::InvalidGoValue { .. })));
    }

    #[test]
    fn parse_setoption_known() {
        assert_eq!(option("setoption name Hash value 128"), UciOption::Hash(128));
        assert_eq!(option("setoption name threads value 4"), UciOption::Threads(4));
        assert_eq!(option("setoption name Eval value material"), UciOption::Eval(EvalKind::Material));
        assert_eq!(option("setoption name Eval value Classical"), UciOption::Eval(EvalKind::Classical));
    }

    #[test]
    fn parse_setoption_out_of_range() {
        for line in [
            "setoption name Hash value 0",
            "setoption name Hash value 65537",
            "setoption name Threads value 0",
            "setoption name Threads value 257",
            "setoption name Threads value many",
            "setoption name Eval value nnue",
        ] {
            assert!(matches!(parse_command(line), Err(UciError::InvalidOptionValue { .. })), "{line}");
        }
    }

    #[test]
    fn parse_setoption_unknown_or_malformed() {
        assert!(matches!(
            parse_command("setoption name Move Overhead value 10"),
            Err(UciError::UnknownOption { name }) if name == "Move Overhead"
        ));
        assert!(matches!(parse_command("setoption Hash 16"), Err(UciError::MalformedSetOption)));
        assert!(matches!(parse_command("setoption name value 16"), Err(UciError::MalformedSetOption)));
    }

    #[test]
    fn parse_bench_depth() {
        assert!(matches!(parse_command("bench").unwrap(), Command::Bench(None)));
        assert!(matches!(parse_command("bench 5").unwrap(), Command::Bench(Some(5))));
        assert!(matches!(parse_command("bench x"), Err(UciError::InvalidDepth { .. })));
    }

    #[test]
    fn parse_debug_commands() {
        assert!(matches!(parse_command("perft 4").unwrap(), Command::Perft(4)));
        assert!(matches!(parse_command("perft"), Err(UciError::InvalidDepth { .. })));
        assert!(matches!(parse_command("perft -1"), Err(UciError::InvalidDepth { .. })));
        assert!(matches!(parse_command("eval").unwrap(), Command::Eval));
        assert!(matches!(parse_command("d").unwrap(), Command::Print));
        assert!(matches!(parse_command("print").unwrap(), Command::Print));
    }

    #[test]
    fn parse_unknown_command() {
        assert!(matches!(parse_command("foobar").unwrap(), Command::Unknown(_)));
        assert!(matches!(parse_command("").unwrap(), Command::Unknown(_)));
    }
}
