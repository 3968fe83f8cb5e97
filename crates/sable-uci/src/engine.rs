//! Event-driven UCI engine.

use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use tracing::{debug, info, warn};

use sable_core::{Board, PositionHistory, Square, divide};
use sable_engine::search::params::BENCH_DEPTH;
use sable_engine::search::pool::{DEFAULT_HASH_MB, MAX_THREADS};
use sable_engine::{EvalKind, SearchResult, Searcher, TimeControl, bench, evaluate, limit_from_go};

use crate::command::{Command, MAX_HASH_MB, PositionInfo, UciOption, parse_command};
use crate::error::UciError;
use crate::report::{Output, UciReporter};

/// Configuration knobs adjustable via `setoption`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Transposition table size in megabytes.
    pub hash_mb: usize,
    /// Number of search threads.
    pub threads: usize,
    pub eval: EvalKind,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hash_mb: DEFAULT_HASH_MB,
            threads: 1,
            eval: EvalKind::default(),
        }
    }
}

/// Events processed by the main engine loop.
enum EngineEvent {
    UciCommand(Result<Command, UciError>),
    InputClosed,
}

/// Whether the command loop keeps going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// The UCI engine, holding the current position and the searcher.
///
/// Commands are handled on the caller's thread while searches run in the
/// background; the primary search thread prints `info` and `bestmove`
/// itself, so `stop` and `isready` are answered mid-search.
pub struct UciEngine<W: Write + Send + 'static> {
    board: Board,
    history: PositionHistory,
    searcher: Searcher,
    config: EngineConfig,
    out: Output<W>,
}

impl UciEngine<io::Stdout> {
    /// An engine that writes to standard output.
    pub fn stdout() -> Self {
        Self::new(Output::new(io::stdout()))
    }
}

impl<W: Write + Send + 'static> UciEngine<W> {
    /// Create a new engine with the starting position.
    pub fn new(out: Output<W>) -> Self {
        let config = EngineConfig::default();
        let board = Board::starting_position();
        let mut history = PositionHistory::new();
        history.push(board.hash());
        Self {
            board,
            history,
            searcher: Searcher::new(config.hash_mb, config.threads),
            config,
            out,
        }
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Run the UCI event loop, reading `input` until `quit` or end of input.
    pub fn run<R: BufRead + Send + 'static>(mut self, input: R) -> Result<(), UciError> {
        let (tx, rx) = mpsc::channel::<EngineEvent>();

        thread::spawn(move || {
            for line in input.lines() {
                let Ok(line) = line else {
                    break;
                };
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                debug!(cmd = %trimmed, "received UCI command");
                if tx.send(EngineEvent::UciCommand(parse_command(trimmed))).is_err() {
                    return;
                }
            }
            let _ = tx.send(EngineEvent::InputClosed);
        });

        for event in &rx {
            match event {
                EngineEvent::UciCommand(Ok(cmd)) => {
                    if self.handle(cmd)? == Flow::Quit {
                        break;
                    }
                }
                EngineEvent::UciCommand(Err(e)) => {
                    warn!(error = %e, "UCI parse error");
                }
                EngineEvent::InputClosed => break,
            }
        }

        self.searcher.stop();
        info!("sable shutting down");
        Ok(())
    }

    /// Apply one command.
    pub fn handle(&mut self, command: Command) -> Result<Flow, UciError> {
        match command {
            Command::Uci => self.handle_uci()?,
            Command::IsReady => self.out.line("readyok")?,
            Command::UciNewGame => self.handle_ucinewgame(),
            Command::Position(info) => self.handle_position(info),
            Command::Go(tc) => self.handle_go(&tc),
            Command::SetOption(opt) => self.handle_setoption(opt),
            Command::Stop => {
                self.searcher.stop();
            }
            Command::Bench(depth) => self.handle_bench(depth.unwrap_or(BENCH_DEPTH))?,
            Command::Perft(depth) => self.handle_perft(depth)?,
            Command::Eval => self.out.line(format_args!(
                "eval {} cp ({})",
                evaluate(&self.board, self.config.eval),
                self.config.eval
            ))?,
            Command::Print => self.handle_print()?,
            Command::Quit => return Ok(Flow::Quit),
            Command::Unknown(cmd) => {
                if !cmd.is_empty() {
                    debug!(%cmd, "ignoring unknown command");
                }
            }
        }
        Ok(Flow::Continue)
    }

    /// Block until the running search, if any, ends on its own limits.
    pub fn wait(&mut self) -> Option<SearchResult> {
        self.searcher.wait()
    }

    fn handle_uci(&self) -> io::Result<()> {
        self.out.line("id name sable")?;
        self.out.line("id author the sable developers")?;
        self.out.line(format_args!(
            "option name Hash type spin default {DEFAULT_HASH_MB} min 1 max {MAX_HASH_MB}"
        ))?;
        self.out.line(format_args!("option name Threads type spin default 1 min 1 max {MAX_THREADS}"))?;
        let vars: Vec<String> = EvalKind::NAMES.iter().map(|name| format!("var {name}")).collect();
        self.out.line(format_args!(
            "option name Eval type combo default {} {}",
            EvalKind::default(),
            vars.join(" ")
        ))?;
        self.out.line("uciok")
    }

    fn handle_ucinewgame(&mut self) {
        self.searcher.reset();
        self.board = Board::starting_position();
        self.history.clear();
        self.history.push(self.board.hash());
    }

    fn handle_setoption(&mut self, option: UciOption) {
        debug!(?option, "setoption");
        match option {
            UciOption::Hash(mb) => {
                self.config.hash_mb = mb;
                self.searcher.resize(mb);
            }
            UciOption::Threads(threads) => {
                self.config.threads = threads;
                self.searcher.set_threads(threads);
            }
            UciOption::Eval(eval) => {
                self.config.eval = eval;
                self.searcher.set_eval(eval);
            }
        }
    }

    fn handle_position(&mut self, info: PositionInfo) {
        self.board = info.board;
        self.history = info.history;
    }

    fn handle_go(&mut self, tc: &TimeControl) {
        let limit = limit_from_go(tc, self.board.side_to_move());
        self.searcher.start(&self.board, &self.history, limit, UciReporter::new(self.out.clone()));
    }

    fn handle_bench(&mut self, depth: usize) -> Result<(), UciError> {
        self.searcher.stop();
        let result = bench::run(depth).map_err(|source| UciError::Bench { source })?;
        self.out.line(format_args!("{} nodes {} nps", result.nodes, result.nps()))?;
        Ok(())
    }

    fn handle_perft(&mut self, depth: usize) -> io::Result<()> {
        self.searcher.stop();
        let started = Instant::now();
        let moves = divide(&self.board, depth);
        for (mv, nodes) in &moves {
            self.out.line(format_args!("{mv}: {nodes}"))?;
        }
        let total: u64 = moves.iter().map(|&(_, nodes)| nodes).sum();
        info!(depth, nodes = total, elapsed_ms = started.elapsed().as_millis() as u64, "perft finished");
        self.out.line("")?;
        self.out.line(format_args!("nodes {total}"))
    }

    fn handle_print(&self) -> io::Result<()> {
        for rank in (0..8).rev() {
            let row: Vec<String> = (0..8)
                .map(|file| {
                    let sq = Square::at(file, rank);
                    match (self.board.piece_on(sq), self.board.color_on(sq)) {
                        (Some(kind), Some(color)) => kind.fen_char(color).to_string(),
                        _ => ".".to_string(),
                    }
                })
                .collect();
            self.out.line(format_args!("{} {}", rank + 1, row.join(" ")))?;
        }
        self.out.line("  a b c d e f g h")?;
        self.out.line(format_args!("fen {}", self.board))?;
        self.out.line(format_args!("key {:016x}", self.board.hash()))
    }
}
