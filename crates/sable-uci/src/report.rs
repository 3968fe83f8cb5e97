//! Protocol output: `info` and `bestmove` lines.

use std::fmt::Display;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::warn;

use sable_engine::{Reporter, SearchInfo, SearchResult, mate_in};

/// Line-oriented sink shared by the command loop and the search thread.
#[derive(Debug, Default)]
pub struct Output<W> {
    inner: Arc<Mutex<W>>,
}

impl<W> Clone for Output<W> {
    fn clone(&self) -> Self {
        Output { inner: Arc::clone(&self.inner) }
    }
}

impl<W: Write> Output<W> {
    pub fn new(writer: W) -> Output<W> {
        Output { inner: Arc::new(Mutex::new(writer)) }
    }

    /// Write one line and flush it.
    pub fn line(&self, text: impl Display) -> io::Result<()> {
        let mut out = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(out, "{text}")?;
        out.flush()
    }
}

impl Output<Vec<u8>> {
    /// Everything written so far, for capturing output in memory.
    pub fn text(&self) -> String {
        let out = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&out).into_owned()
    }
}

/// `info depth .. seldepth .. score .. nodes .. nps .. time .. hashfull .. pv ..`
pub fn format_info(info: &SearchInfo) -> String {
    let score = match mate_in(info.score) {
        Some(moves) => format!("mate {moves}"),
        None => format!("cp {}", info.score),
    };
    let pv: Vec<String> = info.pv.iter().map(|mv| mv.to_uci()).collect();
    format!(
        "info depth {} seldepth {} score {} nodes {} nps {} time {} hashfull {} pv {}",
        info.depth,
        info.seldepth,
        score,
        info.nodes,
        info.nps,
        info.time.as_millis(),
        info.hashfull,
        pv.join(" ")
    )
}

/// `bestmove <move> [ponder <move>]`; `0000` when there is no legal move.
pub fn format_bestmove(result: &SearchResult) -> String {
    match result.ponder_move.filter(|mv| !mv.is_null()) {
        Some(ponder) if !result.best_move.is_null() => {
            format!("bestmove {} ponder {}", result.best_move, ponder)
        }
        _ => format!("bestmove {}", result.best_move),
    }
}

/// Prints search progress from the primary search thread.
pub struct UciReporter<W> {
    out: Output<W>,
}

impl<W> UciReporter<W> {
    pub fn new(out: Output<W>) -> UciReporter<W> {
        UciReporter { out }
    }
}

impl<W: Write + Send + 'static> Reporter for UciReporter<W> {
    fn iteration(&mut self, info: &SearchInfo) {
        if let Err(error) = self.out.line(format_info(info)) {
            warn!(%error, "failed to write info line");
        }
    }

    fn finished(&mut self, result: &SearchResult) {
        if let Err(error) = self.out.line(format_bestmove(result)) {
            warn!(%error, "failed to write bestmove");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use sable_core::{Move, Square};
    use sable_engine::search::params::MATE;

    use super::*;

    fn info(score: i32, pv: Vec<Move>) -> SearchInfo {
        SearchInfo {
            depth: 7,
            seldepth: 11,
            score,
            nodes: 12_345,
            nps: 600_000,
            time: Duration::from_millis(20),
            hashfull: 3,
            pv,
        }
    }

    fn result(best: Move, ponder: Option<Move>) -> SearchResult {
        SearchResult {
            best_move: best,
            ponder_move: ponder,
            pv: Vec::new(),
            score: 0,
            depth: 1,
            nodes: 0,
            thread_nodes: Vec::new(),
        }
    }

    #[test]
    fn info_line_with_centipawns() {
        let pv = vec![Move::new(Square::E2, Square::E4), Move::new(Square::E7, Square::E5)];
        assert_eq!(
            format_info(&info(35, pv)),
            "info depth 7 seldepth 11 score cp 35 nodes 12345 nps 600000 time 20 hashfull 3 pv e2e4 e7e5"
        );
    }

    #[test]
    fn info_line_with_mate() {
        let line = format_info(&info(MATE - 3, vec![Move::new(Square::E2, Square::E4)]));
        assert!(line.contains("score mate 2 "), "{line}");
        let line = format_info(&info(-MATE + 2, vec![Move::new(Square::E2, Square::E4)]));
        assert!(line.contains("score mate -1 "), "{line}");
    }

    #[test]
    fn bestmove_lines() {
        let e2e4 = Move::new(Square::E2, Square::E4);
        let e7e5 = Move::new(Square::E7, Square::E5);
        assert_eq!(format_bestmove(&result(e2e4, Some(e7e5))), "bestmove e2e4 ponder e7e5");
        assert_eq!(format_bestmove(&result(e2e4, None)), "bestmove e2e4");
        assert_eq!(format_bestmove(&result(Move::NULL, None)), "bestmove 0000");
    }

    #[test]
    fn output_captures_lines() {
        let out = Output::new(Vec::new());
        let clone = out.clone();
        out.line("readyok").unwrap();
        clone.line(format_args!("{} {}", "bestmove", "e2e4")).unwrap();
        assert_eq!(out.text(), "readyok\nbestmove e2e4\n");
    }
}
