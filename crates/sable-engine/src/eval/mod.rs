//! Static evaluation.
//!
//! Two evaluators share one incremental machinery: a plain material count
//! and a classical material plus piece-square evaluation tapered by game
//! phase. Both are additive over pieces, so [`Evaluator`] can update them
//! move by move instead of rescanning the board.

mod incremental;
pub mod material;
pub mod phase;
pub mod pst;
pub mod score;

use std::fmt;
use std::str::FromStr;

use sable_core::{Board, Color, PieceKind, Square};

use crate::search::params::MATE_BOUND;

pub use incremental::Evaluator;
use material::{MATERIAL_VALUE, PIECE_VALUE};
use phase::{MAX_PHASE, PHASE_WEIGHT};
use pst::pst_value;
use score::{S, Score};

/// Which static evaluation the engine uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvalKind {
    /// Fixed piece values only.
    Material,
    /// Material and piece-square tables, tapered by game phase.
    #[default]
    Classical,
}

impl EvalKind {
    pub const NAMES: [&'static str; 2] = ["classical", "material"];

    pub fn name(self) -> &'static str {
        match self {
            EvalKind::Material => "material",
            EvalKind::Classical => "classical",
        }
    }

    /// White-relative contribution of one piece.
    #[inline]
    pub(crate) fn piece_score(self, kind: PieceKind, color: Color, sq: Square) -> Score {
        let score = match self {
            EvalKind::Material => {
                let value = PIECE_VALUE[kind.index()] as i16;
                S(value, value)
            }
            EvalKind::Classical => MATERIAL_VALUE[kind.index()] + pst_value(kind, color, sq),
        };
        match color {
            Color::White => score,
            Color::Black => -score,
        }
    }
}

impl fmt::Display for EvalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An evaluation name that is neither `classical` nor `material`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown evaluation '{0}'")]
pub struct UnknownEvalKind(pub String);

impl FromStr for EvalKind {
    type Err = UnknownEvalKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "classical" => Ok(EvalKind::Classical),
            "material" => Ok(EvalKind::Material),
            _ => Err(UnknownEvalKind(s.to_owned())),
        }
    }
}

/// White-relative piece sum and phase of a whole board.
pub(crate) fn accumulate(board: &Board, kind: EvalKind) -> (Score, i32) {
    let mut score = Score::ZERO;
    let mut phase = 0;
    for color in Color::ALL {
        for piece in PieceKind::ALL {
            for sq in board.colored_pieces(color, piece) {
                score += kind.piece_score(piece, color, sq);
                phase += PHASE_WEIGHT[piece.index()];
            }
        }
    }
    (score, phase)
}

/// Turn a white-relative sum into centipawns for the side to move.
///
/// The result stays strictly inside the mate band.
#[inline]
pub(crate) fn finish(score: Score, phase: i32, stm: Color) -> i32 {
    let cp = score.taper(phase.min(MAX_PHASE), MAX_PHASE);
    let cp = match stm {
        Color::White => cp,
        Color::Black => -cp,
    };
    cp.clamp(-MATE_BOUND + 1, MATE_BOUND - 1)
}

/// Evaluate `board` from scratch, in centipawns for the side to move.
pub fn evaluate(board: &Board, kind: EvalKind) -> i32 {
    let (score, phase) = accumulate(board, kind);
    finish(score, phase, board.side_to_move())
}
