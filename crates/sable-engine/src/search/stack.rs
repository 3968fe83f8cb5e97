//! Per-ply search state.

use sable_core::Move;

use crate::search::history::PieceTo;
use crate::search::params::{MAX_PLY, NO_SCORE};

/// The best line found below a node, rebuilt as the recursion unwinds.
#[derive(Clone)]
pub struct PvList {
    moves: [Move; MAX_PLY],
    len: usize,
}

impl PvList {
    pub const fn new() -> PvList {
        PvList {
            moves: [Move::NULL; MAX_PLY],
            len: 0,
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Make this line `mv` followed by `child`.
    pub fn update(&mut self, mv: Move, child: &PvList) {
        let tail = child.len.min(MAX_PLY - 1);
        self.moves[0] = mv;
        self.moves[1..=tail].copy_from_slice(&child.moves[..tail]);
        self.len = tail + 1;
    }

    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for PvList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PvList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// State kept for one ply of the current line.
#[derive(Clone)]
pub struct StackEntry {
    pub pv: PvList,
    pub killer: Move,
    /// Static evaluation at this ply, or [`NO_SCORE`] when in check.
    pub static_eval: i32,
    /// The move being searched from this ply; selects the continuation
    /// history segment its children read. `None` for a null move.
    pub played: Option<PieceTo>,
}

impl StackEntry {
    pub const fn new() -> StackEntry {
        StackEntry {
            pv: PvList::new(),
            killer: Move::NULL,
            static_eval: NO_SCORE,
            played: None,
        }
    }
}

impl Default for StackEntry {
    fn default() -> Self {
        Self::new()
    }
}

/// One search call's stack: `MAX_PLY + 2` entries, with one sentinel in
/// front of ply 0 so a node can always look at its parent.
pub struct SearchStack {
    entries: Vec<StackEntry>,
}

impl SearchStack {
    pub fn new() -> SearchStack {
        SearchStack {
            entries: vec![StackEntry::new(); MAX_PLY + 3],
        }
    }

    #[inline]
    pub fn at(&self, ply: usize) -> &StackEntry {
        &self.entries[ply + 1]
    }

    #[inline]
    pub fn at_mut(&mut self, ply: usize) -> &mut StackEntry {
        &mut self.entries[ply + 1]
    }

    /// The parent of `ply`; the sentinel when `ply` is the root.
    #[inline]
    pub fn parent(&self, ply: usize) -> &StackEntry {
        &self.entries[ply]
    }

    /// Static evaluation two plies up, if that node had one.
    pub fn eval_two_back(&self, ply: usize) -> Option<i32> {
        let eval = ply.checked_sub(2).map(|p| self.at(p).static_eval)?;
        (eval != NO_SCORE).then_some(eval)
    }

    /// Copy the child's line behind `mv` into the PV at `ply`.
    pub fn update_pv(&mut self, ply: usize, mv: Move) {
        let (head, tail) = self.entries.split_at_mut(ply + 2);
        head[ply + 1].pv.update(mv, &tail[0].pv);
    }
}

impl Default for SearchStack {
    fn default() -> Self {
        Self::new()
    }
}
